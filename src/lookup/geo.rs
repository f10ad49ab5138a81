use log::debug;
use serde::Deserialize;
use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use crate::state::GeoRecord;

/// Default geolocation provider
pub const DEFAULT_GEO_URL: &str = "http://ipwho.is";

/// Source of geolocation data.
///
/// Implementations must never fail loudly: any problem is reported as
/// `None` so a trace is never aborted by one bad lookup.
pub trait Geolocate {
    /// Geolocate a specific address
    fn lookup(&self, addr: IpAddr) -> impl Future<Output = Option<GeoRecord>> + Send;

    /// Geolocate the caller's own public-facing address
    fn lookup_self(&self) -> impl Future<Output = Option<GeoRecord>> + Send;
}

/// Geolocation disabled: every lookup is absent
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeo;

impl Geolocate for NoGeo {
    async fn lookup(&self, _addr: IpAddr) -> Option<GeoRecord> {
        None
    }

    async fn lookup_self(&self) -> Option<GeoRecord> {
        None
    }
}

/// Provider response. Every field is required so that partial answers are
/// rejected as a whole.
#[derive(Debug, Deserialize)]
struct IpwhoResponse {
    #[serde(default = "default_success")]
    success: bool,
    ip: String,
    #[serde(rename = "type")]
    ip_type: String,
    continent: String,
    continent_code: String,
    country: String,
    country_code: String,
    city: String,
    latitude: f64,
    longitude: f64,
    connection: IpwhoConnection,
}

#[derive(Debug, Deserialize)]
struct IpwhoConnection {
    asn: u32,
    org: String,
    isp: String,
    domain: String,
}

fn default_success() -> bool {
    true
}

impl IpwhoResponse {
    fn into_record(self) -> Option<GeoRecord> {
        if !self.success {
            return None;
        }
        Some(GeoRecord {
            domain: self.connection.domain,
            ip_type: self.ip_type,
            addr: self.ip.parse().ok()?,
            continent: self.continent,
            continent_code: self.continent_code,
            country: self.country,
            country_code: self.country_code,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
            asn: self.connection.asn,
            isp: self.connection.isp,
            org: self.connection.org,
        })
    }
}

/// Map a raw provider body to a record, failing closed on anything unexpected
pub fn parse_geo_response(body: &str) -> Option<GeoRecord> {
    serde_json::from_str::<IpwhoResponse>(body)
        .ok()
        .and_then(IpwhoResponse::into_record)
}

/// HTTP client for the ipwho.is geolocation API
#[derive(Debug, Clone)]
pub struct GeoClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeoClient {
    /// Create a client for `base_url`; each request is bounded by `timeout`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("traceplot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, url: &str) -> Option<GeoRecord> {
        let body = match self.client.get(url).send().await {
            Ok(resp) => match resp.error_for_status() {
                Ok(resp) => resp.text().await.ok()?,
                Err(e) => {
                    debug!("geolocation request {} failed: {}", url, e);
                    return None;
                }
            },
            Err(e) => {
                debug!("geolocation request {} failed: {}", url, e);
                return None;
            }
        };

        let record = parse_geo_response(&body);
        if record.is_none() {
            debug!("geolocation response from {} not usable", url);
        }
        record
    }
}

impl Geolocate for GeoClient {
    async fn lookup(&self, addr: IpAddr) -> Option<GeoRecord> {
        self.fetch(&format!("{}/{}", self.base_url, addr)).await
    }

    async fn lookup_self(&self) -> Option<GeoRecord> {
        self.fetch(&format!("{}/", self.base_url)).await
    }
}

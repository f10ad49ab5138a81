use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

use crate::error::{Result, TraceError};
use crate::lookup::is_global;

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6378.0;

/// Empirical stretch applied to great-circle distances, since fiber rarely
/// follows the geodesic between two points
pub const ROUTE_FACTOR: f64 = 1.2;

/// Round to the two decimal digits used for display
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Geolocation and network-ownership data for one address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub domain: String,
    /// Address family as reported by the provider ("IPv4" / "IPv6")
    pub ip_type: String,
    pub addr: IpAddr,
    pub continent: String,
    pub continent_code: String,
    pub country: String,
    pub country_code: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub asn: u32,
    pub isp: String,
    pub org: String,
}

impl GeoRecord {
    /// "City, CC" for table display
    pub fn location(&self) -> String {
        match (self.city.is_empty(), self.country_code.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.country_code),
            (true, false) => self.country_code.clone(),
            (false, true) => self.city.clone(),
            (true, true) => String::new(),
        }
    }
}

/// One traceroute step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    /// FQDN reported by the traceroute tool, or empty
    pub name: String,
    pub addr: IpAddr,
    /// Round-trip times in milliseconds, in probe order. Timed-out probes are
    /// not represented.
    pub latencies: Vec<f64>,
    pub geo: Option<GeoRecord>,
}

impl Hop {
    pub fn new(name: impl Into<String>, addr: IpAddr, latencies: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            addr,
            latencies,
            geo: None,
        }
    }

    /// Attach (or clear) geolocation data
    pub fn with_geo(mut self, geo: Option<GeoRecord>) -> Self {
        self.geo = geo;
        self
    }

    /// Whether at least one probe for this hop got a reply.
    ///
    /// Must be checked before calling the latency accessors.
    pub fn has_samples(&self) -> bool {
        !self.latencies.is_empty()
    }

    /// Whether the hop address lies outside every reserved range
    pub fn is_global(&self) -> bool {
        is_global(self.addr)
    }

    /// (latitude, longitude) in degrees, if geolocated
    pub fn coords(&self) -> Option<(f64, f64)> {
        self.geo.as_ref().map(|g| (g.latitude, g.longitude))
    }

    /// "name (addr)", or just the address when no name is known
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.addr.to_string()
        } else {
            format!("{} ({})", self.name, self.addr)
        }
    }

    pub fn min_latency(&self) -> Result<f64> {
        self.samples()
            .map(|s| round2(s.iter().copied().fold(f64::INFINITY, f64::min)))
    }

    pub fn avg_latency(&self) -> Result<f64> {
        self.raw_avg().map(round2)
    }

    pub fn max_latency(&self) -> Result<f64> {
        self.samples()
            .map(|s| round2(s.iter().copied().fold(f64::NEG_INFINITY, f64::max)))
    }

    /// Signed difference of average latencies, `avg(self) - avg(other)`
    pub fn latency_delta(&self, other: &Hop) -> Result<f64> {
        Ok(round2(self.raw_avg()? - other.raw_avg()?))
    }

    /// Approximate route length in kilometres to another hop.
    ///
    /// Returns `None` ("not applicable") when either hop lacks geolocation.
    /// Distance to no hop at all is `Some(0.0)`; totals accumulated from the
    /// first hop of a path rely on this.
    pub fn distance_to(&self, other: Option<&Hop>) -> Option<f64> {
        let Some(other) = other else {
            return Some(0.0);
        };
        let (lat1, lon1) = self.coords()?;
        let (lat2, lon2) = other.coords()?;
        Some(haversine_km(lat1, lon1, lat2, lon2) * ROUTE_FACTOR)
    }

    fn samples(&self) -> Result<&[f64]> {
        if self.latencies.is_empty() {
            Err(TraceError::NoSamples)
        } else {
            Ok(&self.latencies)
        }
    }

    fn raw_avg(&self) -> Result<f64> {
        let samples = self.samples()?;
        Ok(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.addr)?;
        for rtt in &self.latencies {
            write!(f, " {} ms", rtt)?;
        }
        Ok(())
    }
}

/// Great-circle distance between two coordinates, in kilometres
fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * a.sqrt().asin() * EARTH_RADIUS_KM
}

#[cfg(test)]
pub(crate) fn test_geo(addr: IpAddr, latitude: f64, longitude: f64) -> GeoRecord {
    GeoRecord {
        domain: String::new(),
        ip_type: if addr.is_ipv4() { "IPv4" } else { "IPv6" }.to_string(),
        addr,
        continent: "Europe".to_string(),
        continent_code: "EU".to_string(),
        country: "Germany".to_string(),
        country_code: "DE".to_string(),
        city: "Frankfurt".to_string(),
        latitude,
        longitude,
        asn: 3320,
        isp: "Deutsche Telekom AG".to_string(),
        org: "Deutsche Telekom AG".to_string(),
    }
}

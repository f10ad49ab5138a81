use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::lookup::DEFAULT_GEO_URL;
use crate::parse::Platform;

/// Upper bound on a single traceroute run
pub const DEFAULT_TRACE_TIMEOUT: Duration = Duration::from_secs(60);

/// Runtime configuration for a trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hard limit for the external traceroute tool
    #[serde(with = "duration_serde")]
    pub trace_timeout: Duration,
    /// Enable geolocation
    pub geo_enabled: bool,
    /// Geolocation provider base URL
    pub geo_url: String,
    /// Per-request limit for geolocation lookups
    #[serde(with = "duration_serde")]
    pub geo_timeout: Duration,
    /// Traceroute dialect override (None = detect from host OS)
    pub platform: Option<Platform>,
    /// Geolocation requests in flight at once
    pub max_concurrent_lookups: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_timeout: DEFAULT_TRACE_TIMEOUT,
            geo_enabled: true,
            geo_url: DEFAULT_GEO_URL.to_string(),
            geo_timeout: Duration::from_secs(10),
            platform: None,
            max_concurrent_lookups: 10,
        }
    }
}

/// Serde helper for Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}

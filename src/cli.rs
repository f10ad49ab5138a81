use clap::Parser;
use std::time::Duration;

use traceplot::config::Config;
use traceplot::export::Theme;
use traceplot::parse::Platform;
use traceplot::prefs::Prefs;

/// Traceroute with geolocated hops, latency deltas and route distances
#[derive(Parser, Debug, Clone)]
#[command(name = "traceplot")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Target to trace (IP address or hostname)
    pub target: String,

    /// Traceroute timeout in seconds
    #[arg(long = "timeout", default_value = "60")]
    pub timeout: f64,

    /// Per-lookup geolocation timeout in seconds
    #[arg(long = "geo-timeout", default_value = "10")]
    pub geo_timeout: f64,

    /// Skip geolocation
    #[arg(long = "no-geo")]
    pub no_geo: bool,

    /// Geolocation provider base URL (default: http://ipwho.is)
    #[arg(long = "geo-url")]
    pub geo_url: Option<String>,

    /// Traceroute output dialect (windows, unix); detected from the OS by default
    #[arg(long = "platform")]
    pub platform: Option<String>,

    /// Parse a saved traceroute transcript instead of running traceroute
    #[arg(long = "input")]
    pub input: Option<String>,

    /// Output JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Output CSV
    #[arg(long = "csv")]
    pub csv: bool,

    /// Include the full path (private hops too), not only the public view
    #[arg(long = "full")]
    pub full: bool,

    /// Color theme (default, dracula, monochrome, plain)
    #[arg(long = "theme")]
    pub theme: Option<String>,

    /// Remember --theme and --geo-url for later runs
    #[arg(long = "save-prefs")]
    pub save_prefs: bool,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Get traceroute timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    /// Get geolocation timeout as Duration
    pub fn geo_timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.geo_timeout)
    }

    /// Validate arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.json && self.csv {
            return Err("Cannot specify both --json and --csv".into());
        }

        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            return Err("Timeout must be a positive number of seconds".into());
        }

        if !self.geo_timeout.is_finite() || self.geo_timeout <= 0.0 {
            return Err("Geolocation timeout must be a positive number of seconds".into());
        }

        if let Some(ref theme) = self.theme
            && !Theme::list().contains(&theme.to_lowercase().as_str())
        {
            return Err(format!(
                "Unknown theme: {}. Available: {}",
                theme,
                Theme::list().join(", ")
            ));
        }

        if let Some(ref platform) = self.platform {
            platform.parse::<Platform>().map_err(|_| {
                format!("Unknown platform: {}. Use windows or unix", platform)
            })?;
        }

        if let Some(ref url) = self.geo_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(format!("Geolocation URL must be http(s): {}", url));
        }

        Ok(())
    }

    /// Build runtime config: CLI flags override saved preferences
    pub fn to_config(&self, prefs: &Prefs) -> Config {
        let defaults = Config::default();
        Config {
            trace_timeout: self.timeout_duration(),
            geo_enabled: !self.no_geo,
            geo_url: self
                .geo_url
                .clone()
                .or_else(|| prefs.geo_url.clone())
                .unwrap_or(defaults.geo_url),
            geo_timeout: self.geo_timeout_duration(),
            platform: self.platform.as_deref().and_then(|p| p.parse().ok()),
            ..defaults
        }
    }

    /// Theme name: CLI override > saved preference > default
    pub fn theme_name<'a>(&'a self, prefs: &'a Prefs) -> &'a str {
        self.theme
            .as_deref()
            .or(prefs.theme.as_deref())
            .unwrap_or("default")
    }
}

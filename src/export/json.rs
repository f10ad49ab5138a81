use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::state::{Path, Target, Trace};

/// JSON document handed to external renderers
#[derive(Serialize)]
struct JsonReport<'a> {
    target: &'a Target,
    started_at: DateTime<Utc>,
    target_synthesized: bool,
    target_reached: bool,
    path: &'a Path,
    public: &'a Path,
    total_distance_km: f64,
}

/// Export the full and public paths as pretty-printed JSON
pub fn export_json<W: Write>(trace: &Trace, public: &Path, writer: W) -> Result<()> {
    let report = JsonReport {
        target: &trace.target,
        started_at: trace.started_at,
        target_synthesized: trace.target_synthesized,
        target_reached: trace.target_reached(),
        path: &trace.path,
        public,
        total_distance_km: public.total_distance(),
    };
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Hop;

    #[test]
    fn test_export_shape() {
        let target = "8.8.8.8".parse().unwrap();
        let mut trace = Trace::new(Target::new("8.8.8.8".to_string(), target));
        trace.path.push(Hop::new("", "192.168.1.1".parse().unwrap(), vec![1.0]));
        trace.path.push(Hop::new("dns.google", target, vec![]));
        let public: Path = trace.path.iter().skip(1).cloned().collect();

        let mut buf = Vec::new();
        export_json(&trace, &public, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["target"]["resolved"], "8.8.8.8");
        assert_eq!(value["path"].as_array().unwrap().len(), 2);
        assert_eq!(value["public"][0]["name"], "dns.google");
        assert_eq!(value["public"][0]["latencies"].as_array().unwrap().len(), 0);
        assert!(value["path"][0]["geo"].is_null());
        assert_eq!(value["total_distance_km"], 0.0);
        assert_eq!(value["target_reached"], true);
        assert_eq!(value["target_synthesized"], false);
    }
}

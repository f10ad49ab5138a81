use anyhow::Result;
use std::io::Write;

use crate::state::{Hop, Path};

/// Export a path to CSV format, one row per hop
pub fn export_csv<W: Write>(path: &Path, mut writer: W) -> Result<()> {
    // Write header
    writeln!(
        writer,
        "hop,ip,hostname,city,country_code,latitude,longitude,asn,isp,avg_ms,min_ms,max_ms,delta_ms,distance_km"
    )?;

    let mut prev: Option<&Hop> = None;
    for (i, hop) in path.iter().enumerate() {
        let (city, country, lat, lon, asn, isp) = match &hop.geo {
            Some(geo) => (
                geo.city.clone(),
                geo.country_code.clone(),
                geo.latitude.to_string(),
                geo.longitude.to_string(),
                geo.asn.to_string(),
                geo.isp.clone(),
            ),
            None => (
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ),
        };

        let (avg, min, max) = if hop.has_samples() {
            (
                format!("{:.2}", hop.avg_latency()?),
                format!("{:.2}", hop.min_latency()?),
                format!("{:.2}", hop.max_latency()?),
            )
        } else {
            (String::new(), String::new(), String::new())
        };

        let delta = match prev {
            Some(p) if p.has_samples() && hop.has_samples() => {
                format!("{:.2}", hop.latency_delta(p)?)
            }
            _ => String::new(),
        };

        // Empty when not applicable
        let distance = hop
            .distance_to(prev)
            .map(|km| format!("{:.2}", km))
            .unwrap_or_default();

        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            i + 1,
            hop.addr,
            escape_csv(&hop.name),
            escape_csv(&city),
            escape_csv(&country),
            lat,
            lon,
            asn,
            escape_csv(&isp),
            avg,
            min,
            max,
            delta,
            distance
        )?;
        prev = Some(hop);
    }

    Ok(())
}

/// Escape a string for CSV (quote if contains comma, quote, or newline)
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

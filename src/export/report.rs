use std::io::Write;

use super::theme::Theme;
use crate::sanitize_display;
use crate::state::{Hop, Path, Trace};

const HOST_WIDTH: usize = 44;
const LOCATION_WIDTH: usize = 22;
const ISP_WIDTH: usize = 28;

/// Generate the text report: run header, then the public path table, and the
/// full path table when `full` is set
pub fn generate_report<W: Write>(
    trace: &Trace,
    public: &Path,
    full: bool,
    theme: &Theme,
    mut writer: W,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "{}",
        theme.paint(
            &format!(
                "traceplot report for {} ({})",
                sanitize_display(&trace.target.original),
                trace.target.resolved
            ),
            theme.header
        )
    )?;
    writeln!(writer, "Started: {}", trace.started_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    if trace.target_synthesized {
        writeln!(writer, "Target did not reply; final hop estimated from the last responder")?;
    }

    if full {
        writeln!(writer)?;
        writeln!(writer, "Full path")?;
        write_path(&trace.path, theme, &mut writer)?;
    }

    writeln!(writer)?;
    writeln!(writer, "Public path")?;
    write_path(public, theme, &mut writer)
}

/// One table row per hop, followed by distance and latency totals
pub fn write_path<W: Write>(path: &Path, theme: &Theme, mut writer: W) -> std::io::Result<()> {
    let header = format!(
        "{:>3}  {:<HOST_WIDTH$} {:<LOCATION_WIDTH$} {:<ISP_WIDTH$} {:>9} {:>9} {:>9} {:>9} {:>10}",
        "#", "Host", "Location", "ISP", "Avg", "Min", "Max", "Delta", "Distance"
    );
    writeln!(writer, "{}", theme.paint(&header, theme.header))?;
    writeln!(writer, "{}", theme.paint(&"-".repeat(header.len()), theme.rule))?;

    let mut prev: Option<&Hop> = None;
    for (i, hop) in path.iter().enumerate() {
        let host = fit(&sanitize_display(&hop.label()), HOST_WIDTH);
        let host = theme.paint(
            &format!("{:<HOST_WIDTH$}", host),
            if hop.is_global() { theme.public } else { theme.private },
        );

        let (location, isp) = match &hop.geo {
            Some(geo) => (
                sanitize_display(&geo.location()),
                sanitize_display(&format!("AS{} {}", geo.asn, geo.isp)),
            ),
            None => ("-".to_string(), "-".to_string()),
        };

        let (avg, min, max) = if hop.has_samples() {
            (ms(hop.avg_latency()), ms(hop.min_latency()), ms(hop.max_latency()))
        } else {
            ("*".to_string(), "*".to_string(), "*".to_string())
        };

        let delta = match prev {
            Some(p) if p.has_samples() && hop.has_samples() => hop
                .latency_delta(p)
                .map(|d| format!("{:+.2}", d))
                .unwrap_or_else(|_| "-".to_string()),
            _ => "-".to_string(),
        };

        let distance = match hop.distance_to(prev) {
            Some(km) => format!("{:.2} km", km),
            None => theme.paint(&format!("{:>10}", "N/A"), theme.missing),
        };

        writeln!(
            writer,
            "{:>3}  {} {:<LOCATION_WIDTH$} {:<ISP_WIDTH$} {:>9} {:>9} {:>9} {:>9} {:>10}",
            i + 1,
            host,
            fit(&location, LOCATION_WIDTH),
            fit(&isp, ISP_WIDTH),
            avg,
            min,
            max,
            delta,
            distance
        )?;
        prev = Some(hop);
    }

    writeln!(writer)?;
    let total = format!("Total distance: {:.2} km", path.total_distance());
    writeln!(writer, "{}", theme.paint(&total, theme.total))?;
    if let Some(last) = path.last().filter(|h| h.has_samples()) {
        writeln!(writer, "End-to-end latency: {} ms", ms(last.avg_latency()))?;
    }

    Ok(())
}

fn ms(value: crate::error::Result<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|_| "*".to_string())
}

/// Truncate to `width` characters, marking the cut with '~'
fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width - 1).collect();
        out.push('~');
        out
    }
}

/// Generate report to string
#[cfg(test)]
fn generate_report_string(trace: &Trace, public: &Path, full: bool, theme: &Theme) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail
    let _ = generate_report(trace, public, full, theme, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

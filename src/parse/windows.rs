//! `tracert` output
//!
//! ```text
//! Tracing route to dns.google [8.8.8.8]
//! over a maximum of 30 hops:
//!
//!   1    <1 ms    <1 ms    <1 ms  192.168.1.1
//!   2     *        *       23 ms  10.20.0.1
//!   3     9 ms     8 ms     9 ms  dns.google [8.8.8.8]
//!
//! Trace complete.
//! ```

use regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;

use super::ParsedHop;

/// Hop index, three latency columns, then `addr` or `name [addr]`
static ROUTE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*\d+\s+(<?\d+\s*ms|\*)\s+(<?\d+\s*ms|\*)\s+(<?\d+\s*ms|\*)\s+(?:(\S+)\s+\[([0-9A-Fa-f:.]+)\]|([0-9A-Fa-f:.]+))\s*$",
    )
    .expect("Invalid tracert route regex")
});

/// Parse `tracert` output. Lines that are not route lines are skipped.
pub fn parse(output: &str) -> Vec<ParsedHop> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<ParsedHop> {
    let caps = ROUTE_LINE.captures(line)?;

    let (name, addr) = match (caps.get(4), caps.get(5), caps.get(6)) {
        (Some(name), Some(addr), _) => (name.as_str(), addr.as_str()),
        (_, _, Some(addr)) => ("", addr.as_str()),
        _ => return None,
    };
    let addr: IpAddr = addr.parse().ok()?;

    let latencies = (1..=3)
        .filter_map(|i| caps.get(i))
        .filter_map(|m| parse_latency(m.as_str()))
        .collect();

    Some(ParsedHop {
        name: name.to_string(),
        addr,
        latencies,
    })
}

/// "12 ms" -> 12.0, "<1 ms" -> 1.0, "*" -> None
fn parse_latency(field: &str) -> Option<f64> {
    let digits = field.trim_start_matches('<').trim_end_matches("ms").trim();
    digits.parse::<u32>().ok().map(f64::from)
}

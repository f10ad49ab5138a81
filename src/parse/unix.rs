//! `traceroute` output (Linux, macOS, BSD)
//!
//! ```text
//! traceroute to dns.google (8.8.8.8), 64 hops max, 52 byte packets
//!  1  router.lan (192.168.1.1)  2.104 ms  1.723 ms  1.650 ms
//!  2  * * *
//!  3  10.20.0.1 (10.20.0.1)  8.912 ms *  9.034 ms
//!  4  dns.google (8.8.8.8)  9.201 ms  9.114 ms  9.330 ms
//! ```
//!
//! Numeric output (`-n`) prints the bare address without a name. A probe
//! lost before the first reply prints `*` ahead of the responder, and
//! replies may carry ICMP annotations (`!H`, `!N`, `!X`, `!<n>`):
//!
//! ```text
//!  3  * * edge.example.net (80.81.192.1)  23.000 ms
//!  5  host.example (62.115.1.1)  5.0 ms !H  5.1 ms !H  5.2 ms !H
//!  2  2001:db8::1 (2001:db8::1)  0.612 ms  0.580 ms  0.571 ms
//! ```

use regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;

use super::ParsedHop;

/// A reply time, with or without the `ms` unit attached
static LATENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)(ms)?$").expect("Invalid traceroute latency regex")
});

/// Probes per hop printed by `traceroute` by default
const PROBES_PER_HOP: usize = 3;

/// Parse `traceroute` output. Lines that are not route lines are skipped.
pub fn parse(output: &str) -> Vec<ParsedHop> {
    output.lines().filter_map(parse_line).collect()
}

/// Walk the fields of one line: optional hop index, then probe results and
/// the responder in any order. Timeouts count toward the probe limit but
/// leave no sample. A second responder on the same line ends the hop.
fn parse_line(line: &str) -> Option<ParsedHop> {
    let mut fields = line.split_whitespace().peekable();
    if fields.peek()?.bytes().all(|b| b.is_ascii_digit()) {
        fields.next();
    }

    let mut responder: Option<(&str, IpAddr)> = None;
    let mut probes = 0;
    let mut latencies = Vec::new();

    while probes < PROBES_PER_HOP {
        let Some(field) = fields.next() else {
            break;
        };

        if field == "*" {
            probes += 1;
            continue;
        }
        // ICMP annotation or `-A` AS tag
        if field.starts_with('!') || (field.starts_with('[') && responder.is_some()) {
            continue;
        }

        if let Some(caps) = LATENCY.captures(field) {
            if responder.is_none() {
                return None;
            }
            if caps.get(2).is_none() {
                if fields.peek() != Some(&"ms") {
                    break;
                }
                fields.next();
            }
            if let Ok(value) = caps[1].parse::<f64>() {
                latencies.push(value);
            }
            probes += 1;
            continue;
        }

        if responder.is_some() {
            break;
        }
        if let Some(addr) = fields.peek().and_then(|next| enclosed_addr(next)) {
            fields.next();
            responder = Some((field, addr));
        } else if let Ok(addr) = field.parse::<IpAddr>() {
            responder = Some(("", addr));
        } else {
            return None;
        }
    }

    let (name, addr) = responder?;

    // Without reverse DNS the tool repeats the address as the name
    let name = if name == addr.to_string() { "" } else { name };

    Some(ParsedHop {
        name: name.to_string(),
        addr,
        latencies,
    })
}

/// `(a.b.c.d)` or `(x:y::z)`
fn enclosed_addr(field: &str) -> Option<IpAddr> {
    field.strip_prefix('(')?.strip_suffix(')')?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = "\
traceroute to dns.google (8.8.8.8), 64 hops max, 52 byte packets
 1  router.lan (192.168.1.1)  2.104 ms  1.723 ms  1.650 ms
 2  * * *
 3  10.20.0.1 (10.20.0.1)  8.912 ms *  9.034 ms
 4  dns.google (8.8.8.8)  9.201 ms  9.114 ms  9.330 ms
";

    #[test]
    fn test_parses_route_lines_in_order() {
        let hops = parse(TRANSCRIPT);
        let addrs: Vec<String> = hops.iter().map(|h| h.addr.to_string()).collect();
        assert_eq!(addrs, ["192.168.1.1", "10.20.0.1", "8.8.8.8"]);
        assert_eq!(hops[0].name, "router.lan");
        assert_eq!(hops[0].latencies, vec![2.104, 1.723, 1.650]);
    }

    #[test]
    fn test_timeout_dropped_and_order_kept() {
        let hops = parse(TRANSCRIPT);
        assert_eq!(hops[1].latencies, vec![8.912, 9.034]);
    }

    #[test]
    fn test_name_equal_to_address_is_blank() {
        let hops = parse(TRANSCRIPT);
        assert_eq!(hops[1].name, "");
    }

    #[test]
    fn test_two_timeouts_one_reply() {
        let hops = parse(" 7  edge.example.net (62.115.1.1)  * *  23 ms\n");
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].latencies, vec![23.0]);
    }

    #[test]
    fn test_numeric_output() {
        let hops = parse(" 1  192.168.1.1  0.512 ms  0.455 ms  0.431 ms\n 2  100.64.0.1  4.1 ms  *  3.9 ms\n");
        assert_eq!(hops.len(), 2);
        assert_eq!(hops[0].name, "");
        assert_eq!(hops[1].addr.to_string(), "100.64.0.1");
        assert_eq!(hops[1].latencies, vec![4.1, 3.9]);
    }

    #[test]
    fn test_only_first_three_fields_per_line() {
        // ECMP: a second responder on the same line is ignored
        let hops = parse(" 5  a.example (1.1.1.1)  5.0 ms  b.example (1.0.0.1)  6.0 ms  7.0 ms\n");
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].addr.to_string(), "1.1.1.1");
        assert_eq!(hops[0].latencies, vec![5.0]);
    }

    #[test]
    fn test_leading_timeout_before_responder() {
        let hops = parse(" 4  * core.isp.example (62.115.1.1)  5.1 ms  5.0 ms\n");
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].name, "core.isp.example");
        assert_eq!(hops[0].addr.to_string(), "62.115.1.1");
        assert_eq!(hops[0].latencies, vec![5.1, 5.0]);
    }

    #[test]
    fn test_two_leading_timeouts_one_reply() {
        let hops = parse(" 3  * * edge.example.net (80.81.192.1)  23.000 ms\n");
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].addr.to_string(), "80.81.192.1");
        assert_eq!(hops[0].latencies, vec![23.0]);
    }

    #[test]
    fn test_leading_timeout_keeps_hop_order() {
        let transcript = "\
 1  router.lan (192.168.1.1)  1.0 ms  1.1 ms  1.2 ms
 2  * core.isp.example (62.115.1.1)  5.1 ms  5.0 ms
 3  dns.google (8.8.8.8)  9.2 ms  9.1 ms  9.3 ms
";
        let addrs: Vec<String> = parse(transcript).iter().map(|h| h.addr.to_string()).collect();
        assert_eq!(addrs, ["192.168.1.1", "62.115.1.1", "8.8.8.8"]);
    }

    #[test]
    fn test_leading_timeouts_count_toward_probes() {
        let hops = parse(" 3  * * edge.example.net (80.81.192.1)  23 ms  24 ms  25 ms\n");
        assert_eq!(hops[0].latencies, vec![23.0]);
    }

    #[test]
    fn test_icmp_annotations_keep_samples() {
        let hops = parse(" 5  host.example (62.115.1.1)  5.0 ms !H  5.1 ms !H  5.2 ms !H\n");
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].latencies, vec![5.0, 5.1, 5.2]);

        let hops = parse(" 6  62.115.1.2  7.0 ms !N  *  7.4 ms !<10>\n");
        assert_eq!(hops[0].latencies, vec![7.0, 7.4]);
    }

    #[test]
    fn test_as_lookup_tag_skipped() {
        let hops = parse(" 4  dns.google (8.8.8.8) [AS15169]  9.2 ms  9.1 ms  9.3 ms\n");
        assert_eq!(hops[0].latencies, vec![9.2, 9.1, 9.3]);
    }

    #[test]
    fn test_ipv6_output() {
        let transcript = "\
traceroute to 2001:4860:4860::8888 (2001:4860:4860::8888), 30 hops max, 80 byte packets
 1  2001:db8::1 (2001:db8::1)  0.612 ms  0.580 ms  0.571 ms
 2  dns.google (2001:4860:4860::8888)  9.101 ms  *  9.005 ms
";
        let hops = parse(transcript);
        assert_eq!(hops.len(), 2);
        assert_eq!(hops[0].name, "");
        assert_eq!(hops[0].addr.to_string(), "2001:db8::1");
        assert_eq!(hops[1].name, "dns.google");
        assert_eq!(hops[1].addr.to_string(), "2001:4860:4860::8888");
        assert_eq!(hops[1].latencies, vec![9.101, 9.005]);

        let hops = parse(" 1  2001:db8::1  0.612 ms  0.580 ms  0.571 ms\n");
        assert_eq!(hops[0].addr.to_string(), "2001:db8::1");
    }

    #[test]
    fn test_noise_is_skipped() {
        assert!(parse("traceroute: unknown host nowhere\n").is_empty());
        assert!(parse(" 9  * * *\n").is_empty());
        assert!(parse(" 1  bad (300.1.1.1)  1.0 ms\n").is_empty());
    }
}

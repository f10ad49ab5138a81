//! Globally-routable address classification
//!
//! An address is global when it falls outside every IANA special-purpose
//! block (RFC 6890 registries for IPv4 and IPv6).

use ipnetwork::IpNetwork;
use std::net::IpAddr;
use std::sync::LazyLock;

const RESERVED_PREFIXES: &[&str] = &[
    // IPv4
    "0.0.0.0/8",          // "this network"
    "10.0.0.0/8",         // RFC 1918
    "100.64.0.0/10",      // shared address space (CGNAT)
    "127.0.0.0/8",        // loopback
    "169.254.0.0/16",     // link-local
    "172.16.0.0/12",      // RFC 1918
    "192.0.0.0/24",       // IETF protocol assignments
    "192.0.2.0/24",       // TEST-NET-1
    "192.88.99.0/24",     // 6to4 relay anycast (deprecated)
    "192.168.0.0/16",     // RFC 1918
    "198.18.0.0/15",      // benchmarking
    "198.51.100.0/24",    // TEST-NET-2
    "203.0.113.0/24",     // TEST-NET-3
    "224.0.0.0/4",        // multicast
    "240.0.0.0/4",        // reserved, includes broadcast
    // IPv6
    "::/128",             // unspecified
    "::1/128",            // loopback
    "::ffff:0:0/96",      // IPv4-mapped
    "64:ff9b:1::/48",     // local-use NAT64
    "100::/64",           // discard-only
    "2001::/23",          // IETF protocol assignments
    "2001:db8::/32",      // documentation
    "2002::/16",          // 6to4
    "fc00::/7",           // unique local
    "fe80::/10",          // link-local
    "ff00::/8",           // multicast
];

static RESERVED: LazyLock<Vec<IpNetwork>> = LazyLock::new(|| {
    RESERVED_PREFIXES
        .iter()
        .filter_map(|p| p.parse::<IpNetwork>().ok())
        .collect()
});

/// Whether `addr` is globally routable, i.e. not in any reserved range
pub fn is_global(addr: IpAddr) -> bool {
    !RESERVED.iter().any(|net| net.contains(addr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(s: &str) -> bool {
        is_global(s.parse().unwrap())
    }

    #[test]
    fn test_all_prefixes_parse() {
        assert_eq!(RESERVED.len(), RESERVED_PREFIXES.len());
    }

    #[test]
    fn test_private_ipv4_not_global() {
        for addr in [
            "10.1.2.3",
            "172.16.0.1",
            "172.31.255.254",
            "192.168.1.1",
            "100.64.0.1",
            "127.0.0.1",
            "169.254.10.10",
            "0.0.0.0",
            "255.255.255.255",
            "203.0.113.5",
        ] {
            assert!(!global(addr), "{addr} should not be global");
        }
    }

    #[test]
    fn test_public_ipv4_global() {
        for addr in ["8.8.8.8", "1.1.1.1", "172.32.0.1", "100.128.0.1", "142.250.72.14"] {
            assert!(global(addr), "{addr} should be global");
        }
    }

    #[test]
    fn test_ipv6_classification() {
        assert!(!global("::1"));
        assert!(!global("fe80::1"));
        assert!(!global("fd12:3456::1"));
        assert!(!global("2001:db8::1"));
        assert!(!global("::ffff:192.168.1.1"));
        assert!(global("2001:4860:4860::8888"));
        assert!(global("2606:4700:4700::1111"));
    }
}

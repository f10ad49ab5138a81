use log::warn;

use crate::state::{GeoRecord, Hop, Path};

/// Display-name tag of the synthetic egress hop
pub const PUBLIC_IP_TAG: &str = "(Public IP)";

/// Reduce `path` to its globally-routable hops, fronted by an anchor hop for
/// the local network's public egress address.
///
/// The anchor takes its address and geolocation from `egress` and its
/// latencies from the last private hop before the first public one. Private
/// hops are dropped. Without `egress` no anchor is added.
pub fn public_view(path: &Path, egress: Option<GeoRecord>) -> Path {
    let first_public = path.iter().position(Hop::is_global).unwrap_or(path.len());
    let mut public = Path::new();

    match egress {
        Some(geo) => {
            let latencies = path.hops()[..first_public]
                .last()
                .map(|h| h.latencies.clone())
                .unwrap_or_default();
            public.push(anchor_hop(geo, latencies));
        }
        None => warn!("public egress address unknown, omitting anchor hop"),
    }

    for hop in path.iter().filter(|h| h.is_global()) {
        public.push(hop.clone());
    }
    public
}

fn anchor_hop(geo: GeoRecord, latencies: Vec<f64>) -> Hop {
    let name = if geo.domain.is_empty() {
        PUBLIC_IP_TAG.to_string()
    } else {
        format!("{} {}", geo.domain, PUBLIC_IP_TAG)
    };
    Hop::new(name, geo.addr, latencies).with_geo(Some(geo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::hop::test_geo;
    use std::net::IpAddr;

    fn hop(addr: &str, latencies: Vec<f64>) -> Hop {
        Hop::new("", addr.parse().unwrap(), latencies)
    }

    fn egress() -> GeoRecord {
        let addr: IpAddr = "84.1.2.3".parse().unwrap();
        test_geo(addr, 50.11, 8.68)
    }

    #[test]
    fn test_private_private_public_public() {
        let path: Path = [
            hop("192.168.1.1", vec![1.0, 1.1, 1.2]),
            hop("10.20.0.1", vec![7.0, 8.0]),
            hop("80.81.192.1", vec![9.0]),
            hop("8.8.8.8", vec![10.0]),
        ]
        .into_iter()
        .collect();

        let public = public_view(&path, Some(egress()));

        assert_eq!(public.len(), 3);
        let anchor = &public.hops()[0];
        assert_eq!(anchor.name, PUBLIC_IP_TAG);
        assert_eq!(anchor.addr.to_string(), "84.1.2.3");
        assert_eq!(anchor.latencies, vec![7.0, 8.0]);
        assert!(anchor.geo.is_some());
        assert_eq!(public.hops()[1].addr.to_string(), "80.81.192.1");
        assert_eq!(public.hops()[2].addr.to_string(), "8.8.8.8");
    }

    #[test]
    fn test_late_private_hops_dropped() {
        let path: Path = [
            hop("192.168.1.1", vec![1.0]),
            hop("80.81.192.1", vec![9.0]),
            hop("10.255.0.1", vec![11.0]),
            hop("8.8.8.8", vec![12.0]),
        ]
        .into_iter()
        .collect();

        let public = public_view(&path, Some(egress()));
        let addrs: Vec<String> = public.iter().map(|h| h.addr.to_string()).collect();
        assert_eq!(addrs, ["84.1.2.3", "80.81.192.1", "8.8.8.8"]);
        assert_eq!(public.hops()[0].latencies, vec![1.0]);
    }

    #[test]
    fn test_no_private_prefix_gives_empty_anchor_latencies() {
        let path: Path = [hop("1.1.1.1", vec![3.0])].into_iter().collect();
        let public = public_view(&path, Some(egress()));
        assert_eq!(public.len(), 2);
        assert!(!public.hops()[0].has_samples());
    }

    #[test]
    fn test_anchor_name_uses_domain() {
        let mut geo = egress();
        geo.domain = "isp.example".to_string();
        let public = public_view(&Path::new(), Some(geo));
        assert_eq!(public.hops()[0].name, "isp.example (Public IP)");
    }

    #[test]
    fn test_without_egress_no_anchor() {
        let path: Path = [hop("192.168.1.1", vec![1.0]), hop("8.8.8.8", vec![9.0])]
            .into_iter()
            .collect();
        let public = public_view(&path, None);
        assert_eq!(public.len(), 1);
        assert_eq!(public.hops()[0].addr.to_string(), "8.8.8.8");
    }

    #[test]
    fn test_input_path_unchanged() {
        let path: Path = [hop("192.168.1.1", vec![1.0]), hop("8.8.8.8", vec![9.0])]
            .into_iter()
            .collect();
        let before = path.clone();
        let _ = public_view(&path, Some(egress()));
        assert_eq!(path, before);
    }
}

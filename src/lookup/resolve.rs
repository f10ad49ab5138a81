use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::{Resolver, TokioResolver};
use log::{debug, warn};
use std::net::IpAddr;

use crate::error::{Result, TraceError};

/// Turns a user-supplied target into a single network address
pub struct AddressResolver {
    resolver: TokioResolver,
}

impl AddressResolver {
    pub fn new() -> Self {
        // Try system DNS config first, fall back to Google DNS if unavailable
        let resolver = match Resolver::builder_tokio() {
            Ok(builder) => builder.build(),
            Err(e) => {
                warn!("system DNS config unavailable ({}), using Google DNS", e);
                Resolver::builder_with_config(
                    ResolverConfig::google(),
                    TokioConnectionProvider::default(),
                )
                .build()
            }
        };

        Self { resolver }
    }

    /// Resolve `target` to an address.
    ///
    /// Bare digit strings are rejected outright. Address literals are
    /// returned as-is; anything else goes through DNS, preferring IPv4.
    /// A name that does not resolve yields `Ok(None)`.
    pub async fn resolve(&self, target: &str) -> Result<Option<IpAddr>> {
        let target = check_target(target)?;

        if let Ok(ip) = target.parse::<IpAddr>() {
            return Ok(Some(ip));
        }

        match self.resolver.lookup_ip(target).await {
            Ok(lookup) => {
                let addrs: Vec<IpAddr> = lookup.iter().collect();
                debug!("{} resolved to {:?}", target, addrs);
                Ok(addrs
                    .iter()
                    .find(|ip| ip.is_ipv4())
                    .or_else(|| addrs.first())
                    .copied())
            }
            Err(e) => {
                debug!("failed to resolve {}: {}", target, e);
                Ok(None)
            }
        }
    }
}

impl Default for AddressResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject inputs that can be neither an address nor a host name
fn check_target(target: &str) -> Result<&str> {
    let trimmed = target.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(TraceError::InvalidTarget(target.to_string()));
    }
    Ok(trimmed)
}

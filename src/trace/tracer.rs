use futures::stream::{self, StreamExt};
use log::{debug, info};
use std::net::IpAddr;

use crate::config::Config;
use crate::error::Result;
use crate::lookup::{AddressResolver, Geolocate, is_global};
use crate::parse::{ParsedHop, Platform};
use crate::state::{GeoRecord, Hop, Path, Target, Trace};
use crate::trace::executor::TraceExecutor;
use crate::trace::public::public_view;

/// Drives one trace: run the tool, parse its output, geolocate every hop
/// and assemble the [`Path`].
pub struct Tracer<E, G> {
    executor: E,
    geo: G,
    platform: Platform,
    config: Config,
}

impl<E, G> Tracer<E, G>
where
    E: TraceExecutor,
    G: Geolocate + Sync,
{
    pub fn new(executor: E, geo: G, platform: Platform, config: Config) -> Self {
        Self {
            executor,
            geo,
            platform,
            config,
        }
    }

    /// Build a tracer for the running host, honoring a platform override in
    /// `config`. Fails with `UnsupportedPlatform` before anything is run.
    pub fn for_host(executor: E, geo: G, config: Config) -> Result<Self> {
        let platform = match config.platform {
            Some(platform) => platform,
            None => Platform::detect()?,
        };
        Ok(Self::new(executor, geo, platform, config))
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Resolve `input` and trace it. `Ok(None)` means the name did not
    /// resolve.
    pub async fn trace_input(&self, resolver: &AddressResolver, input: &str) -> Result<Option<Trace>> {
        let Some(addr) = resolver.resolve(input).await? else {
            return Ok(None);
        };
        self.run(Target::new(input.to_string(), addr)).await.map(Some)
    }

    /// Trace an already-resolved target.
    ///
    /// When the target never shows up among the replying hops, a final hop
    /// is synthesized for it using the latencies of the last observed hop.
    /// An empty path is returned as-is.
    pub async fn run(&self, target: Target) -> Result<Trace> {
        let mut trace = Trace::new(target);
        let addr = trace.target.resolved;

        debug!("tracing {} ({}) with {} dialect", trace.target.original, addr, self.platform);
        let output = self
            .executor
            .execute(self.platform, addr, self.config.trace_timeout)
            .await?;

        let parsed = self.platform.parse(&output);
        debug!("parsed {} hops", parsed.len());

        for hop in self.enrich(parsed).await {
            trace.path.push(hop);
        }

        if let Some(last) = trace.path.last()
            && !trace.path.contains_addr(addr)
        {
            let latencies = last.latencies.clone();
            let geo = self.locate(addr).await;
            let name = synthetic_name(&trace.target, geo.as_ref());
            info!("{} did not reply, appending it as the final hop", addr);
            trace.path.push(Hop::new(name, addr, latencies).with_geo(geo));
            trace.target_synthesized = true;
        }

        Ok(trace)
    }

    /// Public-only view of `path`, anchored at this host's egress address
    pub async fn public_view(&self, path: &Path) -> Path {
        let egress = self.geo.lookup_self().await;
        public_view(path, egress)
    }

    /// Turn parsed tuples into hops, geolocating them concurrently while
    /// keeping hop order
    async fn enrich(&self, parsed: Vec<ParsedHop>) -> Vec<Hop> {
        stream::iter(parsed)
            .map(|p| async move {
                let geo = self.locate(p.addr).await;
                Hop::new(p.name, p.addr, p.latencies).with_geo(geo)
            })
            .buffered(self.config.max_concurrent_lookups.max(1))
            .collect()
            .await
    }

    /// Reserved addresses are never sent to the provider
    async fn locate(&self, addr: IpAddr) -> Option<GeoRecord> {
        if !self.config.geo_enabled || !is_global(addr) {
            return None;
        }
        self.geo.lookup(addr).await
    }
}

/// Display name for a target that never replied
fn synthetic_name(target: &Target, geo: Option<&GeoRecord>) -> String {
    if target.original.parse::<IpAddr>().is_err() {
        return target.original.clone();
    }
    geo.map(|g| g.domain.clone()).unwrap_or_default()
}

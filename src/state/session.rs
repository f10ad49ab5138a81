use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::path::Path;

/// Target being traced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// What the user typed
    pub original: String,
    pub resolved: IpAddr,
}

impl Target {
    pub fn new(original: String, resolved: IpAddr) -> Self {
        Self { original, resolved }
    }
}

/// A finished trace: the full hop path plus run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    pub target: Target,
    pub started_at: DateTime<Utc>,
    pub path: Path,
    /// A trailing hop was synthesized because the target never replied
    pub target_synthesized: bool,
}

impl Trace {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            started_at: Utc::now(),
            path: Path::new(),
            target_synthesized: false,
        }
    }

    /// The target replied to at least one probe
    pub fn target_reached(&self) -> bool {
        !self.target_synthesized && self.path.contains_addr(self.target.resolved)
    }
}

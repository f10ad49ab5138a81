use std::time::Duration;
use thiserror::Error;

/// Errors raised by the trace pipeline.
///
/// Geolocation failures are intentionally absent: they degrade to missing
/// data on the affected hop and never abort a run.
#[derive(Error, Debug)]
pub enum TraceError {
    /// Target is neither an address literal nor a resolvable name
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// No traceroute dialect is known for the host operating system
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The external traceroute tool exceeded its time budget
    #[error("traceroute did not finish within {}s", .0.as_secs())]
    ExecutionTimeout(Duration),

    /// A latency accessor was called on a hop where every probe timed out
    #[error("hop has no latency samples")]
    NoSamples,

    /// The external traceroute tool could not be spawned or read
    #[error("failed to run traceroute: {0}")]
    Execution(#[from] std::io::Error),
}

pub type Result<T, E = TraceError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_uses_seconds() {
        let err = TraceError::ExecutionTimeout(Duration::from_secs(60));
        assert_eq!(err.to_string(), "traceroute did not finish within 60s");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "tracert");
        let err: TraceError = io.into();
        assert!(matches!(err, TraceError::Execution(_)));
    }
}

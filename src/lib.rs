// Public API - data model, pipeline stages and export functions
pub mod config;
pub mod error;
pub mod export;
pub mod lookup;
pub mod parse;
pub mod prefs;
pub mod state;
pub mod trace;

pub use error::{Result, TraceError};

/// Sanitize a string for safe terminal display by removing control characters.
///
/// Host names come from traceroute output and geolocation fields from a
/// third-party service; neither may inject terminal escape sequences.
pub(crate) fn sanitize_display(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_display_strips_escapes() {
        assert_eq!(sanitize_display("evil\u{1b}[2Jhost"), "evil[2Jhost");
        assert_eq!(sanitize_display("plain.example"), "plain.example");
    }
}

//! Traceroute transcript parsing
//!
//! Each supported operating system prints its own traceroute dialect. The
//! dialect is chosen once per run from the detected [`Platform`] and turned
//! into plain [`ParsedHop`] tuples; geolocation happens later.

pub mod unix;
pub mod windows;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::{Result, TraceError};

/// One route line pulled out of a transcript
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedHop {
    /// Display name, empty when the tool printed only an address
    pub name: String,
    pub addr: IpAddr,
    /// Replies in milliseconds, in probe order, timeouts dropped
    pub latencies: Vec<f64>,
}

/// Host traceroute dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// `tracert`
    Windows,
    /// `traceroute` on Linux, macOS and the BSDs
    Unix,
}

impl Platform {
    /// Platform of the running host
    pub fn detect() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (as in `std::env::consts::OS`) to a dialect
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "windows" => Ok(Self::Windows),
            "linux" | "macos" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Ok(Self::Unix),
            other => Err(TraceError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Program and arguments to trace `target`
    pub fn command(&self, target: IpAddr) -> (&'static str, Vec<String>) {
        let mut args = Vec::new();
        match self {
            Self::Windows => {
                if target.is_ipv6() {
                    args.push("-6".to_string());
                }
                args.extend(["-w".to_string(), "1000".to_string()]);
                args.push(target.to_string());
                ("tracert", args)
            }
            Self::Unix => {
                if target.is_ipv6() {
                    args.push("-6".to_string());
                }
                args.push(target.to_string());
                ("traceroute", args)
            }
        }
    }

    /// Parse a transcript in this platform's dialect
    pub fn parse(&self, output: &str) -> Vec<ParsedHop> {
        match self {
            Self::Windows => windows::parse(output),
            Self::Unix => unix::parse(output),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Unix => "unix",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "windows" => Ok(Self::Windows),
            "unix" | "linux" | "macos" | "darwin" => Ok(Self::Unix),
            other => Err(TraceError::UnsupportedPlatform(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_os() {
        assert_eq!(Platform::from_os("windows").unwrap(), Platform::Windows);
        assert_eq!(Platform::from_os("linux").unwrap(), Platform::Unix);
        assert_eq!(Platform::from_os("macos").unwrap(), Platform::Unix);
        assert!(matches!(
            Platform::from_os("java"),
            Err(TraceError::UnsupportedPlatform(os)) if os == "java"
        ));
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("Darwin".parse::<Platform>().unwrap(), Platform::Unix);
        assert_eq!("WINDOWS".parse::<Platform>().unwrap(), Platform::Windows);
        assert!("plan9".parse::<Platform>().is_err());
    }

    #[test]
    fn test_commands() {
        let v4: IpAddr = "8.8.8.8".parse().unwrap();
        let v6: IpAddr = "2001:4860:4860::8888".parse().unwrap();

        let (prog, args) = Platform::Unix.command(v4);
        assert_eq!(prog, "traceroute");
        assert_eq!(args, ["8.8.8.8"]);

        let (prog, args) = Platform::Windows.command(v6);
        assert_eq!(prog, "tracert");
        assert_eq!(args, ["-6", "-w", "1000", "2001:4860:4860::8888"]);
    }
}

use log::{debug, warn};
use std::future::Future;
use std::net::IpAddr;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::error::{Result, TraceError};
use crate::parse::Platform;

/// Runs a traceroute and hands back its raw transcript
pub trait TraceExecutor {
    fn execute(
        &self,
        platform: Platform,
        target: IpAddr,
        timeout: Duration,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Runs the operating system's own traceroute tool
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl TraceExecutor for SystemExecutor {
    async fn execute(&self, platform: Platform, target: IpAddr, timeout: Duration) -> Result<String> {
        let (program, args) = platform.command(target);
        debug!("running {} {}", program, args.join(" "));

        let mut command = Command::new(program);
        command.args(&args);
        run_command(command, timeout).await
    }
}

/// Run `command` to completion, collecting stdout, within `timeout`
async fn run_command(mut command: Command, timeout: Duration) -> Result<String> {
    // Dropping the future (timeout or Ctrl+C) kills the child
    let output = command
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(timeout, output).await {
        Ok(result) => result?,
        Err(_) => return Err(TraceError::ExecutionTimeout(timeout)),
    };

    if !output.status.success() {
        warn!("traceroute exited with {}", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Replays a saved transcript instead of running anything
#[derive(Debug, Clone, Default)]
pub struct Transcript(pub String);

impl TraceExecutor for Transcript {
    async fn execute(&self, _platform: Platform, _target: IpAddr, _timeout: Duration) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transcript_returns_text() {
        let exec = Transcript("hello".to_string());
        let out = exec
            .execute(Platform::Unix, "8.8.8.8".parse().unwrap(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_command_times_out() {
        let mut command = Command::new("sleep");
        command.arg("5");
        let result = run_command(command, Duration::from_millis(100)).await;
        assert!(matches!(result, Err(TraceError::ExecutionTimeout(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_stdout_collected() {
        let mut command = Command::new("echo");
        command.arg("1  10.0.0.1  1.0 ms");
        let out = run_command(command, Duration::from_secs(5)).await.unwrap();
        assert_eq!(out.trim(), "1  10.0.0.1  1.0 ms");
    }

    #[tokio::test]
    async fn test_missing_program_is_execution_error() {
        let command = Command::new("traceplot-no-such-binary");
        let result = run_command(command, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(TraceError::Execution(_))));
    }
}

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::parser::parse_snapshot;
use crate::domain::Snapshot;
use crate::ports::{CollectorError, StatsSource};

/// Go template handed to `docker stats --format`
pub const STATS_FORMAT: &str = "{{.Name}},{{.CPUPerc}},{{.MemUsage}}";

/// Stats source that shells out to the container runtime CLI
#[derive(Debug, Clone)]
pub struct DockerCliAdapter {
    runtime_bin: String,
    timeout: Option<Duration>,
}

impl DockerCliAdapter {
    pub fn new(runtime_bin: impl Into<String>) -> Self {
        Self {
            runtime_bin: runtime_bin.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn command_line(&self) -> String {
        format!("{} stats", self.runtime_bin)
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.runtime_bin);
        cmd.args(["stats", "--no-stream", "--format", STATS_FORMAT])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self) -> Result<String, CollectorError> {
        let child = self
            .build_command()
            .spawn()
            .map_err(|source| CollectorError::Spawn {
                command: self.command_line(),
                source,
            })?;

        // Dropping the child on timeout kills it
        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| CollectorError::Timeout {
                    command: self.command_line(),
                    timeout,
                })??,
            None => child.wait_with_output().await?,
        };

        if !output.status.success() {
            warn!(
                "{} exited with {}: {}",
                self.command_line(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(decode_output(&output.stdout))
    }
}

/// Runtime output is not guaranteed to be UTF-8; bad bytes become U+FFFD
fn decode_output(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl Default for DockerCliAdapter {
    fn default() -> Self {
        Self::new("docker")
    }
}

#[async_trait]
impl StatsSource for DockerCliAdapter {
    async fn snapshot(&self) -> Result<Snapshot, CollectorError> {
        let stdout = self.run().await?;
        debug!("{} returned {} bytes", self.command_line(), stdout.len());
        Ok(parse_snapshot(&stdout))
    }
}

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Snapshot;

/// Failure to obtain a snapshot at all. Individual bad lines are not errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("Failed to read runtime output: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for fetching a one-shot snapshot of container resource usage
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn snapshot(&self) -> Result<Snapshot, CollectorError>;
}

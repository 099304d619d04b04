use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time resource usage of a single container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStat {
    pub name: String,
    /// CPU usage in percent, as reported by the runtime
    pub cpu_usage: f64,
    /// Used memory in MB
    pub memory_usage: f64,
}

impl ContainerStat {
    pub fn new(name: impl Into<String>, cpu_usage: f64, memory_usage: f64) -> Self {
        Self {
            name: name.into(),
            cpu_usage,
            memory_usage,
        }
    }
}

/// A line of runtime output that could not be turned into a `ContainerStat`
#[derive(Debug, Clone)]
pub struct SkippedLine {
    pub line_number: usize,
    pub line: String,
    pub reason: String,
}

/// One read of all container stats, in the order the runtime printed them
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub collected_at: DateTime<Utc>,
    pub stats: Vec<ContainerStat>,
    pub skipped: Vec<SkippedLine>,
}

impl Snapshot {
    pub fn new(stats: Vec<ContainerStat>, skipped: Vec<SkippedLine>) -> Self {
        Self {
            collected_at: Utc::now(),
            stats,
            skipped,
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}

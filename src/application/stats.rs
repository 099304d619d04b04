use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ContainerStat;
use crate::ports::{CollectorError, StatsSource};

/// Application service turning a runtime snapshot into API records
pub struct StatsService {
    stats_source: Arc<dyn StatsSource>,
}

impl StatsService {
    pub fn new(stats_source: Arc<dyn StatsSource>) -> Self {
        Self { stats_source }
    }

    /// Collect current container stats in runtime output order.
    ///
    /// Lines the parser rejected are logged and left out; the caller only
    /// sees the records that parsed.
    pub async fn collect(&self) -> Result<Vec<ContainerStat>, CollectorError> {
        let snapshot = self.stats_source.snapshot().await?;

        for skipped in &snapshot.skipped {
            warn!(
                "Error processing line {}: {:?}. Error: {}",
                skipped.line_number, skipped.line, skipped.reason
            );
        }

        if snapshot.is_partial() {
            warn!(
                "Partial snapshot: {} containers collected, {} lines skipped",
                snapshot.stats.len(),
                snapshot.skipped.len()
            );
        } else {
            debug!(
                "Collected {} containers at {}",
                snapshot.stats.len(),
                snapshot.collected_at.to_rfc3339()
            );
        }

        Ok(snapshot.stats)
    }
}

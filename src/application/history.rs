use crate::domain::entities::snapshot::PriceSnapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::price_repository::PriceRepository;
use crate::domain::values::snapshot_source::SnapshotSource;
use chrono::Utc;
use std::sync::Arc;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

pub struct HistoryUseCase {
    repo: Arc<dyn PriceRepository>,
}

impl HistoryUseCase {
    pub fn new(repo: Arc<dyn PriceRepository>) -> Self {
        Self { repo }
    }

    /// Newest stored rows across all dates. `lastUpdated` reflects the whole
    /// table, not just the returned page.
    pub fn execute(&self, limit: usize) -> PriceSnapshot {
        match self.query(limit) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "failed to read market price history");
                PriceSnapshot::failure(SnapshotSource::Database, e.to_string())
            }
        }
    }

    fn query(&self, limit: usize) -> Result<PriceSnapshot, DomainError> {
        let rows = self.repo.recent(limit)?;
        let last_updated = self.repo.last_updated()?.unwrap_or_else(Utc::now);
        let data = rows.into_iter().map(|r| r.record).collect();
        Ok(PriceSnapshot::success(data, SnapshotSource::Database, last_updated))
    }
}

use crate::domain::entities::snapshot::PriceSnapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::price_repository::PriceRepository;
use crate::domain::values::snapshot_source::SnapshotSource;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

/// Latest known prices: the requested day if stored, otherwise the most
/// recent earlier day.
pub struct LatestPricesUseCase {
    repo: Arc<dyn PriceRepository>,
}

impl LatestPricesUseCase {
    pub fn new(repo: Arc<dyn PriceRepository>) -> Self {
        Self { repo }
    }

    pub fn execute(&self, today: NaiveDate) -> PriceSnapshot {
        match self.query(today) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(%today, error = %e, "failed to read latest market prices");
                PriceSnapshot::failure(SnapshotSource::Database, e.to_string())
            }
        }
    }

    fn query(&self, today: NaiveDate) -> Result<PriceSnapshot, DomainError> {
        let rows = self.repo.prices_on(today)?;
        if !rows.is_empty() {
            return Ok(PriceSnapshot::from_stored(rows));
        }

        match self.repo.latest_date_on_or_before(today)? {
            Some(latest) => {
                tracing::debug!(%today, %latest, "no prices for today, serving latest stored day");
                Ok(PriceSnapshot::from_stored(self.repo.prices_on(latest)?))
            }
            None => Ok(PriceSnapshot::success(Vec::new(), SnapshotSource::Database, Utc::now())),
        }
    }
}

use crate::domain::entities::price_record::PriceRecord;
use crate::domain::entities::snapshot::PriceSnapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::price_repository::PriceRepository;
use crate::domain::ports::ticker_source::TickerSource;
use crate::domain::values::snapshot_source::SnapshotSource;
use crate::infrastructure::feeds::ticker_page::TickerPageExtractor;
use chrono::Utc;
use std::sync::Arc;

/// Fetch the ticker page, extract its records and upsert them.
pub struct IngestUseCase {
    source: Arc<dyn TickerSource>,
    extractor: Arc<TickerPageExtractor>,
    repo: Arc<dyn PriceRepository>,
}

impl IngestUseCase {
    pub fn new(
        source: Arc<dyn TickerSource>,
        extractor: Arc<TickerPageExtractor>,
        repo: Arc<dyn PriceRepository>,
    ) -> Self {
        Self {
            source,
            extractor,
            repo,
        }
    }

    /// Never fails: network and storage problems come back as a failure
    /// snapshot tagged `api`.
    pub async fn execute(&self) -> PriceSnapshot {
        let html = match self.source.fetch_page().await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(source = self.source.name(), error = %e, "failed to fetch ticker page");
                return PriceSnapshot::failure(SnapshotSource::Api, e.to_string());
            }
        };

        let records = self.extractor.extract(&html, Utc::now().date_naive());

        if records.is_empty() {
            tracing::info!(source = self.source.name(), "ticker page had no usable prices");
            return PriceSnapshot::success(records, SnapshotSource::Api, Utc::now());
        }

        // rusqlite blocks; keep it off the async workers.
        let repo = self.repo.clone();
        let saved = tokio::task::spawn_blocking(move || -> Result<Vec<PriceRecord>, DomainError> {
            repo.upsert_all(&records)?;
            Ok(records)
        })
        .await;

        let records = match saved {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "failed to save market prices");
                return PriceSnapshot::failure(SnapshotSource::Api, e.to_string());
            }
            Err(e) => {
                tracing::error!(error = %e, "market price save task failed");
                return PriceSnapshot::failure(SnapshotSource::Api, format!("save task failed: {e}"));
            }
        };
        tracing::info!(count = records.len(), source = self.source.name(), "saved market prices");

        PriceSnapshot::success(records, SnapshotSource::Api, Utc::now())
    }
}

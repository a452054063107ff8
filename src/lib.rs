pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;

use crate::application::history::HistoryUseCase;
use crate::application::ingest::IngestUseCase;
use crate::application::latest::LatestPricesUseCase;
use crate::config::Config;
use crate::domain::entities::price_record::PriceRecord;
use crate::domain::entities::snapshot::PriceSnapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::price_repository::PriceRepository;
use crate::domain::ports::ticker_source::TickerSource;
use crate::infrastructure::feeds::agmarknet::AgmarknetFeed;
use crate::infrastructure::feeds::ticker_page::TickerPageExtractor;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::price_repo::SqlitePriceRepo;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::Arc;

/// The price service. Built once at startup and shared by the HTTP layer and
/// the scheduler through an `Arc`.
pub struct MandiPrice {
    repo: Arc<dyn PriceRepository>,
    ingest_uc: IngestUseCase,
    latest_uc: LatestPricesUseCase,
    history_uc: HistoryUseCase,
}

impl MandiPrice {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        let source: Arc<dyn TickerSource> = Arc::new(AgmarknetFeed::new(
            config.ticker_url.clone(),
            config.fetch_timeout,
        ));
        Self::with_source(&config.db_path, source)
    }

    /// Opens (and migrates) the SQLite database at `db_path`.
    pub fn with_source(db_path: &str, source: Arc<dyn TickerSource>) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path).map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL").map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;

        run_migrations(&conn)?;

        let repo: Arc<dyn PriceRepository> = Arc::new(SqlitePriceRepo::new(conn));
        Self::with_parts(source, repo)
    }

    pub fn with_parts(
        source: Arc<dyn TickerSource>,
        repo: Arc<dyn PriceRepository>,
    ) -> Result<Self, DomainError> {
        let extractor = Arc::new(TickerPageExtractor::new()?);

        Ok(Self {
            ingest_uc: IngestUseCase::new(source, extractor, repo.clone()),
            latest_uc: LatestPricesUseCase::new(repo.clone()),
            history_uc: HistoryUseCase::new(repo.clone()),
            repo,
        })
    }

    pub async fn fetch_and_persist(&self) -> PriceSnapshot {
        self.ingest_uc.execute().await
    }

    /// An ingestion run requested by an operator rather than the timer.
    pub async fn trigger_update(&self) -> PriceSnapshot {
        let snapshot = self.fetch_and_persist().await;
        if snapshot.success {
            tracing::info!(items = snapshot.total_items, "manual update completed");
        } else {
            tracing::warn!(error = snapshot.error.as_deref().unwrap_or("unknown"), "manual update failed");
        }
        snapshot
    }

    pub fn upsert_all(&self, records: &[PriceRecord]) -> Result<(), DomainError> {
        self.repo.upsert_all(records)
    }

    pub fn latest_prices(&self, today: NaiveDate) -> PriceSnapshot {
        self.latest_uc.execute(today)
    }

    pub fn price_history(&self, limit: usize) -> PriceSnapshot {
        self.history_uc.execute(limit)
    }
}

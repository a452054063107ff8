//! Shared test helpers.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mandiprice::domain::entities::price_record::{PriceRecord, StoredPrice};
use mandiprice::domain::error::DomainError;
use mandiprice::domain::ports::price_repository::PriceRepository;
use mandiprice::domain::ports::ticker_source::{FeedError, TickerSource};
use mandiprice::domain::values::price::Price;
use mandiprice::infrastructure::sqlite::migrations::run_migrations;
use mandiprice::infrastructure::sqlite::price_repo::SqlitePriceRepo;
use mandiprice::MandiPrice;
use rusqlite::Connection;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Serves a fixed page and counts how often it was asked.
pub struct StaticPage {
    html: String,
    pub calls: AtomicUsize,
}

impl StaticPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TickerSource for StaticPage {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_page(&self) -> Result<String, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.html.clone())
    }
}

pub struct UnreachableSource;

#[async_trait]
impl TickerSource for UnreachableSource {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn fetch_page(&self) -> Result<String, FeedError> {
        Err(FeedError::Network("operation timed out".into()))
    }
}

/// Storage that is always down.
pub struct BrokenRepo;

impl PriceRepository for BrokenRepo {
    fn upsert(&self, _: &PriceRecord, _: DateTime<Utc>) -> Result<(), DomainError> {
        Err(DomainError::Database("disk I/O error".into()))
    }

    fn prices_on(&self, _: NaiveDate) -> Result<Vec<StoredPrice>, DomainError> {
        Err(DomainError::Database("disk I/O error".into()))
    }

    fn latest_date_on_or_before(&self, _: NaiveDate) -> Result<Option<NaiveDate>, DomainError> {
        Err(DomainError::Database("disk I/O error".into()))
    }

    fn recent(&self, _: usize) -> Result<Vec<StoredPrice>, DomainError> {
        Err(DomainError::Database("disk I/O error".into()))
    }

    fn last_updated(&self) -> Result<Option<DateTime<Utc>>, DomainError> {
        Err(DomainError::Database("disk I/O error".into()))
    }
}

/// In-memory SQLite whose `fail_on`-th upsert (1-based) fails.
pub struct FailingNthUpsert {
    inner: SqlitePriceRepo,
    fail_on: usize,
    pub attempts: AtomicUsize,
}

impl FailingNthUpsert {
    pub fn new(fail_on: usize) -> Self {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        Self {
            inner: SqlitePriceRepo::new(conn),
            fail_on,
            attempts: AtomicUsize::new(0),
        }
    }
}

impl PriceRepository for FailingNthUpsert {
    fn upsert(&self, record: &PriceRecord, now: DateTime<Utc>) -> Result<(), DomainError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt == self.fail_on {
            return Err(DomainError::Database("UNIQUE constraint failed".into()));
        }
        self.inner.upsert(record, now)
    }

    fn prices_on(&self, date: NaiveDate) -> Result<Vec<StoredPrice>, DomainError> {
        self.inner.prices_on(date)
    }

    fn latest_date_on_or_before(&self, date: NaiveDate) -> Result<Option<NaiveDate>, DomainError> {
        self.inner.latest_date_on_or_before(date)
    }

    fn recent(&self, limit: usize) -> Result<Vec<StoredPrice>, DomainError> {
        self.inner.recent(limit)
    }

    fn last_updated(&self) -> Result<Option<DateTime<Utc>>, DomainError> {
        self.inner.last_updated()
    }
}

/// Storage whose writes panic.
pub struct PanickingRepo;

impl PriceRepository for PanickingRepo {
    fn upsert(&self, _: &PriceRecord, _: DateTime<Utc>) -> Result<(), DomainError> {
        panic!("connection poisoned");
    }

    fn prices_on(&self, _: NaiveDate) -> Result<Vec<StoredPrice>, DomainError> {
        Ok(Vec::new())
    }

    fn latest_date_on_or_before(&self, _: NaiveDate) -> Result<Option<NaiveDate>, DomainError> {
        Ok(None)
    }

    fn recent(&self, _: usize) -> Result<Vec<StoredPrice>, DomainError> {
        Ok(Vec::new())
    }

    fn last_updated(&self) -> Result<Option<DateTime<Utc>>, DomainError> {
        Ok(None)
    }
}

pub fn setup() -> MandiPrice {
    setup_with(Arc::new(StaticPage::new("")))
}

pub fn setup_with(source: Arc<dyn TickerSource>) -> MandiPrice {
    MandiPrice::with_source(":memory:", source).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn record(commodity: &str, variety: &str, max: f64, min: f64, date: NaiveDate) -> PriceRecord {
    PriceRecord::new(
        commodity,
        variety,
        Price::new(max).unwrap(),
        Price::new(min).unwrap(),
        date,
    )
}

/// A ticker page in AGMARKNET's markup. Items are (commodity, variety, max, min).
pub fn ticker_page(date_label: &str, items: &[(&str, &str, &str, &str)]) -> String {
    let cells: String = items
        .iter()
        .enumerate()
        .map(|(i, (commodity, variety, max, min))| {
            format!(
                r#"<td><div class="ticker">
                    <span id="DataListTicker_ctl{i:02}_lblTicker_{i}">{commodity}</span>
                    <span id="DataListTicker_ctl{i:02}_lblTitle_{i}">{variety}</span>
                    Max: <span id="DataListTicker_ctl{i:02}_lblMaxprice_{i}">{max}</span>
                    Min: <span id="DataListTicker_ctl{i:02}_lblminprice_{i}">{min}</span>
                </div></td>"#
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html><html><head><title>AGMARKNET</title></head><body>
            <form id="form1">
                <table><tr><td><span id="rptrArrdate_lblDate_0">{date_label}</span></td></tr></table>
                <table id="DataListTicker"><tr>{cells}</tr></table>
            </form>
        </body></html>"#
    )
}

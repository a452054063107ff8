use crate::domain::entities::price_record::{PriceRecord, StoredPrice};
use crate::domain::error::DomainError;
use chrono::{DateTime, NaiveDate, Utc};

pub trait PriceRepository: Send + Sync {
    /// Insert or update the row for `record`'s (commodity, variety, date) key,
    /// stamping it with `now`.
    fn upsert(&self, record: &PriceRecord, now: DateTime<Utc>) -> Result<(), DomainError>;

    /// Rows for one date, commodity ascending.
    fn prices_on(&self, date: NaiveDate) -> Result<Vec<StoredPrice>, DomainError>;

    /// Most recent stored date that is not after `date`.
    fn latest_date_on_or_before(&self, date: NaiveDate) -> Result<Option<NaiveDate>, DomainError>;

    /// Newest rows first (date descending, commodity ascending).
    fn recent(&self, limit: usize) -> Result<Vec<StoredPrice>, DomainError>;

    /// Newest `updated_at` across the table.
    fn last_updated(&self) -> Result<Option<DateTime<Utc>>, DomainError>;

    /// Upserts each record in order. Stops at the first failure; rows written
    /// before it stay written.
    fn upsert_all(&self, records: &[PriceRecord]) -> Result<(), DomainError> {
        for record in records {
            self.upsert(record, Utc::now())?;
        }
        Ok(())
    }
}

use crate::domain::entities::price_record::{PriceRecord, StoredPrice};
use crate::domain::error::DomainError;
use crate::domain::ports::price_repository::PriceRepository;
use crate::domain::values::price::Price;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;

const SELECT_COLS: &str = "commodity, variety, max_price, min_price, date, updated_at";
const DATE_FMT: &str = "%Y-%m-%d";

pub struct SqlitePriceRepo {
    conn: Mutex<Connection>,
}

impl SqlitePriceRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn row_to_price(row: &rusqlite::Row) -> Result<StoredPrice, rusqlite::Error> {
        let max_val: f64 = row.get(2)?;
        let min_val: f64 = row.get(3)?;
        let date_str: String = row.get(4)?;
        let updated_str: String = row.get(5)?;

        let date = NaiveDate::parse_from_str(&date_str, DATE_FMT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(StoredPrice {
            record: PriceRecord {
                commodity: row.get(0)?,
                variety: row.get(1)?,
                max_price: Price::new(max_val).unwrap_or_default(),
                min_price: Price::new(min_val).unwrap_or_default(),
                date,
            },
            updated_at: parse_timestamp(&updated_str),
        })
    }

    fn query_prices<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<StoredPrice>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params, Self::row_to_price)
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut prices = Vec::new();
        for row in rows {
            match row {
                Ok(p) => prices.push(p),
                Err(e) => tracing::warn!(error = %e, "skipping unreadable market_prices row"),
            }
        }
        Ok(prices)
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl PriceRepository for SqlitePriceRepo {
    fn upsert(&self, record: &PriceRecord, now: DateTime<Utc>) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let stamp = now.to_rfc3339();
        conn.execute(
            "INSERT INTO market_prices (commodity, variety, max_price, min_price, date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT (commodity, variety, date) DO UPDATE SET
                 max_price = excluded.max_price,
                 min_price = excluded.min_price,
                 updated_at = excluded.updated_at",
            params![
                record.commodity,
                record.variety,
                record.max_price.value(),
                record.min_price.value(),
                record.date.format(DATE_FMT).to_string(),
                stamp,
            ],
        ).map_err(|e| DomainError::Database(format!("Failed to upsert price: {e}")))?;
        Ok(())
    }

    fn prices_on(&self, date: NaiveDate) -> Result<Vec<StoredPrice>, DomainError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM market_prices WHERE date = ?1 ORDER BY commodity ASC, variety ASC"
        );
        self.query_prices(&sql, params![date.format(DATE_FMT).to_string()])
    }

    fn latest_date_on_or_before(&self, date: NaiveDate) -> Result<Option<NaiveDate>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let latest: Option<String> = conn
            .query_row(
                "SELECT MAX(date) FROM market_prices WHERE date <= ?1",
                params![date.format(DATE_FMT).to_string()],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::Database(e.to_string()))?;

        latest
            .map(|s| {
                NaiveDate::parse_from_str(&s, DATE_FMT)
                    .map_err(|e| DomainError::Database(format!("Bad stored date '{s}': {e}")))
            })
            .transpose()
    }

    fn recent(&self, limit: usize) -> Result<Vec<StoredPrice>, DomainError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM market_prices ORDER BY date DESC, commodity ASC, variety ASC LIMIT ?1"
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_prices(&sql, params![limit])
    }

    fn last_updated(&self) -> Result<Option<DateTime<Utc>>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let newest: Option<String> = conn
            .query_row(
                "SELECT updated_at FROM market_prices ORDER BY updated_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(newest.as_deref().and_then(parse_timestamp))
    }
}

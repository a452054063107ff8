use crate::domain::values::price::Price;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One commodity/variety quote for a trading day.
///
/// `(commodity, variety, date)` is the natural key: storage keeps at most one
/// row per triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub commodity: String,
    pub variety: String,
    pub max_price: Price,
    pub min_price: Price,
    pub date: NaiveDate,
}

impl PriceRecord {
    pub fn new(
        commodity: impl Into<String>,
        variety: impl Into<String>,
        max_price: Price,
        min_price: Price,
        date: NaiveDate,
    ) -> Self {
        Self {
            commodity: commodity.into(),
            variety: variety.into(),
            max_price,
            min_price,
            date,
        }
    }
}

/// A record as read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPrice {
    pub record: PriceRecord,
    /// `None` when the stored timestamp could not be read.
    pub updated_at: Option<DateTime<Utc>>,
}

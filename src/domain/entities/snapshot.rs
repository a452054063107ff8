use crate::domain::entities::price_record::{PriceRecord, StoredPrice};
use crate::domain::values::snapshot_source::SnapshotSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response envelope for every price query and ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    pub success: bool,
    pub data: Vec<PriceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub total_items: usize,
    pub source: SnapshotSource,
}

impl PriceSnapshot {
    pub fn success(data: Vec<PriceRecord>, source: SnapshotSource, last_updated: DateTime<Utc>) -> Self {
        Self {
            success: true,
            total_items: data.len(),
            data,
            error: None,
            last_updated,
            source,
        }
    }

    pub fn failure(source: SnapshotSource, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            error: Some(error.into()),
            last_updated: Utc::now(),
            total_items: 0,
            source,
        }
    }

    /// Builds a `database` snapshot from stored rows. `lastUpdated` is the
    /// newest row timestamp, or now when no row carries one.
    pub fn from_stored(rows: Vec<StoredPrice>) -> Self {
        let last_updated = rows
            .iter()
            .filter_map(|r| r.updated_at)
            .max()
            .unwrap_or_else(Utc::now);
        let data = rows.into_iter().map(|r| r.record).collect();
        Self::success(data, SnapshotSource::Database, last_updated)
    }
}

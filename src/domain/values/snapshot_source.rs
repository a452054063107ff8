use serde::{Deserialize, Serialize};

/// Where the records in a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    /// Read back from storage.
    Database,
    /// Freshly scraped from the ticker page.
    Api,
}

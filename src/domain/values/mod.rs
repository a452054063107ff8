pub mod price;
pub mod snapshot_source;

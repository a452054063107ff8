pub mod history;
pub mod ingest;
pub mod latest;
pub mod scheduler;

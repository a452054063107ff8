pub mod price_repository;
pub mod ticker_source;

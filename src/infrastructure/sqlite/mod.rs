pub mod migrations;
pub mod price_repo;

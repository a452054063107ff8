use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS market_prices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            commodity TEXT NOT NULL,
            variety TEXT NOT NULL,
            max_price REAL NOT NULL,
            min_price REAL NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (commodity, variety, date)
        );

        CREATE INDEX IF NOT EXISTS idx_prices_date ON market_prices(date);
        CREATE INDEX IF NOT EXISTS idx_prices_updated ON market_prices(updated_at);
        "
    ).map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}

use crate::domain::error::DomainError;
use crate::infrastructure::feeds::agmarknet::DEFAULT_TICKER_URL;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: String,
    pub bind_addr: SocketAddr,
    pub ticker_url: String,
    pub fetch_timeout: Duration,
    pub refresh_period: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "./mandiprice.db".into(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            ticker_url: DEFAULT_TICKER_URL.into(),
            fetch_timeout: Duration::from_secs(10),
            refresh_period: Duration::from_secs(3600),
        }
    }
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, DomainError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|e| DomainError::Config(format!("PORT '{p}': {e}")))?,
            None => defaults.bind_addr.port(),
        };

        Ok(Self {
            db_path: lookup("MANDIPRICE_DB").unwrap_or(defaults.db_path),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            ticker_url: lookup("MANDIPRICE_TICKER_URL").unwrap_or(defaults.ticker_url),
            fetch_timeout: secs(&lookup, "MANDIPRICE_FETCH_TIMEOUT_SECS", defaults.fetch_timeout)?,
            refresh_period: secs(&lookup, "MANDIPRICE_REFRESH_SECS", defaults.refresh_period)?,
        })
    }
}

fn secs<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(DomainError::Config(format!("{key} must be greater than zero"))),
        Ok(n) => Ok(Duration::from_secs(n)),
        Err(e) => Err(DomainError::Config(format!("{key} '{raw}': {e}"))),
    }
}

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mandiprice", about = "AGMARKNET commodity price scraper and API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API and the hourly ingestion scheduler
    Serve,
    /// Fetch the ticker page once and store its prices
    Fetch,
    /// Print the latest stored prices
    Latest {
        /// Day to look up (YYYY-MM-DD), defaults to today (UTC)
        #[arg(long)]
        date: Option<String>,
    },
    /// Print the most recent stored prices across all days
    History {
        #[arg(long, default_value = "100")]
        limit: usize,
    },
}

use chrono::{NaiveDate, Utc};
use clap::Parser;
use mandiprice::application::scheduler::Scheduler;
use mandiprice::cli::commands::{Cli, Commands};
use mandiprice::config::Config;
use mandiprice::http::routes;
use mandiprice::MandiPrice;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    // RUST_LOG=debug mandiprice serve
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    fmt().with_env_filter(env_filter).with_target(false).init();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Error loading config: {e}");
            std::process::exit(1);
        }
    };

    let app = match MandiPrice::new(&config) {
        Ok(app) => Arc::new(app),
        Err(e) => {
            tracing::error!("Error initializing mandiprice: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(app, &config, cli.command).await {
        tracing::error!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(
    app: Arc<MandiPrice>,
    config: &Config,
    cmd: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Serve => {
            let _scheduler = Scheduler::new(app.clone(), config.refresh_period).start();
            routes::serve(app, config.bind_addr).await?;
        }
        Commands::Fetch => {
            let snapshot = app.trigger_update().await;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Latest { date } => {
            let day = parse_day(date.as_deref())?;
            let snapshot = app.latest_prices(day);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::History { limit } => {
            let snapshot = app.price_history(limit);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}

fn parse_day(s: Option<&str>) -> Result<NaiveDate, String> {
    match s {
        None => Ok(Utc::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date format: {s}. Use YYYY-MM-DD")),
    }
}

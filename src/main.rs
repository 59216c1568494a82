use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod utils;

use api::market::MarketDataClient;
use config::Config;
use services::dashboard_service::{Dashboard, OutcomeStatus};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    let mut filter = EnvFilter::from_default_env();
    for directive in ["revanalytica=debug", "reqwest=warn", "hyper=warn"] {
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting RevAnalytica market overview...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    let client = MarketDataClient::with_base_url(&config.api_url);
    info!("Market service: {}", client.base_url());
    info!("Chart output: {}", config.chart_path.display());

    let mut dashboard = Dashboard::new(client);

    if dashboard.start().await.is_err() {
        warn!("No eligible hotels loaded; the selection stays empty");
    }

    println!("{}", commands::help::execute());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !commands::handle_line(&mut dashboard, &config, &line) {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read console input: {}", e);
                    break;
                }
            },
            Some(status) = dashboard.next_outcome() => {
                if status == OutcomeStatus::Applied {
                    commands::chart::render_current(&dashboard, &config);
                }
            }
        }
    }

    info!("Shutting down");
}

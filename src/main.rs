mod cli;
mod config;
mod database;
mod models;
mod seeds;
mod services;
mod utils;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;

use crate::cli::Cli;
use crate::config::AppConfig;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        log::error!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Invalid configuration")?;

    log::info!("🚀 Starting gestionnaire reconciliation...");
    log::info!("📊 Database: {} ({})", config.database.name, config.app_env);

    cli::execute(cli.command, &config)
        .await
        .context("Reconciliation run failed")?;

    log::info!("✨ Done");
    Ok(())
}

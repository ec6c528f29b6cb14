// src/main.rs
// hydrorisk - train, serve and query the water-quality risk classifier

use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use hydrorisk::cli::{Cli, Commands, run_predict, run_serve, run_train};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv(); // Load .env from current directory

    let cli = Cli::parse();

    // HYDRORISK_LOG overrides the per-command default
    let log_level = std::env::var("HYDRORISK_LOG")
        .ok()
        .and_then(|v| Level::from_str(v.trim()).ok())
        .unwrap_or_else(|| cli.command.default_log_level());

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = hydrorisk::config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Train(args) => {
            let mut stdout = std::io::stdout().lock();
            run_train(args, &config, &mut stdout)?;
        }
        Commands::Serve(args) => {
            run_serve(args, &config).await?;
        }
        Commands::Predict(args) => {
            let mut stdout = std::io::stdout().lock();
            run_predict(args, &config, &mut stdout)?;
        }
    }

    Ok(())
}

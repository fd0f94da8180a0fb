// src/main.rs
mod cli;
mod logging;

use clap::Parser;
use cli::Args;
use nba_ingest::config::Config;
use nba_ingest::data_fetcher::api::ApiClient;
use nba_ingest::error::AppError;
use nba_ingest::pipeline::Pipeline;
use tracing::{error, info};

/// Applies command line overrides on top of the loaded configuration.
fn apply_args(config: &mut Config, args: &Args) {
    if !args.seasons.is_empty() {
        config.seasons = args.seasons.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(log_file) = &args.log_file {
        config.log_file_path = Some(log_file.clone());
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    if args.list_config {
        return Config::display().await;
    }

    let mut config = Config::load().await?;
    apply_args(&mut config, &args);
    config.validate()?;

    // Keep the guard alive until the end of main so the file log is flushed
    let (log_file_path, _guard) = logging::setup_logging(&args, &config).await?;
    info!("Logs are written to {}", log_file_path);

    // No request leaves the process without a credential
    let api = match ApiClient::new(&config) {
        Ok(api) => api,
        Err(e) => {
            error!("{e}");
            return Err(e);
        }
    };

    info!(
        "Ingesting seasons {:?} into {}",
        config.seasons, config.output_dir
    );
    let pipeline = Pipeline::new(api, &config.output_dir);
    match pipeline
        .run(&config.seasons, !args.skip_season_independent)
        .await
    {
        Ok(report) => {
            info!("Run summary:\n{report}");
            Ok(())
        }
        Err(e) => {
            error!("Ingestion failed: {e}");
            Err(e)
        }
    }
}

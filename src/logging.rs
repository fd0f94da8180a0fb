use crate::cli::Args;
use nba_ingest::config::Config;
use nba_ingest::error::AppError;
use std::io::stdout;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_NAME: &str = "nba_ingest.log";

/// Splits the log location into directory and file name. The command line
/// wins over the config file; without either the default log dir is used.
fn log_location(args: &Args, config: &Config) -> (String, String) {
    match args.log_file.as_ref().or(config.log_file_path.as_ref()) {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(LOG_FILE_NAME);
            (parent.to_string_lossy().to_string(), file_name.to_string())
        }
        None => (Config::get_log_dir_path(), LOG_FILE_NAME.to_string()),
    }
}

fn crate_filter(debug: bool) -> Result<EnvFilter, AppError> {
    let directive = if debug {
        "nba_ingest=debug"
    } else {
        "nba_ingest=info"
    };
    let directive = directive
        .parse()
        .map_err(|e| AppError::log_setup_error(format!("Invalid log directive: {e}")))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Sets up logging to stdout and to a daily rolling file.
///
/// Returns the path to the log file and the guard that must be kept alive
/// for the duration of the program to ensure proper log flushing.
pub async fn setup_logging(args: &Args, config: &Config) -> Result<(String, WorkerGuard), AppError> {
    let (log_dir, log_file_name) = log_location(args, config);

    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::Layer::new()
                .with_writer(stdout)
                .with_ansi(true)
                .with_filter(crate_filter(args.debug)?),
        )
        .with(
            fmt::Layer::new()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(crate_filter(args.debug)?),
        )
        .try_init()
        .map_err(|e| AppError::log_setup_error(format!("Failed to install subscriber: {e}")))?;

    let log_file_path = format!("{log_dir}/{log_file_name}");
    Ok((log_file_path, guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_location_prefers_command_line() {
        let args = Args {
            log_file: Some("/tmp/cli/run.log".to_string()),
            ..Args::default()
        };
        let config = Config {
            log_file_path: Some("/tmp/config/other.log".to_string()),
            ..Config::default()
        };
        assert_eq!(
            log_location(&args, &config),
            ("/tmp/cli".to_string(), "run.log".to_string())
        );
    }

    #[test]
    fn test_log_location_bare_file_name() {
        let config = Config {
            log_file_path: Some("ingest.log".to_string()),
            ..Config::default()
        };
        assert_eq!(
            log_location(&Args::default(), &config),
            (".".to_string(), "ingest.log".to_string())
        );
    }

    #[test]
    fn test_log_location_default() {
        let (dir, file) = log_location(&Args::default(), &Config::default());
        assert_eq!(dir, Config::get_log_dir_path());
        assert_eq!(file, LOG_FILE_NAME);
    }

    #[test]
    fn test_crate_filter_levels() {
        assert!(crate_filter(false).unwrap().to_string().contains("nba_ingest=info"));
        assert!(crate_filter(true).unwrap().to_string().contains("nba_ingest=debug"));
    }
}

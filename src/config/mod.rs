use crate::constants::{self, env_vars};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// API credential. Kept out of the config file and out of `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        ApiKey(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Backoff settings for rate limited and transient failures.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RetrySettings {
    /// Attempts per request, first try included
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry
    pub initial_delay_ms: u64,
    /// Cap for a single delay
    pub max_delay_ms: u64,
    /// Pause after a server error before the next box score date
    pub server_error_skip_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings {
            max_attempts: constants::retry::MAX_ATTEMPTS,
            initial_delay_ms: constants::retry::INITIAL_DELAY_MS,
            max_delay_ms: constants::retry::MAX_DELAY_MS,
            server_error_skip_delay_ms: constants::retry::SERVER_ERROR_SKIP_DELAY_MS,
        }
    }
}

/// Configuration structure for the application.
/// Handles loading, saving, and managing ingestion settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the statistics API, scheme included.
    #[serde(default = "default_api_domain")]
    pub api_domain: String,
    /// Directory receiving CSV outputs and intermediate box score documents.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Seasons processed in order.
    #[serde(default = "default_seasons")]
    pub seasons: Vec<i32>,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    #[serde(default)]
    pub retry: RetrySettings,
    /// Only ever read from the environment.
    #[serde(skip)]
    pub api_key: Option<ApiKey>,
}

fn default_api_domain() -> String {
    constants::DEFAULT_API_DOMAIN.to_string()
}

fn default_output_dir() -> String {
    constants::DEFAULT_OUTPUT_DIR.to_string()
}

fn default_seasons() -> Vec<i32> {
    constants::DEFAULT_SEASONS.to_vec()
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_domain: default_api_domain(),
            output_dir: default_output_dir(),
            seasons: default_seasons(),
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            retry: RetrySettings::default(),
            api_key: None,
        }
    }
}

/// Adds `https://` when no scheme is given and drops trailing slashes.
/// An explicit `http://` is kept so local mock servers keep working.
pub fn normalize_api_domain(domain: &str) -> String {
    let trimmed = domain.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

impl Config {
    /// Loads configuration from the default config file location, falling back
    /// to defaults when no file exists. A `.env` file in the working directory
    /// is read first, then environment variables override file values.
    ///
    /// # Environment Variables
    /// - `BALLDONTLIE_API_KEY` - API credential (never persisted)
    /// - `NBA_INGEST_API_DOMAIN` - Override API domain
    /// - `NBA_INGEST_OUTPUT_DIR` - Override output directory
    /// - `NBA_INGEST_LOG_FILE` - Override log file path
    /// - `NBA_INGEST_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    ///
    /// The credential is not checked here; callers that talk to the API use
    /// [`Config::api_key`], which fails with `MissingCredential`.
    pub async fn load() -> Result<Self, AppError> {
        dotenv::dotenv().ok();

        let config_path = get_config_path();
        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies environment variable overrides and picks up the credential.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_domain) = std::env::var(env_vars::API_DOMAIN) {
            self.api_domain = normalize_api_domain(&api_domain);
        }

        if let Ok(output_dir) = std::env::var(env_vars::OUTPUT_DIR) {
            self.output_dir = output_dir;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        self.api_key = std::env::var(env_vars::API_KEY)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(ApiKey::new);
    }

    /// Returns the API credential or `MissingCredential` when none was supplied.
    pub fn api_key(&self) -> Result<&ApiKey, AppError> {
        self.api_key
            .as_ref()
            .ok_or_else(|| AppError::missing_credential(env_vars::API_KEY))
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Saves configuration to a custom file path, creating the parent
    /// directory when needed. The API domain is normalized on the way out.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }

        let content = toml::to_string_pretty(&Config {
            api_domain: normalize_api_domain(&self.api_domain),
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without applying the environment.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let mut config: Config = toml::from_str(&content)?;
        config.api_domain = normalize_api_domain(&config.api_domain);
        Ok(config)
    }

    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays the effective configuration on stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let config = Config::load().await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        if !Path::new(&config_path).exists() {
            println!("(Not created, using defaults)");
        }
        println!("────────────────────────────────────");
        println!("API Domain:");
        println!("{}", config.api_domain);
        println!("────────────────────────────────────");
        println!("API Key:");
        if config.api_key.is_some() {
            println!("set via {}", env_vars::API_KEY);
        } else {
            println!("MISSING (set {})", env_vars::API_KEY);
        }
        println!("────────────────────────────────────");
        println!("Output Directory:");
        println!("{}", config.output_dir);
        println!("────────────────────────────────────");
        println!("Seasons:");
        let seasons: Vec<String> = config.seasons.iter().map(|s| s.to_string()).collect();
        println!("{}", seasons.join(", "));
        println!("────────────────────────────────────");
        println!("HTTP Timeout:");
        println!("{} seconds", config.http_timeout_seconds);
        println!("────────────────────────────────────");
        println!("Retry Policy:");
        println!(
            "{} attempts, {} ms initial delay, {} ms cap",
            config.retry.max_attempts, config.retry.initial_delay_ms, config.retry.max_delay_ms
        );
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/nba_ingest.log");
            println!("(Default location)");
        }

        Ok(())
    }
}

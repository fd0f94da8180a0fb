use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data from API: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse API response: {0}")]
    ApiParse(#[from] serde_json::Error),

    // Specific HTTP status code errors
    #[error("API request not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("API server error ({status}): {message} (URL: {url})")]
    ApiServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API client error ({status}): {message} (URL: {url})")]
    ApiClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API rate limit exceeded (429): {message} (URL: {url})")]
    ApiRateLimit {
        message: String,
        url: String,
        retry_after_seconds: Option<u64>,
    },

    #[error("API service unavailable ({status}): {message} (URL: {url})")]
    ApiServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    // Data parsing and validation errors
    #[error("API returned malformed JSON: {message} (URL: {url})")]
    ApiMalformedJson { message: String, url: String },

    #[error("API returned unexpected data structure: {message} (URL: {url})")]
    ApiUnexpectedStructure { message: String, url: String },

    #[error("Gave up on {operation} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        last_error: Box<AppError>,
    },

    // Pipeline errors
    #[error("Missing credential: set the {var} environment variable")]
    MissingCredential { var: String },

    #[error("Upstream file missing or empty: {path}")]
    MissingUpstreamFile { path: String },

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { column: String, path: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Date/time parsing error: {0}")]
    DateTimeParse(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a date/time parsing error with context
    pub fn datetime_parse_error(msg: impl Into<String>) -> Self {
        Self::DateTimeParse(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create an API not found error
    pub fn api_not_found(url: impl Into<String>) -> Self {
        Self::ApiNotFound { url: url.into() }
    }

    /// Create an API server error (5xx status codes)
    pub fn api_server_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API client error (4xx status codes except 404 and 429)
    pub fn api_client_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API rate limit error without a server supplied delay
    pub fn api_rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiRateLimit {
            message: message.into(),
            url: url.into(),
            retry_after_seconds: None,
        }
    }

    /// Create an API rate limit error carrying the `Retry-After` value
    pub fn api_rate_limit_with_retry_after(
        message: impl Into<String>,
        url: impl Into<String>,
        retry_after_seconds: Option<u64>,
    ) -> Self {
        Self::ApiRateLimit {
            message: message.into(),
            url: url.into(),
            retry_after_seconds,
        }
    }

    /// Create an API service unavailable error
    pub fn api_service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a malformed JSON error
    pub fn api_malformed_json(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiMalformedJson {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an unexpected data structure error
    pub fn api_unexpected_structure(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiUnexpectedStructure {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create the terminal error of a bounded retry loop
    pub fn retries_exhausted(operation: impl Into<String>, attempts: u32, last_error: AppError) -> Self {
        Self::RetriesExhausted {
            operation: operation.into(),
            attempts,
            last_error: Box::new(last_error),
        }
    }

    /// Create a missing credential error for the given environment variable
    pub fn missing_credential(var: impl Into<String>) -> Self {
        Self::MissingCredential { var: var.into() }
    }

    /// Create a missing upstream file error
    pub fn missing_upstream_file(path: impl Into<String>) -> Self {
        Self::MissingUpstreamFile { path: path.into() }
    }

    /// Create a missing column error
    pub fn missing_column(column: impl Into<String>, path: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            path: path.into(),
        }
    }

    /// True for HTTP 429 responses
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::ApiRateLimit { .. })
    }

    /// True for 5xx responses. Box score fetching skips the date on these.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AppError::ApiServerError { .. } | AppError::ApiServiceUnavailable { .. }
        )
    }

    /// Check if error is retryable by the fetchers (rate limits and transient network issues)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::ApiRateLimit { .. }
                | AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
        )
    }

    /// Delay the server asked for through `Retry-After`, if any.
    pub fn retry_delay_seconds(&self) -> Option<u64> {
        match self {
            AppError::ApiRateLimit {
                retry_after_seconds,
                ..
            } => *retry_after_seconds,
            _ => None,
        }
    }

    /// Check if error indicates data not found rather than a technical failure
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ApiNotFound { .. } | AppError::MissingUpstreamFile { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_helper() {
        let error = AppError::config_error("Invalid configuration");
        assert!(matches!(error, AppError::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_api_rate_limit_helper() {
        let error = AppError::api_rate_limit("Too many requests", "https://api.example.com");
        assert!(matches!(error, AppError::ApiRateLimit { .. }));
        assert_eq!(
            error.to_string(),
            "API rate limit exceeded (429): Too many requests (URL: https://api.example.com)"
        );
    }

    #[test]
    fn test_api_server_error_helper() {
        let error =
            AppError::api_server_error(500, "Internal server error", "https://api.example.com");
        assert_eq!(
            error.to_string(),
            "API server error (500): Internal server error (URL: https://api.example.com)"
        );
    }

    #[test]
    fn test_missing_credential_helper() {
        let error = AppError::missing_credential("BALLDONTLIE_API_KEY");
        assert_eq!(
            error.to_string(),
            "Missing credential: set the BALLDONTLIE_API_KEY environment variable"
        );
    }

    #[test]
    fn test_retries_exhausted_wraps_last_error() {
        let error = AppError::retries_exhausted(
            "GET /v1/games",
            8,
            AppError::api_rate_limit("Too Many Requests", "https://api.example.com/v1/games"),
        );
        match &error {
            AppError::RetriesExhausted {
                attempts,
                last_error,
                ..
            } => {
                assert_eq!(*attempts, 8);
                assert!(last_error.is_rate_limited());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        assert!(error.to_string().starts_with("Gave up on GET /v1/games after 8 attempts"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_is_retryable() {
        assert!(AppError::network_timeout("url").is_retryable());
        assert!(AppError::network_connection("url", "message").is_retryable());
        assert!(AppError::api_rate_limit("message", "url").is_retryable());

        assert!(!AppError::api_server_error(500, "message", "url").is_retryable());
        assert!(!AppError::api_service_unavailable(503, "message", "url").is_retryable());
        assert!(!AppError::api_not_found("url").is_retryable());
        assert!(!AppError::api_client_error(400, "message", "url").is_retryable());
        assert!(!AppError::config_error("message").is_retryable());
        assert!(!AppError::missing_credential("KEY").is_retryable());
    }

    #[test]
    fn test_is_server_error() {
        assert!(AppError::api_server_error(500, "message", "url").is_server_error());
        assert!(AppError::api_service_unavailable(503, "message", "url").is_server_error());
        assert!(!AppError::api_rate_limit("message", "url").is_server_error());
        assert!(!AppError::api_client_error(401, "message", "url").is_server_error());
    }

    #[test]
    fn test_retry_delay_comes_from_retry_after_header() {
        let without_header = AppError::api_rate_limit("rate limit", "https://example.com");
        assert_eq!(without_header.retry_delay_seconds(), None);

        let with_header = AppError::api_rate_limit_with_retry_after(
            "rate limit",
            "https://example.com",
            Some(3),
        );
        assert_eq!(with_header.retry_delay_seconds(), Some(3));

        assert_eq!(
            AppError::api_server_error(500, "boom", "https://example.com").retry_delay_seconds(),
            None
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(AppError::api_not_found("url").is_not_found());
        assert!(AppError::missing_upstream_file("./New_data/nba_games_2024.csv").is_not_found());
        assert!(!AppError::api_server_error(500, "message", "url").is_not_found());
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_error: AppError = json_error.into();
        assert!(matches!(app_error, AppError::ApiParse(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
    }

    #[test]
    fn test_error_from_toml_deserialize() {
        let invalid_toml = "invalid = [toml";
        let toml_error = toml::from_str::<serde_json::Value>(invalid_toml).unwrap_err();
        let app_error: AppError = toml_error.into();
        assert!(matches!(app_error, AppError::TomlDeserialize(_)));
    }
}

//! HTTP client creation and configuration utilities

use crate::config::ApiKey;
use crate::error::AppError;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::time::Duration;

/// Creates the HTTP client used for every API call.
///
/// The credential is sent as the `Authorization` header on each request.
/// Requests run one at a time, so the idle pool is kept small.
pub fn create_http_client(api_key: &ApiKey, timeout_seconds: u64) -> Result<Client, AppError> {
    let mut auth_value = HeaderValue::from_str(api_key.expose()).map_err(|_| {
        AppError::config_error("API key contains characters not allowed in an HTTP header")
    })?;
    auth_value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth_value);

    Ok(Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .build()?)
}

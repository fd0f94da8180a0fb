use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use super::fetch_utils::fetch_json;
use super::http_client::create_http_client;
use super::retry::RetryPolicy;
use super::urls::{Endpoint, build_endpoint_url};
use crate::config::Config;
use crate::data_fetcher::models::Page;
use crate::error::AppError;

/// Authenticated access to the statistics API.
///
/// Every request goes through the retry policy, so callers only see
/// rate limits once the attempt budget is spent.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_domain: String,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Builds a client from the effective configuration.
    ///
    /// Fails with `AppError::MissingCredential` before any network activity
    /// when no API key is configured.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let api_key = config.api_key()?;
        let client = create_http_client(api_key, config.http_timeout_seconds)?;
        Ok(ApiClient::with_client(
            client,
            &config.api_domain,
            RetryPolicy::from(&config.retry),
        ))
    }

    /// Wraps an already configured HTTP client.
    pub fn with_client(client: Client, api_domain: &str, retry: RetryPolicy) -> Self {
        ApiClient {
            client,
            api_domain: api_domain.trim_end_matches('/').to_string(),
            retry,
        }
    }

    /// Pause used after a server error before moving on.
    pub fn server_error_skip_delay(&self) -> Duration {
        self.retry.server_error_skip_delay
    }

    /// Fetches one page of `endpoint`. A rate limited request is re-issued
    /// with the same cursor.
    #[instrument(skip(self, endpoint), fields(endpoint = %endpoint.label()))]
    pub async fn get_page(
        &self,
        endpoint: &Endpoint,
        cursor: Option<&str>,
        per_page: Option<u32>,
    ) -> Result<Page, AppError> {
        let url = build_endpoint_url(&self.api_domain, &endpoint.path);
        let query = endpoint.query(cursor, per_page);
        let operation = match cursor {
            Some(cursor) => format!("{} (cursor {cursor})", endpoint.label()),
            None => endpoint.label(),
        };

        let page: Page = self
            .retry
            .run(&operation, || fetch_json(&self.client, &url, &query))
            .await?;
        debug!(
            "Page of {} returned {} items, next cursor {:?}",
            operation,
            page.data.len(),
            page.next_cursor()
        );
        Ok(page)
    }

    /// Fetches the raw box score document of one date (`YYYY-MM-DD`).
    #[instrument(skip(self))]
    pub async fn get_box_scores_by_date(&self, date: &str) -> Result<Value, AppError> {
        let endpoint = Endpoint::box_scores(date);
        let url = build_endpoint_url(&self.api_domain, &endpoint.path);
        let query = endpoint.query(None, None);

        self.retry
            .run(&endpoint.label(), || fetch_json::<Value>(&self.client, &url, &query))
            .await
    }
}

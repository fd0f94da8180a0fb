//! Endpoint to CSV fetchers

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::core::ApiClient;
use super::urls::Endpoint;
use crate::constants::PER_PAGE;
use crate::data_fetcher::processors::flatten_records;
use crate::error::AppError;
use crate::export::write_records;

/// Outcome of one fetch-and-write step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub records: usize,
    pub pages: usize,
    /// File written, `None` when nothing was written
    pub path: Option<PathBuf>,
}

/// Follows the cursor chain of `endpoint` and writes every item, flattened,
/// to `dest`.
///
/// The first request carries no cursor; later requests carry the cursor of
/// the previous page. The file is written even when the stream is empty.
pub async fn fetch_all_pages(
    api: &ApiClient,
    endpoint: &Endpoint,
    dest: &Path,
) -> Result<FetchSummary, AppError> {
    let mut items: Vec<Value> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = api
            .get_page(endpoint, cursor.as_deref(), Some(PER_PAGE))
            .await?;
        pages += 1;
        items.extend(page.data.iter().cloned());

        match page.next_cursor() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    info!(
        "Retrieved {} records from {} in {} pages",
        items.len(),
        endpoint.label(),
        pages
    );

    let records = flatten_records(&items);
    write_records(dest, &records)?;
    info!("Data saved to {}", dest.display());

    Ok(FetchSummary {
        records: records.len(),
        pages,
        path: Some(dest.to_path_buf()),
    })
}

/// Fetches a single-page endpoint and writes it to `dest`.
///
/// An empty `data` array logs a warning and writes nothing.
pub async fn fetch_single_page(
    api: &ApiClient,
    endpoint: &Endpoint,
    dest: &Path,
) -> Result<FetchSummary, AppError> {
    let page = api.get_page(endpoint, None, None).await?;

    if page.data.is_empty() {
        warn!("No data found for {}", endpoint.label());
        return Ok(FetchSummary {
            records: 0,
            pages: 1,
            path: None,
        });
    }

    let records = flatten_records(&page.data);
    write_records(dest, &records)?;
    info!(
        "Retrieved {} records from {}, saved to {}",
        records.len(),
        endpoint.label(),
        dest.display()
    );

    Ok(FetchSummary {
        records: records.len(),
        pages: 1,
        path: Some(dest.to_path_buf()),
    })
}

/// Fetches the box score document of one date and stores it verbatim as JSON.
pub async fn fetch_box_scores_for_date(
    api: &ApiClient,
    date: &str,
    dest: &Path,
) -> Result<PathBuf, AppError> {
    let document = api.get_box_scores_by_date(date).await?;
    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(dest, serde_json::to_vec(&document)?).await?;
    info!("Saved box scores for {} to {}", date, dest.display());
    Ok(dest.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;
    use crate::data_fetcher::api::{RetryPolicy, create_http_client};
    use crate::export::{read_column, read_rows};
    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer, attempts: u32) -> ApiClient {
        let client = create_http_client(&ApiKey::new("test-key"), 5).unwrap();
        ApiClient::with_client(client, &server.uri(), RetryPolicy::immediate(attempts))
    }

    async fn mount_page(server: &MockServer, cursor: Option<&str>, body: Value) {
        let mock = Mock::given(method("GET")).and(path("/v1/games"));
        let mock = match cursor {
            Some(c) => mock.and(query_param("cursor", c)),
            None => mock.and(query_param_is_missing("cursor")),
        };
        mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_all_pages_follows_cursor() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            None,
            json!({"data": [{"id": 1, "home_team": {"id": 10, "name": "A"}}], "meta": {"next_cursor": 2}}),
        )
        .await;
        mount_page(
            &server,
            Some("2"),
            json!({"data": [{"id": 2, "home_team": {"id": 11, "name": "B"}}], "meta": {"next_cursor": 3}}),
        )
        .await;
        mount_page(
            &server,
            Some("3"),
            json!({"data": [{"id": 3, "home_team": {"id": 12, "name": "C"}}], "meta": {}}),
        )
        .await;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("games.csv");
        let api = test_client(&server, 3);
        let summary = fetch_all_pages(&api, &Endpoint::games(2024), &dest)
            .await
            .unwrap();

        assert_eq!(summary.records, 3);
        assert_eq!(summary.pages, 3);
        assert_eq!(summary.path.as_deref(), Some(dest.as_path()));
        assert_eq!(server.received_requests().await.unwrap().len(), 3);

        let (headers, rows) = read_rows(&dest).unwrap();
        assert_eq!(headers, vec!["id", "home_team_id", "home_team_name"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(read_column(&dest, "home_team_name").unwrap(), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_fetch_all_pages_retries_rate_limited_first_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/games"))
            .and(query_param_is_missing("cursor"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        mount_page(
            &server,
            None,
            json!({"data": [{"id": 1}], "meta": {"next_cursor": 9}}),
        )
        .await;
        mount_page(&server, Some("9"), json!({"data": [{"id": 2}], "meta": {}})).await;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("games.csv");
        let api = test_client(&server, 4);
        let summary = fetch_all_pages(&api, &Endpoint::games(2024), &dest)
            .await
            .unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
        assert_eq!(read_column(&dest, "id").unwrap(), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_fetch_all_pages_gives_up_after_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/games"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("games.csv");
        let api = test_client(&server, 3);
        let err = fetch_all_pages(&api, &Endpoint::games(2024), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_fetch_all_pages_empty_stream_writes_empty_file() {
        let server = MockServer::start().await;
        mount_page(&server, None, json!({"data": [], "meta": {"next_cursor": null}})).await;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("games.csv");
        let api = test_client(&server, 1);
        let summary = fetch_all_pages(&api, &Endpoint::games(2024), &dest)
            .await
            .unwrap();
        assert_eq!(summary.records, 0);
        assert!(dest.exists());
    }

    #[tokio::test]
    async fn test_fetch_single_page_empty_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/standings"))
            .and(query_param("season", "2024"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("standings.csv");
        let api = test_client(&server, 1);
        let summary = fetch_single_page(&api, &Endpoint::standings(2024), &dest)
            .await
            .unwrap();

        assert_eq!(summary.path, None);
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_fetch_single_page_rate_limited_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/standings"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/standings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"team": {"id": 1, "full_name": "A"}, "wins": 50, "losses": 32}]
            })))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("standings.csv");
        let api = test_client(&server, 3);
        let summary = fetch_single_page(&api, &Endpoint::standings(2024), &dest)
            .await
            .unwrap();

        assert_eq!(summary.records, 1);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
        let (headers, _) = read_rows(&dest).unwrap();
        assert_eq!(headers, vec!["team_id", "team_full_name", "wins", "losses"]);
    }

    #[tokio::test]
    async fn test_fetch_box_scores_for_date_writes_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/box_scores"))
            .and(query_param("date", "2024-03-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("nested").join("nba_box_scores_2023_2024-03-01.json");
        let api = test_client(&server, 1);
        fetch_box_scores_for_date(&api, "2024-03-01", &dest)
            .await
            .unwrap();

        let text = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(text, r#"{"data":[]}"#);
    }
}

//! URL and query building for API endpoints

use crate::constants::endpoints;

/// Ordered query parameters; array parameters repeat their `name[]` key.
pub type QueryParams = Vec<(String, String)>;

/// Builds the absolute URL of an API path.
///
/// # Example
/// ```
/// use nba_ingest::data_fetcher::api::build_endpoint_url;
///
/// let url = build_endpoint_url("https://api.example.com", "/v1/games");
/// assert_eq!(url, "https://api.example.com/v1/games");
/// ```
pub fn build_endpoint_url(api_domain: &str, path: &str) -> String {
    format!("{}{path}", api_domain.trim_end_matches('/'))
}

/// A remote resource plus the fixed parameters sent with every request to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub params: QueryParams,
}

impl Endpoint {
    pub fn new(path: impl Into<String>) -> Self {
        Endpoint {
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Games of one season (cursor paginated).
    pub fn games(season: i32) -> Self {
        Endpoint::new(endpoints::GAMES).with_param("seasons[]", season)
    }

    /// Advanced per-game player stats of one season (cursor paginated).
    pub fn advanced_stats(season: i32) -> Self {
        Endpoint::new(endpoints::ADVANCED_STATS).with_param("seasons[]", season)
    }

    /// Team standings of one season (single page).
    pub fn standings(season: i32) -> Self {
        Endpoint::new(endpoints::STANDINGS).with_param("season", season)
    }

    /// Currently active players (cursor paginated).
    pub fn active_players() -> Self {
        Endpoint::new(endpoints::ACTIVE_PLAYERS)
    }

    /// Current player injuries (cursor paginated).
    pub fn player_injuries() -> Self {
        Endpoint::new(endpoints::PLAYER_INJURIES)
    }

    /// Box scores of every game played on one date.
    pub fn box_scores(date: &str) -> Self {
        Endpoint::new(endpoints::BOX_SCORES).with_param("date", date)
    }

    /// Human readable label for logs, e.g. `/v1/games?seasons[]=2024`.
    pub fn label(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }

    /// Fixed parameters plus paging parameters. The cursor is only sent once
    /// a previous page has supplied one.
    pub fn query(&self, cursor: Option<&str>, per_page: Option<u32>) -> QueryParams {
        let mut params = self.params.clone();
        if let Some(per_page) = per_page {
            params.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }
        params
    }
}

//! Application-wide constants and configuration values
//!
//! Defaults for everything that can be overridden through `Config` live here,
//! together with the fixed API and file naming conventions.

/// Default base URL of the balldontlie API
pub const DEFAULT_API_DOMAIN: &str = "https://api.balldontlie.io";

/// Default directory for produced CSV and intermediate JSON files
pub const DEFAULT_OUTPUT_DIR: &str = "./New_data";

/// Seasons processed when neither the config file nor the CLI names any
pub const DEFAULT_SEASONS: [i32; 5] = [2020, 2021, 2022, 2023, 2024];

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 4;

/// Page size requested from cursor-paginated endpoints
pub const PER_PAGE: u32 = 100;

/// Retry configuration
pub mod retry {
    /// Maximum number of attempts for one request (first try included)
    pub const MAX_ATTEMPTS: u32 = 8;

    /// First backoff delay; rate limited requests wait this long before the first retry
    pub const INITIAL_DELAY_MS: u64 = 10_000;

    /// Upper bound for a single backoff delay
    pub const MAX_DELAY_MS: u64 = 60_000;

    /// Delay applied after a server error before moving on to the next date
    pub const SERVER_ERROR_SKIP_DELAY_MS: u64 = 2_000;
}

/// Environment variable names
pub mod env_vars {
    /// API credential, required before any request is made
    pub const API_KEY: &str = "BALLDONTLIE_API_KEY";

    /// Environment variable for API domain override
    pub const API_DOMAIN: &str = "NBA_INGEST_API_DOMAIN";

    /// Environment variable for output directory override
    pub const OUTPUT_DIR: &str = "NBA_INGEST_OUTPUT_DIR";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "NBA_INGEST_LOG_FILE";

    /// Environment variable for HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "NBA_INGEST_HTTP_TIMEOUT";
}

/// API resource paths
pub mod endpoints {
    pub const GAMES: &str = "/v1/games";
    pub const ADVANCED_STATS: &str = "/v1/stats/advanced";
    pub const ACTIVE_PLAYERS: &str = "/v1/players/active";
    pub const PLAYER_INJURIES: &str = "/v1/player_injuries";
    pub const STANDINGS: &str = "/v1/standings";
    pub const BOX_SCORES: &str = "/v1/box_scores";
}

/// Output file names
pub mod files {
    pub const BOX_SCORE_PREFIX: &str = "nba_box_scores_";
    pub const ACTIVE_PLAYERS: &str = "nba_active_players.csv";
    pub const PLAYER_INJURIES: &str = "nba_player_injuries.csv";
    pub const INJURED_PLAYERS_CLEANED: &str = "injured_players_cleaned.csv";

    /// Injury status kept by the injured player filter
    pub const INJURY_STATUS_OUT: &str = "Out";

    pub fn advanced_stats(season: i32) -> String {
        format!("nba_game_advanced_stats_{season}.csv")
    }

    pub fn games(season: i32) -> String {
        format!("nba_games_{season}.csv")
    }

    pub fn standings(season: i32) -> String {
        format!("nba_team_standings_{season}.csv")
    }

    pub fn box_scores_combined(season: i32) -> String {
        format!("nba_box_scores_combined_{season}.csv")
    }

    /// Intermediate per-date document. The season is part of the name so a
    /// combine step only ever picks up its own season.
    pub fn box_score_document(season: i32, date: &str) -> String {
        format!("{BOX_SCORE_PREFIX}{season}_{date}.json")
    }
}

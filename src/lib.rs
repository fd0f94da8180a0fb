//! NBA statistics ingestion library
//!
//! Pulls season tables, per-date box scores and player lists from the
//! balldontlie API and writes them as CSV tables.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nba_ingest::config::Config;
//! use nba_ingest::data_fetcher::api::ApiClient;
//! use nba_ingest::error::AppError;
//! use nba_ingest::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let api = ApiClient::new(&config)?;
//!
//!     let report = Pipeline::new(api, &config.output_dir)
//!         .run(&[2024], false)
//!         .await?;
//!     println!("{report}");
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod export;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::api::{ApiClient, Endpoint, RetryPolicy};
pub use error::AppError;
pub use pipeline::{Pipeline, PipelineReport};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

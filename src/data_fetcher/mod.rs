pub mod api;
pub mod models;
pub mod processors;

pub use api::{ApiClient, Endpoint, FetchSummary, fetch_all_pages, fetch_single_page};
pub use models::{BoxScoreCollection, BoxScoreGame, Page, Record};

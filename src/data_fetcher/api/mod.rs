mod core;
mod fetch_utils;
pub mod fetchers;
pub mod http_client;
pub mod retry;
pub mod urls;

pub use self::core::ApiClient;
pub use fetchers::{FetchSummary, fetch_all_pages, fetch_box_scores_for_date, fetch_single_page};
pub use http_client::create_http_client;
pub use retry::RetryPolicy;
pub use urls::{Endpoint, QueryParams, build_endpoint_url};

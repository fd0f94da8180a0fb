pub mod denormalize;
pub mod flatten;

pub use denormalize::{COMBINED_HEADERS, FlatPlayerRow, denormalize_game, denormalize_games};
pub use flatten::{flatten_item, flatten_records};

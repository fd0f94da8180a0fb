pub mod box_score;
pub mod common;
pub mod page;

pub use box_score::{
    BoxScoreCollection, BoxScoreGame, PlayerGameStat, PlayerIdentity, TeamSide,
    decode_box_score_document,
};
pub use common::{Cell, value_to_cell_text};
pub use page::{Page, PageMeta};

/// A flattened item: field name to scalar (or preserved nested) value, in
/// source order.
pub type Record = serde_json::Map<String, serde_json::Value>;

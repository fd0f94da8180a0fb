use std::path::Path;
use tracing::info;

use crate::constants::files::INJURY_STATUS_OUT;
use crate::error::AppError;
use crate::export::{column_index, read_rows, write_column};

/// Writes the `player_id` of every injury whose `status` is `Out` to `dest`.
/// Returns the number of players written.
pub fn filter_out_players(injuries_csv: &Path, dest: &Path) -> Result<usize, AppError> {
    let (headers, rows) = read_rows(injuries_csv)?;
    let missing = |column: &str| AppError::missing_column(column, injuries_csv.display().to_string());
    let status_idx = column_index(&headers, "status").ok_or_else(|| missing("status"))?;
    let player_idx = column_index(&headers, "player_id").ok_or_else(|| missing("player_id"))?;

    let out: Vec<String> = rows
        .iter()
        .filter(|row| row.get(status_idx).map(String::as_str) == Some(INJURY_STATUS_OUT))
        .map(|row| row.get(player_idx).cloned().unwrap_or_default())
        .collect();

    let written = write_column(dest, "player_id", &out)?;
    info!("{} players listed as out, saved to {}", written, dest.display());
    Ok(written)
}

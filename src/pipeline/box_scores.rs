//! Per-date box score documents: collection, combination and cleanup

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::report::{BoxScoreStepReport, CombineReport};
use crate::constants::files;
use crate::data_fetcher::api::{ApiClient, fetch_box_scores_for_date};
use crate::data_fetcher::models::{BoxScoreGame, decode_box_score_document};
use crate::data_fetcher::processors::denormalize_games;
use crate::error::AppError;
use crate::export::{read_column, write_player_rows};

/// Calendar date of a game table cell: `2024-01-01` or the date part of an
/// ISO timestamp such as `2024-01-01T00:00:00.000Z`.
pub fn parse_game_date(raw: &str) -> Result<NaiveDate, AppError> {
    let date_part = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| AppError::datetime_parse_error(format!("Invalid game date '{raw}': {e}")))
}

/// Unique game dates of a games table that lie strictly before `today`,
/// in first-seen order.
pub fn game_dates_before(games_csv: &Path, today: NaiveDate) -> Result<Vec<NaiveDate>, AppError> {
    let mut dates: Vec<NaiveDate> = Vec::new();
    for raw in read_column(games_csv, "date")? {
        match parse_game_date(&raw) {
            Ok(date) if date < today => {
                if !dates.contains(&date) {
                    dates.push(date);
                }
            }
            Ok(_) => {}
            Err(e) => warn!("{e}. Ignoring it"),
        }
    }
    Ok(dates)
}

/// Fetches the box scores of every game date before `today` into
/// per-date documents. A date answered with a server error is skipped
/// after a short pause.
pub async fn fetch_season_box_scores(
    api: &ApiClient,
    output_dir: &Path,
    season: i32,
    today: NaiveDate,
) -> Result<Option<BoxScoreStepReport>, AppError> {
    let games_csv = output_dir.join(files::games(season));
    let dates = match game_dates_before(&games_csv, today) {
        Ok(dates) => dates,
        Err(e) if e.is_not_found() || matches!(e, AppError::MissingColumn { .. }) => {
            warn!("{e}. Skipping box scores for season {season}");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let mut report = BoxScoreStepReport::default();
    for date in dates {
        let date = date.format("%Y-%m-%d").to_string();
        info!("Fetching box scores for {}...", date);
        let dest = output_dir.join(files::box_score_document(season, &date));

        match fetch_box_scores_for_date(api, &date, &dest).await {
            Ok(_) => report.dates_fetched += 1,
            Err(e) if e.is_server_error() => {
                warn!("Error fetching box scores for {}: {}. Skipping this date...", date, e);
                report.dates_skipped += 1;
                tokio::time::sleep(api.server_error_skip_delay()).await;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Finished fetching box scores for season {}: {} dates, {} skipped",
        season, report.dates_fetched, report.dates_skipped
    );
    Ok(Some(report))
}

/// This season's intermediate documents, sorted by file name. The date is
/// part of the name, so the order is chronological.
pub fn season_box_score_files(output_dir: &Path, season: i32) -> Result<Vec<PathBuf>, AppError> {
    if !output_dir.exists() {
        return Ok(Vec::new());
    }

    let prefix = format!("{}{}_", files::BOX_SCORE_PREFIX, season);
    let mut paths = Vec::new();
    for entry in fs::read_dir(output_dir)? {
        let path = entry?.path();
        let is_match = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(".json"));
        if is_match && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Denormalizes this season's documents into the combined table and then
/// removes the documents that went into it.
///
/// Documents are only deleted once the combined table exists on disk.
/// Documents that fail to decode are reported and left in place.
pub fn combine_season_box_scores(output_dir: &Path, season: i32) -> Result<CombineReport, AppError> {
    let mut report = CombineReport::default();
    let mut games: Vec<BoxScoreGame> = Vec::new();
    let mut consumed: Vec<PathBuf> = Vec::new();

    for path in season_box_score_files(output_dir, season)? {
        let decoded = fs::read_to_string(&path)
            .map_err(AppError::from)
            .and_then(|text| decode_box_score_document(&text));
        match decoded {
            Ok(collection) => {
                games.extend(collection.data);
                consumed.push(path);
            }
            Err(e) => {
                warn!("Could not decode {}: {}. Keeping it", path.display(), e);
                report.unreadable += 1;
            }
        }
    }
    report.documents = consumed.len();
    report.games = games.len();

    let rows = denormalize_games(&games);
    let combined = output_dir.join(files::box_scores_combined(season));
    report.rows = write_player_rows(&combined, &rows)?;
    info!(
        "Data from {} games exported to {} ({} rows)",
        report.games,
        combined.display(),
        report.rows
    );

    report.intermediates_deleted = cleanup_intermediates(&combined, &consumed)?;
    Ok(report)
}

/// Deletes `documents` if `combined` exists; otherwise keeps them and warns.
pub fn cleanup_intermediates(combined: &Path, documents: &[PathBuf]) -> Result<usize, AppError> {
    if !combined.exists() {
        warn!(
            "{} not found. {} box score documents will not be deleted",
            combined.display(),
            documents.len()
        );
        return Ok(0);
    }

    for path in documents {
        fs::remove_file(path)?;
        info!("Deleted intermediate file {}", path.display());
    }
    Ok(documents.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::RetryPolicy;
    use crate::data_fetcher::models::Record;
    use crate::export::{read_rows, write_records};
    use serde_json::json;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn write_games(path: &Path, dates: &[&str]) {
        let records: Vec<Record> = dates
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let mut record = Record::new();
                record.insert("id".into(), json!(i));
                record.insert("date".into(), json!(d));
                record
            })
            .collect();
        write_records(path, &records).unwrap();
    }

    fn game_doc(date: &str, home: &str, players: usize) -> serde_json::Value {
        let roster: Vec<_> = (0..players)
            .map(|i| json!({"player": {"id": i, "first_name": "F", "last_name": "L"}, "pts": i}))
            .collect();
        json!({"data": [{
            "date": date,
            "season": 2023,
            "status": "Final",
            "home_team": {"id": 1, "full_name": home, "players": roster},
            "visitor_team": {"id": 2, "full_name": "Visitors", "players": []}
        }]})
    }

    #[test]
    fn test_parse_game_date_variants() {
        assert_eq!(parse_game_date("2024-01-01").unwrap(), date("2024-01-01"));
        assert_eq!(
            parse_game_date("2024-01-01T00:00:00.000Z").unwrap(),
            date("2024-01-01")
        );
        assert!(matches!(
            parse_game_date("not a date"),
            Err(AppError::DateTimeParse(_))
        ));
        assert!(parse_game_date("").is_err());
    }

    #[test]
    fn test_game_dates_before_filters_and_dedups() {
        let dir = tempdir().unwrap();
        let games = dir.path().join("games.csv");
        write_games(
            &games,
            &["2024-01-03", "2024-01-01", "2024-01-03", "2024-02-01", "2024-01-15T00:00:00.000Z"],
        );

        let dates = game_dates_before(&games, date("2024-02-01")).unwrap();
        assert_eq!(
            dates,
            vec![date("2024-01-03"), date("2024-01-01"), date("2024-01-15")]
        );
    }

    #[test]
    fn test_game_dates_before_missing_file() {
        let dir = tempdir().unwrap();
        let err = game_dates_before(&dir.path().join("nope.csv"), date("2024-01-01")).unwrap_err();
        assert!(matches!(err, AppError::MissingUpstreamFile { .. }));
    }

    #[tokio::test]
    async fn test_missing_games_table_skips_step() {
        let dir = tempdir().unwrap();
        let api = ApiClient::with_client(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            RetryPolicy::immediate(1),
        );

        let report = fetch_season_box_scores(&api, dir.path(), 2020, date("2024-01-01"))
            .await
            .unwrap();
        assert_eq!(report, None);
    }

    #[tokio::test]
    async fn test_empty_games_table_skips_step() {
        let dir = tempdir().unwrap();
        write_records(&dir.path().join("nba_games_2030.csv"), &[]).unwrap();
        let api = ApiClient::with_client(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            RetryPolicy::immediate(1),
        );

        let report = fetch_season_box_scores(&api, dir.path(), 2030, date("2030-06-01"))
            .await
            .unwrap();
        assert_eq!(report, None);
    }

    #[tokio::test]
    async fn test_games_table_without_date_column_skips_step() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("nba_games_2030.csv"), "id,status\n1,Final\n").unwrap();
        let api = ApiClient::with_client(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            RetryPolicy::immediate(1),
        );

        let report = fetch_season_box_scores(&api, dir.path(), 2030, date("2030-06-01"))
            .await
            .unwrap();
        assert_eq!(report, None);
    }

    #[test]
    fn test_season_files_are_scoped_and_sorted() {
        let dir = tempdir().unwrap();
        for name in [
            "nba_box_scores_2023_2024-01-02.json",
            "nba_box_scores_2023_2023-12-30.json",
            "nba_box_scores_2022_2023-01-01.json",
            "nba_box_scores_combined_2023.csv",
            "nba_games_2023.csv",
        ] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let names: Vec<String> = season_box_score_files(dir.path(), 2023)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "nba_box_scores_2023_2023-12-30.json",
                "nba_box_scores_2023_2024-01-02.json"
            ]
        );
    }

    #[test]
    fn test_combine_writes_rows_and_removes_documents() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("nba_box_scores_2023_2024-01-02.json"),
            game_doc("2024-01-02", "Late", 2).to_string(),
        )
        .unwrap();
        // Double encoded document
        let double = serde_json::to_string(&game_doc("2024-01-01", "Early", 3).to_string()).unwrap();
        fs::write(dir.path().join("nba_box_scores_2023_2024-01-01.json"), double).unwrap();
        fs::write(
            dir.path().join("nba_box_scores_2022_2023-01-01.json"),
            game_doc("2023-01-01", "Other season", 4).to_string(),
        )
        .unwrap();

        let report = combine_season_box_scores(dir.path(), 2023).unwrap();
        assert_eq!(report.documents, 2);
        assert_eq!(report.games, 2);
        assert_eq!(report.rows, 5);
        assert_eq!(report.intermediates_deleted, 2);

        let (_, rows) = read_rows(&dir.path().join("nba_box_scores_combined_2023.csv")).unwrap();
        let teams: Vec<&str> = rows.iter().map(|r| r[12].as_str()).collect();
        assert_eq!(teams, vec!["Early", "Early", "Early", "Late", "Late"]);

        assert!(season_box_score_files(dir.path(), 2023).unwrap().is_empty());
        assert_eq!(season_box_score_files(dir.path(), 2022).unwrap().len(), 1);
    }

    #[test]
    fn test_combine_with_no_documents_writes_header_only() {
        let dir = tempdir().unwrap();
        let report = combine_season_box_scores(dir.path(), 2024).unwrap();
        assert_eq!(report.rows, 0);

        let (headers, rows) = read_rows(&dir.path().join("nba_box_scores_combined_2024.csv")).unwrap();
        assert_eq!(headers.len(), 32);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_unreadable_document_is_kept() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("nba_box_scores_2024_2024-01-01.json");
        fs::write(&bad, "42").unwrap();

        let report = combine_season_box_scores(dir.path(), 2024).unwrap();
        assert_eq!(report.unreadable, 1);
        assert_eq!(report.intermediates_deleted, 0);
        assert!(bad.exists());
    }

    #[test]
    fn test_non_utf8_document_is_kept() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("nba_box_scores_2024_2024-01-01.json");
        let bad = dir.path().join("nba_box_scores_2024_2024-01-02.json");
        fs::write(&good, game_doc("2024-01-01", "Home", 1).to_string()).unwrap();
        fs::write(&bad, [0xffu8, 0xfe, 0x00, 0x7b]).unwrap();

        let report = combine_season_box_scores(dir.path(), 2024).unwrap();
        assert_eq!(report.unreadable, 1);
        assert_eq!(report.rows, 1);
        assert_eq!(report.intermediates_deleted, 1);
        assert!(!good.exists());
        assert!(bad.exists());
    }

    #[test]
    fn test_cleanup_keeps_documents_without_combined_file() {
        let dir = tempdir().unwrap();
        let doc = dir.path().join("nba_box_scores_2024_2024-01-01.json");
        fs::write(&doc, "{}").unwrap();

        let deleted =
            cleanup_intermediates(&dir.path().join("missing.csv"), std::slice::from_ref(&doc)).unwrap();
        assert_eq!(deleted, 0);
        assert!(doc.exists());
    }
}

//! Straight-through ingestion run: season tables, box scores, then
//! season-independent player tables.

pub mod box_scores;
pub mod injuries;
pub mod report;

use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

use crate::constants::files;
use crate::data_fetcher::api::{ApiClient, Endpoint, fetch_all_pages, fetch_single_page};
use crate::error::AppError;

pub use box_scores::{
    cleanup_intermediates, combine_season_box_scores, fetch_season_box_scores, game_dates_before,
    parse_game_date, season_box_score_files,
};
pub use injuries::filter_out_players;
pub use report::{BoxScoreStepReport, CombineReport, PipelineReport, SeasonReport};

/// Drives every step against one output directory, one request at a time.
#[derive(Debug, Clone)]
pub struct Pipeline {
    api: ApiClient,
    output_dir: PathBuf,
    today: NaiveDate,
}

impl Pipeline {
    pub fn new(api: ApiClient, output_dir: impl Into<PathBuf>) -> Self {
        Pipeline {
            api,
            output_dir: output_dir.into(),
            today: Local::now().date_naive(),
        }
    }

    /// Overrides the date used to decide which games are already played.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Runs every season in order, then the season-independent steps unless
    /// `include_season_independent` is false.
    pub async fn run(
        &self,
        seasons: &[i32],
        include_season_independent: bool,
    ) -> Result<PipelineReport, AppError> {
        let mut report = PipelineReport::default();

        for &season in seasons {
            report.seasons.push(self.run_season(season).await?);
        }

        if include_season_independent {
            self.run_season_independent(&mut report).await?;
        }

        info!("All data successfully retrieved and saved to {}", self.output_dir.display());
        Ok(report)
    }

    #[instrument(skip(self))]
    pub async fn run_season(&self, season: i32) -> Result<SeasonReport, AppError> {
        info!("Processing season {}", season);
        let mut report = SeasonReport {
            season,
            ..SeasonReport::default()
        };

        report.advanced_stats = fetch_all_pages(
            &self.api,
            &Endpoint::advanced_stats(season),
            &self.path(&files::advanced_stats(season)),
        )
        .await?
        .records;

        report.games = fetch_all_pages(
            &self.api,
            &Endpoint::games(season),
            &self.path(&files::games(season)),
        )
        .await?
        .records;

        report.box_scores =
            fetch_season_box_scores(&self.api, &self.output_dir, season, self.today).await?;
        report.combined = combine_season_box_scores(&self.output_dir, season)?;

        let standings = fetch_single_page(
            &self.api,
            &Endpoint::standings(season),
            &self.path(&files::standings(season)),
        )
        .await?;
        report.standings = standings.path.map(|_| standings.records);
        Ok(report)
    }

    async fn run_season_independent(&self, report: &mut PipelineReport) -> Result<(), AppError> {
        let players = fetch_all_pages(
            &self.api,
            &Endpoint::active_players(),
            &self.path(files::ACTIVE_PLAYERS),
        )
        .await?;
        report.active_players = Some(players.records);

        let injuries_csv = self.path(files::PLAYER_INJURIES);
        let injuries = fetch_all_pages(&self.api, &Endpoint::player_injuries(), &injuries_csv).await?;
        report.injuries = Some(injuries.records);

        match filter_out_players(&injuries_csv, &self.path(files::INJURED_PLAYERS_CLEANED)) {
            Ok(count) => report.injured_out = Some(count),
            Err(e @ (AppError::MissingUpstreamFile { .. } | AppError::MissingColumn { .. })) => {
                warn!("{e}. Skipping injured player list");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

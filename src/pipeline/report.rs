use std::fmt;

/// Per-date outcome counts of the box score step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxScoreStepReport {
    pub dates_fetched: usize,
    pub dates_skipped: usize,
}

/// Result of combining one season's intermediate documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineReport {
    pub documents: usize,
    pub games: usize,
    pub rows: usize,
    /// Documents that could not be decoded; kept on disk
    pub unreadable: usize,
    pub intermediates_deleted: usize,
}

/// Counts for one season.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonReport {
    pub season: i32,
    pub advanced_stats: usize,
    pub games: usize,
    /// `None` when the games table was missing and the step was skipped
    pub box_scores: Option<BoxScoreStepReport>,
    pub combined: CombineReport,
    /// `None` when the standings response was empty
    pub standings: Option<usize>,
}

/// Counts for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub seasons: Vec<SeasonReport>,
    pub active_players: Option<usize>,
    pub injuries: Option<usize>,
    pub injured_out: Option<usize>,
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for season in &self.seasons {
            let (fetched, skipped) = season
                .box_scores
                .as_ref()
                .map(|b| (b.dates_fetched, b.dates_skipped))
                .unwrap_or_default();
            writeln!(
                f,
                "Season {}: {} advanced stats, {} games, {} box score dates ({} skipped), {} player rows, {} standings",
                season.season,
                season.advanced_stats,
                season.games,
                fetched,
                skipped,
                season.combined.rows,
                season.standings.unwrap_or(0)
            )?;
        }
        if let Some(players) = self.active_players {
            writeln!(f, "Active players: {players}")?;
        }
        if let Some(injuries) = self.injuries {
            writeln!(
                f,
                "Injuries: {} ({} out)",
                injuries,
                self.injured_out.unwrap_or(0)
            )?;
        }
        Ok(())
    }
}

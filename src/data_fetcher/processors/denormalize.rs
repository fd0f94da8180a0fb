use crate::data_fetcher::models::{BoxScoreGame, PlayerGameStat, TeamSide};
use serde::Serialize;

/// Header of the combined per-season box score table, in output order.
pub const COMBINED_HEADERS: [&str; 32] = [
    "date",
    "season",
    "status",
    "home_team_id",
    "home_team",
    "visitor_team_id",
    "visitor_team",
    "home_score",
    "visitor_score",
    "player_id",
    "player_first_name",
    "player_last_name",
    "team",
    "minutes",
    "fgm",
    "fga",
    "fg_pct",
    "fg3m",
    "fg3a",
    "fg3_pct",
    "ftm",
    "fta",
    "ft_pct",
    "oreb",
    "dreb",
    "reb",
    "ast",
    "stl",
    "blk",
    "turnover",
    "pf",
    "pts",
];

/// One player's line in one game, with the game context repeated on every row.
/// Field order matches [`COMBINED_HEADERS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlatPlayerRow {
    pub date: String,
    pub season: String,
    pub status: String,
    pub home_team_id: String,
    pub home_team: String,
    pub visitor_team_id: String,
    pub visitor_team: String,
    pub home_score: String,
    pub visitor_score: String,
    pub player_id: String,
    pub player_first_name: String,
    pub player_last_name: String,
    /// Full name of the side this player played for
    pub team: String,
    pub minutes: String,
    pub fgm: String,
    pub fga: String,
    pub fg_pct: String,
    pub fg3m: String,
    pub fg3a: String,
    pub fg3_pct: String,
    pub ftm: String,
    pub fta: String,
    pub ft_pct: String,
    pub oreb: String,
    pub dreb: String,
    pub reb: String,
    pub ast: String,
    pub stl: String,
    pub blk: String,
    pub turnover: String,
    pub pf: String,
    pub pts: String,
}

/// Game level columns shared by every row of one game.
struct GameContext {
    date: String,
    season: String,
    status: String,
    home_team_id: String,
    home_team: String,
    visitor_team_id: String,
    visitor_team: String,
    home_score: String,
    visitor_score: String,
}

impl GameContext {
    fn new(game: &BoxScoreGame) -> Self {
        let (home_team_id, home_team) = team_identity(game.home_team.as_ref());
        let (visitor_team_id, visitor_team) = team_identity(game.visitor_team.as_ref());
        GameContext {
            date: game.date.to_string(),
            season: game.season.to_string(),
            status: game.status.to_string(),
            home_team_id,
            home_team,
            visitor_team_id,
            visitor_team,
            home_score: game.home_team_score.to_string(),
            visitor_score: game.visitor_team_score.to_string(),
        }
    }

    fn player_row(&self, team_name: &str, stat: &PlayerGameStat) -> FlatPlayerRow {
        let (player_id, player_first_name, player_last_name) = match &stat.player {
            Some(player) => (
                player.id.to_string(),
                player.first_name.to_string(),
                player.last_name.to_string(),
            ),
            None => Default::default(),
        };

        FlatPlayerRow {
            date: self.date.clone(),
            season: self.season.clone(),
            status: self.status.clone(),
            home_team_id: self.home_team_id.clone(),
            home_team: self.home_team.clone(),
            visitor_team_id: self.visitor_team_id.clone(),
            visitor_team: self.visitor_team.clone(),
            home_score: self.home_score.clone(),
            visitor_score: self.visitor_score.clone(),
            player_id,
            player_first_name,
            player_last_name,
            team: team_name.to_string(),
            minutes: stat.minutes.to_string(),
            fgm: stat.fgm.to_string(),
            fga: stat.fga.to_string(),
            fg_pct: stat.fg_pct.to_string(),
            fg3m: stat.fg3m.to_string(),
            fg3a: stat.fg3a.to_string(),
            fg3_pct: stat.fg3_pct.to_string(),
            ftm: stat.ftm.to_string(),
            fta: stat.fta.to_string(),
            ft_pct: stat.ft_pct.to_string(),
            oreb: stat.oreb.to_string(),
            dreb: stat.dreb.to_string(),
            reb: stat.reb.to_string(),
            ast: stat.ast.to_string(),
            stl: stat.stl.to_string(),
            blk: stat.blk.to_string(),
            turnover: stat.turnover.to_string(),
            pf: stat.pf.to_string(),
            pts: stat.pts.to_string(),
        }
    }
}

fn team_identity(team: Option<&TeamSide>) -> (String, String) {
    team.map(|t| (t.id.to_string(), t.full_name.to_string()))
        .unwrap_or_default()
}

/// Expands one game into a row per player: home roster first, then visitors.
pub fn denormalize_game(game: &BoxScoreGame) -> Vec<FlatPlayerRow> {
    let context = GameContext::new(game);
    let mut rows = Vec::new();

    for side in [game.home_team.as_ref(), game.visitor_team.as_ref()]
        .into_iter()
        .flatten()
    {
        let team_name = side.full_name.to_string();
        rows.extend(
            side.players
                .iter()
                .map(|stat| context.player_row(&team_name, stat)),
        );
    }

    rows
}

/// Expands every game in iteration order.
pub fn denormalize_games<'a, I>(games: I) -> Vec<FlatPlayerRow>
where
    I: IntoIterator<Item = &'a BoxScoreGame>,
{
    games.into_iter().flat_map(denormalize_game).collect()
}

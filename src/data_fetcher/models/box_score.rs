use super::common::{Cell, null_as_default};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How many layers of JSON-in-a-JSON-string are unwrapped before giving up.
const MAX_DECODE_DEPTH: usize = 4;

/// Response of the box scores by date endpoint, also the layout of the
/// intermediate per-date documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxScoreCollection {
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<BoxScoreGame>,
}

/// One game with both rosters. Every field tolerates being absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxScoreGame {
    pub date: Cell,
    pub season: Cell,
    pub status: Cell,
    pub home_team: Option<TeamSide>,
    pub visitor_team: Option<TeamSide>,
    pub home_team_score: Cell,
    pub visitor_team_score: Cell,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSide {
    pub id: Cell,
    pub full_name: Cell,
    #[serde(deserialize_with = "null_as_default")]
    pub players: Vec<PlayerGameStat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerIdentity {
    pub id: Cell,
    pub first_name: Cell,
    pub last_name: Cell,
}

/// Per-player box score line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerGameStat {
    pub player: Option<PlayerIdentity>,
    #[serde(rename = "min")]
    pub minutes: Cell,
    pub fgm: Cell,
    pub fga: Cell,
    pub fg_pct: Cell,
    pub fg3m: Cell,
    pub fg3a: Cell,
    pub fg3_pct: Cell,
    pub ftm: Cell,
    pub fta: Cell,
    pub ft_pct: Cell,
    pub oreb: Cell,
    pub dreb: Cell,
    pub reb: Cell,
    pub ast: Cell,
    pub stl: Cell,
    pub blk: Cell,
    pub turnover: Cell,
    pub pf: Cell,
    pub pts: Cell,
}

/// Decodes a stored box score document.
///
/// Older documents hold the response as a JSON string that itself contains
/// JSON, so string values are decoded again until a structured value shows up.
pub fn decode_box_score_document(text: &str) -> Result<BoxScoreCollection, AppError> {
    let mut value: Value = serde_json::from_str(text)?;
    for _ in 0..MAX_DECODE_DEPTH {
        match value {
            Value::String(inner) => value = serde_json::from_str(&inner)?,
            _ => break,
        }
    }

    match value {
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        Value::Array(_) => Ok(BoxScoreCollection {
            data: serde_json::from_value(value)?,
        }),
        other => Err(AppError::api_unexpected_structure(
            format!("expected a box score object, found {}", json_kind(&other)),
            "box score document",
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

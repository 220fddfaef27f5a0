//! Aggregated statistics and lineup rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Which side of the fixture a lineup entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
  Home,
  Away,
}

impl Side {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Home => "home",
      Self::Away => "away",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "home" => Ok(Self::Home),
      "away" => Ok(Self::Away),
      other => Err(Error::UnknownSide(other.to_owned())),
    }
  }
}

// ─── Match statistics ────────────────────────────────────────────────────────

/// One row of the long/narrow team-statistics fact table: a single stat key
/// for a single period of a fixture, with the home and away values side by
/// side. Unique on `(fixture_id, period, key)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchStatistic {
  pub id:         i64,
  pub fixture_id: i64,
  /// Feed period marker: "ALL", "1ST", "2ND".
  pub period:     String,
  pub group_name: Option<String>,
  pub key:        String,
  pub name:       Option<String>,
  pub value_type: Option<String>,
  pub home_value: Option<f64>,
  pub away_value: Option<f64>,
  /// Untouched textual values ("57%", "12/19"); the numeric columns are the
  /// parsed form.
  pub home_raw:   Option<String>,
  pub away_raw:   Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMatchStatistic {
  pub fixture_id: i64,
  pub period:     String,
  pub group_name: Option<String>,
  pub key:        String,
  pub name:       Option<String>,
  pub value_type: Option<String>,
  pub home_value: Option<f64>,
  pub away_value: Option<f64>,
  pub home_raw:   Option<String>,
  pub away_raw:   Option<String>,
}

// ─── Player statistics ───────────────────────────────────────────────────────

/// Per-player numbers for one fixture. The feed delivers an open-ended stat
/// map, kept whole in `stats_json`; a few scalars are denormalized out of it
/// for cheap filtering. Unique on `(fixture_id, player_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStatistic {
  pub id:            i64,
  pub fixture_id:    i64,
  pub player_id:     i64,
  pub team_id:       Option<i64>,
  pub side:          Option<Side>,
  pub position:      Option<String>,
  pub jersey_number: Option<String>,
  pub started:       bool,
  pub substitute:    bool,
  pub stats_json:    Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlayerStatistic {
  pub fixture_id:    i64,
  pub player_id:     i64,
  pub team_id:       Option<i64>,
  pub side:          Option<Side>,
  pub position:      Option<String>,
  pub jersey_number: Option<String>,
  pub started:       bool,
  pub substitute:    bool,
  pub stats_json:    Value,
}

// ─── Appearances ─────────────────────────────────────────────────────────────

/// The lineup join entity, one row per (player, fixture).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appearance {
  pub id:             i64,
  pub player_id:      i64,
  pub fixture_id:     i64,
  pub team_id:        Option<i64>,
  pub started:        bool,
  pub substitute:     bool,
  pub subbed_in:      bool,
  pub subbed_out:     bool,
  pub minutes_played: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppearance {
  pub player_id:      i64,
  pub team_id:        Option<i64>,
  pub started:        bool,
  pub substitute:     bool,
  pub subbed_in:      bool,
  pub subbed_out:     bool,
  pub minutes_played: Option<i64>,
}

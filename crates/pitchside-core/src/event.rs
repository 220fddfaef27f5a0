//! Discrete match events: goals, cards, shots, substitutions, and the
//! generalized incident rows.
//!
//! Events are immutable once recorded; the only mutation they ever see is
//! cascading deletion when their parent fixture is removed. Team and player
//! references are soft: the event row outlives a deleted dimension row with
//! the reference set to NULL.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

// ─── Match clock ─────────────────────────────────────────────────────────────

/// Which period of the match a minute falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Half {
  #[serde(rename = "1")]
  First,
  #[serde(rename = "2")]
  Second,
  #[serde(rename = "ET1")]
  ExtraFirst,
  #[serde(rename = "ET2")]
  ExtraSecond,
}

impl Half {
  /// Derive the half from a base minute (added time excluded). Minutes past
  /// 120 have no half marker.
  pub fn from_minute(minute: i64) -> Option<Self> {
    match minute {
      i64::MIN..=45 => Some(Self::First),
      46..=90 => Some(Self::Second),
      91..=105 => Some(Self::ExtraFirst),
      106..=120 => Some(Self::ExtraSecond),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::First => "1",
      Self::Second => "2",
      Self::ExtraFirst => "ET1",
      Self::ExtraSecond => "ET2",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "1" => Ok(Self::First),
      "2" => Ok(Self::Second),
      "ET1" => Ok(Self::ExtraFirst),
      "ET2" => Ok(Self::ExtraSecond),
      other => Err(Error::UnknownHalf(other.to_owned())),
    }
  }
}

// ─── Goals ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
  pub id:               i64,
  pub fixture_id:       i64,
  pub team_id:          Option<i64>,
  pub player_id:        Option<i64>,
  pub assist_player_id: Option<i64>,
  pub goal_minute:      Option<i64>,
  pub added_time:       Option<i64>,
  pub match_minute:     Option<i64>,
  pub half:             Option<Half>,
  /// Feed classification: "regular", "penalty", "ownGoal", ...
  pub goal_type:        Option<String>,
  pub is_own_goal:      bool,
  pub incident_id:      Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
  pub team_id:          Option<i64>,
  pub player_id:        Option<i64>,
  pub assist_player_id: Option<i64>,
  pub goal_minute:      Option<i64>,
  pub added_time:       Option<i64>,
  pub match_minute:     Option<i64>,
  pub half:             Option<Half>,
  pub goal_type:        Option<String>,
  pub is_own_goal:      bool,
  pub incident_id:      Option<i64>,
}

// ─── Cards ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
  pub id:           i64,
  pub fixture_id:   i64,
  pub team_id:      Option<i64>,
  pub player_id:    Option<i64>,
  pub card_minute:  Option<i64>,
  pub added_time:   Option<i64>,
  pub match_minute: Option<i64>,
  pub yellow:       bool,
  /// Second yellow leading to a dismissal; implies both `yellow` and `red`.
  pub yellow_2:     bool,
  pub red:          bool,
  pub reason:       Option<String>,
  pub rescinded:    bool,
  pub incident_id:  Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCard {
  pub team_id:      Option<i64>,
  pub player_id:    Option<i64>,
  pub card_minute:  Option<i64>,
  pub added_time:   Option<i64>,
  pub match_minute: Option<i64>,
  pub yellow:       bool,
  pub yellow_2:     bool,
  pub red:          bool,
  pub reason:       Option<String>,
  pub rescinded:    bool,
  pub incident_id:  Option<i64>,
}

// ─── Shots ───────────────────────────────────────────────────────────────────

/// One shot from the shotmap. Coordinate blobs are kept as raw JSON; their
/// shape is the feed's business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
  pub id:                     i64,
  pub fixture_id:             i64,
  /// Feed-assigned shot ID, unique within a fixture.
  pub shot_id:                i64,
  pub team_id:                Option<i64>,
  pub player_id:              Option<i64>,
  pub shot_type:              Option<String>,
  pub goal_type:              Option<String>,
  pub situation:              Option<String>,
  pub body_part:              Option<String>,
  pub goal_mouth_location:    Option<String>,
  pub player_coordinates:     Option<Value>,
  pub goal_mouth_coordinates: Option<Value>,
  pub draw_coordinates:       Option<Value>,
  pub xg:                     Option<f64>,
  pub xgot:                   Option<f64>,
  pub minute:                 Option<i64>,
  pub added_time:             Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShot {
  pub shot_id:                i64,
  pub team_id:                Option<i64>,
  pub player_id:              Option<i64>,
  pub shot_type:              Option<String>,
  pub goal_type:              Option<String>,
  pub situation:              Option<String>,
  pub body_part:              Option<String>,
  pub goal_mouth_location:    Option<String>,
  pub player_coordinates:     Option<Value>,
  pub goal_mouth_coordinates: Option<Value>,
  pub draw_coordinates:       Option<Value>,
  pub xg:                     Option<f64>,
  pub xgot:                   Option<f64>,
  pub minute:                 Option<i64>,
  pub added_time:             Option<i64>,
}

// ─── Substitutions ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substitution {
  pub id:            i64,
  pub fixture_id:    i64,
  pub team_id:       Option<i64>,
  pub player_in_id:  Option<i64>,
  pub player_out_id: Option<i64>,
  pub minute:        Option<i64>,
  pub added_time:    Option<i64>,
  pub match_minute:  Option<i64>,
  pub half:          Option<Half>,
  /// Forced by injury rather than tactical.
  pub injury:        bool,
  pub incident_id:   Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubstitution {
  pub team_id:       Option<i64>,
  pub player_in_id:  Option<i64>,
  pub player_out_id: Option<i64>,
  pub minute:        Option<i64>,
  pub added_time:    Option<i64>,
  pub match_minute:  Option<i64>,
  pub half:          Option<Half>,
  pub injury:        bool,
  pub incident_id:   Option<i64>,
}

// ─── Generic incidents ───────────────────────────────────────────────────────

/// Incident families that land in the wide `incidents` table rather than one
/// of the specifically-typed event tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncidentType {
  /// Period boundary: HT, FT, match end of extra time.
  Period,
  /// Injury-time announcement for a half.
  InjuryTime,
  /// VAR review outcome.
  VarDecision,
  /// Penalty awarded (and taken) in open play.
  InGamePenalty,
}

impl IncidentType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Period => "period",
      Self::InjuryTime => "injuryTime",
      Self::VarDecision => "varDecision",
      Self::InGamePenalty => "inGamePenalty",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "period" => Ok(Self::Period),
      "injuryTime" => Ok(Self::InjuryTime),
      "varDecision" => Ok(Self::VarDecision),
      "inGamePenalty" => Ok(Self::InGamePenalty),
      other => Err(Error::UnknownIncidentType(other.to_owned())),
    }
  }
}

/// A row in the wide `incidents` table.
///
/// Which optional columns are populated depends on `incident_type`; the full
/// raw feed payload is always retained in `incident_data` so nothing the
/// typed columns miss is lost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
  pub id:                  i64,
  pub fixture_id:          i64,
  pub incident_type:       IncidentType,
  pub incident_id:         Option<i64>,
  pub team_id:             Option<i64>,
  pub player_id:           Option<i64>,
  pub minute:              Option<i64>,
  pub added_time:          Option<i64>,
  pub match_minute:        Option<i64>,
  pub half:                Option<Half>,
  // period
  pub text:                Option<String>,
  pub home_score:          Option<i64>,
  pub away_score:          Option<i64>,
  pub is_live:             bool,
  pub time_seconds:        Option<i64>,
  pub period_time_seconds: Option<i64>,
  // injuryTime
  pub length:              Option<i64>,
  // varDecision
  pub confirmed:           bool,
  pub incident_class:      Option<String>,
  // inGamePenalty
  pub reason:              Option<String>,
  pub description:         Option<String>,
  pub incident_data:       Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIncident {
  pub incident_type:       IncidentType,
  pub incident_id:         Option<i64>,
  pub team_id:             Option<i64>,
  pub player_id:           Option<i64>,
  pub minute:              Option<i64>,
  pub added_time:          Option<i64>,
  pub match_minute:        Option<i64>,
  pub half:                Option<Half>,
  pub text:                Option<String>,
  pub home_score:          Option<i64>,
  pub away_score:          Option<i64>,
  pub is_live:             bool,
  pub time_seconds:        Option<i64>,
  pub period_time_seconds: Option<i64>,
  pub length:              Option<i64>,
  pub confirmed:           bool,
  pub incident_class:      Option<String>,
  pub reason:              Option<String>,
  pub description:         Option<String>,
  pub incident_data:       Value,
}

// ─── Batches ─────────────────────────────────────────────────────────────────

/// Everything one incidents payload yields for a fixture, split by family.
#[derive(Debug, Clone, Default)]
pub struct MatchEvents {
  pub goals:         Vec<NewGoal>,
  pub cards:         Vec<NewCard>,
  pub substitutions: Vec<NewSubstitution>,
  pub incidents:     Vec<NewIncident>,
}

impl MatchEvents {
  pub fn is_empty(&self) -> bool {
    self.goals.is_empty()
      && self.cards.is_empty()
      && self.substitutions.is_empty()
      && self.incidents.is_empty()
  }
}

/// How many rows of each family a [`MatchEvents`] write actually inserted
/// (duplicates from re-ingestion are skipped).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
  pub goals:         usize,
  pub cards:         usize,
  pub substitutions: usize,
  pub incidents:     usize,
}

impl EventCounts {
  pub fn total(self) -> usize {
    self.goals + self.cards + self.substitutions + self.incidents
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn half_boundaries() {
    assert_eq!(Half::from_minute(1), Some(Half::First));
    assert_eq!(Half::from_minute(45), Some(Half::First));
    assert_eq!(Half::from_minute(46), Some(Half::Second));
    assert_eq!(Half::from_minute(90), Some(Half::Second));
    assert_eq!(Half::from_minute(91), Some(Half::ExtraFirst));
    assert_eq!(Half::from_minute(105), Some(Half::ExtraFirst));
    assert_eq!(Half::from_minute(106), Some(Half::ExtraSecond));
    assert_eq!(Half::from_minute(120), Some(Half::ExtraSecond));
    assert_eq!(Half::from_minute(121), None);
  }

  #[test]
  fn incident_type_markers_round_trip() {
    for t in [
      IncidentType::Period,
      IncidentType::InjuryTime,
      IncidentType::VarDecision,
      IncidentType::InGamePenalty,
    ] {
      assert_eq!(IncidentType::parse(t.as_str()).unwrap(), t);
    }
    assert!(IncidentType::parse("corner").is_err());
  }
}

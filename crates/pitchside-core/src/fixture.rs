//! A fixture is a single scheduled or played match.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Full-time outcome from the home team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixtureResult {
  #[serde(rename = "H")]
  HomeWin,
  #[serde(rename = "A")]
  AwayWin,
  #[serde(rename = "D")]
  Draw,
}

impl FixtureResult {
  /// Derive the H/A/D marker from a current scoreline.
  pub fn from_scores(home: i64, away: i64) -> Self {
    match home.cmp(&away) {
      std::cmp::Ordering::Greater => Self::HomeWin,
      std::cmp::Ordering::Less => Self::AwayWin,
      std::cmp::Ordering::Equal => Self::Draw,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::HomeWin => "H",
      Self::AwayWin => "A",
      Self::Draw => "D",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "H" => Ok(Self::HomeWin),
      "A" => Ok(Self::AwayWin),
      "D" => Ok(Self::Draw),
      other => Err(Error::UnknownResult(other.to_owned())),
    }
  }
}

/// A persisted fixture row.
///
/// `fixture_id` is the stable external identifier every fact table joins on;
/// the surrogate `id` exists only as the row's primary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
  pub id:                i64,
  pub fixture_id:        i64,
  pub fixture_custom_id: Option<String>,
  pub home_team_id:      Option<i64>,
  pub away_team_id:      Option<i64>,
  pub season_id:         Option<i64>,
  pub round:             Option<i64>,
  pub kickoff_date_time: Option<DateTime<Utc>>,
  pub status:            Option<String>,
  pub home_score:        Option<i64>,
  pub away_score:        Option<i64>,
  pub result:            Option<FixtureResult>,
  pub injury_time_1:     i64,
  pub injury_time_2:     i64,
  /// 90 plus both injury-time allowances.
  pub total_time:        i64,
  /// Row IDs into `managers`; NULLed if the manager row disappears.
  pub home_manager_id:   Option<i64>,
  pub away_manager_id:   Option<i64>,
  pub created_at:        DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFixture {
  pub fixture_id:        i64,
  pub fixture_custom_id: Option<String>,
  pub home_team_id:      Option<i64>,
  pub away_team_id:      Option<i64>,
  pub season_id:         Option<i64>,
  pub round:             Option<i64>,
  pub kickoff_date_time: Option<DateTime<Utc>>,
  pub status:            Option<String>,
  pub home_score:        Option<i64>,
  pub away_score:        Option<i64>,
  pub result:            Option<FixtureResult>,
  pub injury_time_1:     i64,
  pub injury_time_2:     i64,
  pub total_time:        i64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn result_from_scores() {
    assert_eq!(FixtureResult::from_scores(2, 0), FixtureResult::HomeWin);
    assert_eq!(FixtureResult::from_scores(0, 3), FixtureResult::AwayWin);
    assert_eq!(FixtureResult::from_scores(1, 1), FixtureResult::Draw);
  }

  #[test]
  fn result_round_trips_markers() {
    for r in [FixtureResult::HomeWin, FixtureResult::AwayWin, FixtureResult::Draw] {
      assert_eq!(FixtureResult::parse(r.as_str()).unwrap(), r);
    }
    assert!(FixtureResult::parse("X").is_err());
  }
}

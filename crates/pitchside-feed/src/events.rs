//! Round event pages, the per-round fixture listing.

use std::collections::BTreeMap;

use chrono::DateTime;
use pitchside_core::{
  dimension::NewTeam,
  fixture::{FixtureResult, NewFixture},
};
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct RoundEventsPage {
  #[serde(default)]
  pub events: Vec<RoundEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundEvent {
  pub id:              i64,
  pub custom_id:       Option<String>,
  pub home_team:       Option<TeamRef>,
  pub away_team:       Option<TeamRef>,
  pub home_score:      Option<Score>,
  pub away_score:      Option<Score>,
  pub status:          Option<Status>,
  pub start_timestamp: Option<i64>,
  /// Absent on scheduled games; only events carrying it become fixtures.
  pub time:            Option<MatchTime>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
  pub id:          i64,
  pub name:        String,
  pub short_name:  Option<String>,
  pub slug:        Option<String>,
  pub name_code:   Option<String>,
  pub team_colors: Option<TeamColors>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamColors {
  pub primary:   Option<String>,
  pub secondary: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Score {
  pub current: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Status {
  #[serde(rename = "type")]
  pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTime {
  #[serde(rename = "injuryTime1")]
  pub injury_time_1: Option<i64>,
  #[serde(rename = "injuryTime2")]
  pub injury_time_2: Option<i64>,
}

pub fn parse_round_events(json: &str) -> Result<RoundEventsPage> {
  Ok(serde_json::from_str(json)?)
}

/// Fixture rows for one round. Events without a `time` block are scheduled
/// games and are skipped; scores default to 0 so the H/A/D result is always
/// derivable for the rest.
pub fn fixtures_from_round(
  page: &RoundEventsPage,
  season_id: i64,
  round: i64,
) -> Vec<NewFixture> {
  page
    .events
    .iter()
    .filter_map(|e| {
      let time = e.time.as_ref()?;
      let injury_time_1 = time.injury_time_1.unwrap_or(0);
      let injury_time_2 = time.injury_time_2.unwrap_or(0);
      let home_score = e.home_score.as_ref().and_then(|s| s.current).unwrap_or(0);
      let away_score = e.away_score.as_ref().and_then(|s| s.current).unwrap_or(0);

      Some(NewFixture {
        fixture_id:        e.id,
        fixture_custom_id: e.custom_id.clone(),
        home_team_id:      e.home_team.as_ref().map(|t| t.id),
        away_team_id:      e.away_team.as_ref().map(|t| t.id),
        season_id:         Some(season_id),
        round:             Some(round),
        kickoff_date_time: e
          .start_timestamp
          .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        status:            Some(
          e.status
            .as_ref()
            .and_then(|s| s.kind.clone())
            .unwrap_or_else(|| "unknown".to_owned()),
        ),
        home_score:        Some(home_score),
        away_score:        Some(away_score),
        result:            Some(FixtureResult::from_scores(home_score, away_score)),
        injury_time_1,
        injury_time_2,
        total_time:        90 + injury_time_1 + injury_time_2,
      })
    })
    .collect()
}

/// Every team mentioned on the page, deduplicated by external team ID.
pub fn teams_from_round(page: &RoundEventsPage) -> Vec<NewTeam> {
  let mut by_id: BTreeMap<i64, NewTeam> = BTreeMap::new();
  for event in &page.events {
    for team in [&event.home_team, &event.away_team].into_iter().flatten() {
      by_id.entry(team.id).or_insert_with(|| NewTeam {
        team_id:         team.id,
        name:            team.name.clone(),
        short_name:      team.short_name.clone(),
        slug:            team.slug.clone(),
        name_code:       team.name_code.clone(),
        primary_color:   team.team_colors.as_ref().and_then(|c| c.primary.clone()),
        secondary_color: team.team_colors.as_ref().and_then(|c| c.secondary.clone()),
      });
    }
  }
  by_id.into_values().collect()
}

//! Lineup payloads, the source of players, per-player statistics, and
//! appearance rows.

use pitchside_core::{
  dimension::NewPlayer,
  event::NewSubstitution,
  stats::{NewAppearance, NewPlayerStatistic, Side},
};
use serde::Deserialize;
use serde_json::Value;

use crate::Result;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LineupsPage {
  pub home: SideLineup,
  pub away: SideLineup,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SideLineup {
  pub players: Vec<LineupEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineupEntry {
  pub player:        Option<LineupPlayer>,
  pub substitute:    bool,
  pub position:      Option<String>,
  pub jersey_number: Option<String>,
  pub statistics:    Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineupPlayer {
  pub id:                      Option<i64>,
  pub name:                    Option<String>,
  pub short_name:              Option<String>,
  pub date_of_birth_timestamp: Option<i64>,
  pub sofascore_id:            Option<String>,
}

pub fn parse_lineups(json: &str) -> Result<LineupsPage> {
  Ok(serde_json::from_str(json)?)
}

fn sides(
  page: &LineupsPage,
  home_team_id: Option<i64>,
  away_team_id: Option<i64>,
) -> [(&SideLineup, Side, Option<i64>); 2] {
  [
    (&page.home, Side::Home, home_team_id),
    (&page.away, Side::Away, away_team_id),
  ]
}

/// Player dimension rows from both lineups. The external feed ID doubles as
/// `sofascore_id` when the payload carries no dedicated one.
pub fn players_from_lineups(
  page: &LineupsPage,
  home_team_id: Option<i64>,
  away_team_id: Option<i64>,
) -> Vec<NewPlayer> {
  let mut rows = Vec::new();
  for (side, _, team_id) in sides(page, home_team_id, away_team_id) {
    for entry in &side.players {
      let Some(player) = entry.player.as_ref() else { continue };
      let Some(player_id) = player.id else { continue };
      rows.push(NewPlayer {
        player_id,
        name: player.name.clone(),
        short_name: player.short_name.clone(),
        date_of_birth_timestamp: player.date_of_birth_timestamp,
        team_id,
        sofascore_id: player
          .sofascore_id
          .clone()
          .or_else(|| Some(player_id.to_string())),
      });
    }
  }
  rows
}

/// One statistics row per listed player; the open-ended stat map travels
/// whole in `stats_json`.
pub fn player_statistics_from_lineups(
  page: &LineupsPage,
  fixture_id: i64,
  home_team_id: Option<i64>,
  away_team_id: Option<i64>,
) -> Vec<NewPlayerStatistic> {
  let mut rows = Vec::new();
  for (lineup, side, team_id) in sides(page, home_team_id, away_team_id) {
    for entry in &lineup.players {
      let Some(player_id) = entry.player.as_ref().and_then(|p| p.id) else {
        continue;
      };
      let stats_json = match &entry.statistics {
        Value::Null => Value::Object(Default::default()),
        v => v.clone(),
      };
      rows.push(NewPlayerStatistic {
        fixture_id,
        player_id,
        team_id,
        side: Some(side),
        position: entry.position.clone(),
        jersey_number: entry.jersey_number.clone(),
        started: !entry.substitute,
        substitute: entry.substitute,
        stats_json,
      });
    }
  }
  rows
}

/// Appearance rows. Sub on/off flags come from the fixture's substitution
/// events; minutes played from the lineup stat map when present.
pub fn appearances_from_lineups(
  page: &LineupsPage,
  substitutions: &[NewSubstitution],
  home_team_id: Option<i64>,
  away_team_id: Option<i64>,
) -> Vec<NewAppearance> {
  let mut rows = Vec::new();
  for (lineup, _, team_id) in sides(page, home_team_id, away_team_id) {
    for entry in &lineup.players {
      let Some(player_id) = entry.player.as_ref().and_then(|p| p.id) else {
        continue;
      };
      rows.push(NewAppearance {
        player_id,
        team_id,
        started: !entry.substitute,
        substitute: entry.substitute,
        subbed_in: substitutions
          .iter()
          .any(|s| s.player_in_id == Some(player_id)),
        subbed_out: substitutions
          .iter()
          .any(|s| s.player_out_id == Some(player_id)),
        minutes_played: entry.statistics.get("minutesPlayed").and_then(Value::as_i64),
      });
    }
  }
  rows
}

#[cfg(test)]
mod tests {
  use super::*;

  const PAGE: &str = r#"{
    "home": {
      "players": [
        {
          "player": {
            "id": 100, "name": "Bukayo Saka", "shortName": "B. Saka",
            "dateOfBirthTimestamp": 999999999
          },
          "position": "F", "jerseyNumber": "7",
          "statistics": { "minutesPlayed": 72, "goals": 1, "rating": 7.9 }
        },
        {
          "player": { "id": 101, "name": "Declan Rice" },
          "substitute": true,
          "statistics": { "minutesPlayed": 18 }
        }
      ]
    },
    "away": {
      "players": [
        { "player": { "id": 200, "name": "Cole Palmer" }, "position": "M" },
        { "statistics": {} }
      ]
    }
  }"#;

  fn sub_on_101_off_100() -> NewSubstitution {
    NewSubstitution {
      team_id:       Some(10),
      player_in_id:  Some(101),
      player_out_id: Some(100),
      minute:        Some(72),
      added_time:    None,
      match_minute:  Some(72),
      half:          None,
      injury:        false,
      incident_id:   None,
    }
  }

  #[test]
  fn players_carry_side_team_and_fallback_feed_id() {
    let page = parse_lineups(PAGE).unwrap();
    let players = players_from_lineups(&page, Some(10), Some(20));

    // The entry with no player object is skipped.
    assert_eq!(players.len(), 3);
    assert_eq!(players[0].player_id, 100);
    assert_eq!(players[0].team_id, Some(10));
    assert_eq!(players[0].sofascore_id.as_deref(), Some("100"));
    assert_eq!(players[2].team_id, Some(20));
  }

  #[test]
  fn statistics_rows_split_starters_and_substitutes() {
    let page = parse_lineups(PAGE).unwrap();
    let rows = player_statistics_from_lineups(&page, 9001, Some(10), Some(20));

    assert_eq!(rows.len(), 3);
    assert!(rows[0].started && !rows[0].substitute);
    assert_eq!(rows[0].side, Some(Side::Home));
    assert_eq!(rows[0].jersey_number.as_deref(), Some("7"));
    assert_eq!(rows[0].stats_json["rating"], 7.9);
    assert!(rows[1].substitute && !rows[1].started);
    assert_eq!(rows[2].side, Some(Side::Away));
  }

  #[test]
  fn appearances_resolve_sub_flags_and_minutes() {
    let page = parse_lineups(PAGE).unwrap();
    let subs = [sub_on_101_off_100()];
    let rows = appearances_from_lineups(&page, &subs, Some(10), Some(20));

    assert_eq!(rows.len(), 3);
    let saka = &rows[0];
    assert!(saka.started && saka.subbed_out && !saka.subbed_in);
    assert_eq!(saka.minutes_played, Some(72));
    let rice = &rows[1];
    assert!(rice.substitute && rice.subbed_in);
    assert_eq!(rice.minutes_played, Some(18));
    let palmer = &rows[2];
    assert!(!palmer.subbed_in && !palmer.subbed_out);
    assert_eq!(palmer.minutes_played, None);
  }
}

//! Per-fixture incident lists: goals, cards, substitutions, and the
//! generic period/VAR/penalty incidents.
//!
//! Incidents are kept as raw [`Value`]s so the wide `incidents` table can
//! retain the complete payload; a typed view is deserialized per item for
//! the columns we normalise out.

use pitchside_core::event::{
  Half, IncidentType, MatchEvents, NewCard, NewGoal, NewIncident,
  NewSubstitution,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{norm, Result};

/// Accepts both `{"incidents": [...]}` and a bare array.
pub fn parse_incidents(json: &str) -> Result<Vec<Value>> {
  let parsed: Value = serde_json::from_str(json)?;
  Ok(match parsed {
    Value::Array(items) => items,
    Value::Object(mut map) => match map.remove("incidents") {
      Some(Value::Array(items)) => items,
      _ => Vec::new(),
    },
    _ => Vec::new(),
  })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IncidentView {
  id:                  Option<i64>,
  incident_type:       Option<String>,
  #[serde(rename = "type")]
  legacy_type:         Option<String>,
  incident_class:      Option<String>,
  is_home:             Option<bool>,
  time:                Option<i64>,
  added_time:          Option<i64>,
  player:              Option<PlayerRef>,
  player_in:           Option<PlayerRef>,
  player_out:          Option<PlayerRef>,
  assist1:             Option<PlayerRef>,
  injury:              Option<bool>,
  reason:              Option<String>,
  rescinded:           Option<bool>,
  text:                Option<String>,
  home_score:          Option<i64>,
  away_score:          Option<i64>,
  is_live:             Option<bool>,
  time_seconds:        Option<i64>,
  period_time_seconds: Option<i64>,
  length:              Option<i64>,
  confirmed:           Option<bool>,
  description:         Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlayerRef {
  id: Option<i64>,
}

/// Sort one incident list into the four event families, applying the clock
/// and side normalisations. Incident kinds outside the known families are
/// dropped.
pub fn events_from_incidents(
  items: &[Value],
  home_team_id: Option<i64>,
  away_team_id: Option<i64>,
) -> Result<MatchEvents> {
  let mut events = MatchEvents::default();

  for item in items {
    let view: IncidentView = serde_json::from_value(item.clone())?;
    let kind = view
      .incident_type
      .as_deref()
      .or(view.legacy_type.as_deref())
      .unwrap_or("unknown");

    let class = view.incident_class.as_deref();
    let team_id = norm::team_from_flag(view.is_home, home_team_id, away_team_id);
    let minute = view.time;
    let added = norm::added_time(view.added_time);
    let match_minute = norm::match_minute(minute, added);
    let half = minute.and_then(Half::from_minute);
    let incident_id = view.id;

    match kind {
      "goal" => {
        events.goals.push(NewGoal {
          team_id,
          player_id: view.player.as_ref().and_then(|p| p.id),
          assist_player_id: view.assist1.as_ref().and_then(|p| p.id),
          goal_minute: minute,
          added_time: added,
          match_minute,
          half,
          goal_type: Some(class.unwrap_or("regular").to_owned()),
          is_own_goal: class == Some("ownGoal"),
          incident_id,
        });
      }
      "card" => {
        let yellow = matches!(class, Some("yellow" | "secondYellow" | "yellowRed"));
        let red = matches!(class, Some("red" | "yellowRed" | "secondYellow"));
        let yellow_2 = matches!(class, Some("secondYellow" | "yellowRed"));
        events.cards.push(NewCard {
          team_id,
          player_id: view.player.as_ref().and_then(|p| p.id),
          card_minute: minute,
          added_time: added,
          match_minute,
          yellow,
          yellow_2,
          red,
          reason: view.reason.clone(),
          rescinded: view.rescinded.unwrap_or(false),
          incident_id,
        });
      }
      "substitution" => {
        let player_in_id = view.player_in.as_ref().and_then(|p| p.id);
        let player_out_id = view.player_out.as_ref().and_then(|p| p.id);
        if player_in_id.is_none() && player_out_id.is_none() {
          continue;
        }
        events.substitutions.push(NewSubstitution {
          team_id,
          player_in_id,
          player_out_id,
          minute,
          added_time: added,
          match_minute,
          half,
          injury: view.injury.unwrap_or(false),
          incident_id,
        });
      }
      "period" | "injuryTime" | "varDecision" | "inGamePenalty" => {
        // Infallible: the arm above enumerates exactly the parseable kinds.
        let incident_type = IncidentType::parse(kind)?;
        let carries_actor = matches!(
          incident_type,
          IncidentType::VarDecision | IncidentType::InGamePenalty
        );
        events.incidents.push(NewIncident {
          incident_type,
          incident_id,
          team_id: if carries_actor { team_id } else { None },
          player_id: if carries_actor {
            view.player.as_ref().and_then(|p| p.id)
          } else {
            None
          },
          minute,
          added_time: added,
          match_minute,
          half,
          text: view.text.clone(),
          home_score: view.home_score,
          away_score: view.away_score,
          is_live: view.is_live.unwrap_or(false),
          time_seconds: view.time_seconds,
          period_time_seconds: view.period_time_seconds,
          length: view.length,
          confirmed: view.confirmed.unwrap_or(false),
          incident_class: view.incident_class.clone(),
          reason: view.reason.clone(),
          description: view.description.clone(),
          incident_data: item.clone(),
        });
      }
      _ => {}
    }
  }

  Ok(events)
}

#[cfg(test)]
mod tests {
  use super::*;

  const PAGE: &str = r#"{
    "incidents": [
      {
        "id": 1, "incidentType": "goal", "incidentClass": "penalty",
        "isHome": true, "time": 44, "addedTime": 2,
        "player": { "id": 100, "name": "Saka" },
        "assist1": { "id": 101 }
      },
      {
        "id": 2, "incidentType": "goal", "incidentClass": "ownGoal",
        "isHome": false, "time": 60,
        "player": { "id": 200 }
      },
      {
        "id": 3, "incidentType": "card", "incidentClass": "secondYellow",
        "isHome": false, "time": 78, "player": { "id": 200 },
        "reason": "Foul"
      },
      {
        "id": 4, "incidentType": "substitution", "isHome": true,
        "time": 70, "playerIn": { "id": 101 }, "playerOut": { "id": 100 },
        "injury": true
      },
      {
        "id": 5, "incidentType": "period", "text": "HT", "time": 45,
        "addedTime": 999, "homeScore": 1, "awayScore": 0,
        "isLive": false, "timeSeconds": 2700
      },
      {
        "id": 6, "incidentType": "injuryTime", "time": 90, "length": 5
      },
      {
        "id": 7, "incidentType": "varDecision", "incidentClass": "goalAwarded",
        "isHome": true, "time": 55, "confirmed": true, "player": { "id": 100 }
      },
      { "id": 8, "incidentType": "somethingNew", "time": 12 }
    ]
  }"#;

  #[test]
  fn families_are_sorted_and_normalised() {
    let items = parse_incidents(PAGE).unwrap();
    let events = events_from_incidents(&items, Some(10), Some(20)).unwrap();

    assert_eq!(events.goals.len(), 2);
    let penalty = &events.goals[0];
    assert_eq!(penalty.team_id, Some(10));
    assert_eq!(penalty.goal_type.as_deref(), Some("penalty"));
    assert_eq!(penalty.match_minute, Some(46));
    assert_eq!(penalty.half, Some(Half::First));
    assert!(!penalty.is_own_goal);
    assert!(events.goals[1].is_own_goal);

    let card = &events.cards[0];
    assert!(card.yellow && card.yellow_2 && card.red);
    assert_eq!(card.team_id, Some(20));
    assert_eq!(card.reason.as_deref(), Some("Foul"));

    let sub = &events.substitutions[0];
    assert_eq!(sub.player_in_id, Some(101));
    assert!(sub.injury);

    // 'somethingNew' is dropped; the other three land as generic incidents.
    assert_eq!(events.incidents.len(), 3);
    let period = &events.incidents[0];
    assert_eq!(period.incident_type, IncidentType::Period);
    assert_eq!(period.added_time, None, "999 sentinel normalises away");
    assert_eq!(period.text.as_deref(), Some("HT"));
    assert_eq!(period.incident_data["text"], "HT");
    assert_eq!(events.incidents[1].length, Some(5));
    assert!(events.incidents[2].confirmed);
    assert_eq!(events.incidents[2].player_id, Some(100));
  }

  #[test]
  fn bare_array_payload_is_accepted() {
    let items = parse_incidents(r#"[{ "incidentType": "injuryTime", "time": 45, "length": 2 }]"#)
      .unwrap();
    let events = events_from_incidents(&items, None, None).unwrap();
    assert_eq!(events.incidents.len(), 1);
  }
}

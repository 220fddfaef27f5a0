//! Shotmap payloads.

use pitchside_core::event::NewShot;
use serde::Deserialize;
use serde_json::Value;

use crate::{norm, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShotmapPage {
  pub shotmap: Vec<ShotItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShotItem {
  pub id:                     Option<i64>,
  pub player:                 Option<ShotPlayer>,
  pub is_home:                Option<bool>,
  pub shot_type:              Option<String>,
  pub goal_type:              Option<String>,
  pub situation:              Option<String>,
  pub body_part:              Option<String>,
  pub goal_mouth_location:    Option<String>,
  pub player_coordinates:     Option<Value>,
  pub goal_mouth_coordinates: Option<Value>,
  pub draw:                   Option<Value>,
  pub xg:                     Option<f64>,
  pub xgot:                   Option<f64>,
  pub time:                   Option<i64>,
  pub added_time:             Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShotPlayer {
  pub id: Option<i64>,
}

pub fn parse_shotmap(json: &str) -> Result<ShotmapPage> {
  Ok(serde_json::from_str(json)?)
}

/// Shot rows for one fixture. Items without a feed shot ID cannot be
/// deduplicated and are skipped.
pub fn shots_from_shotmap(
  page: &ShotmapPage,
  home_team_id: Option<i64>,
  away_team_id: Option<i64>,
) -> Vec<NewShot> {
  page
    .shotmap
    .iter()
    .filter_map(|item| {
      let shot_id = item.id?;
      Some(NewShot {
        shot_id,
        team_id: norm::team_from_flag(item.is_home, home_team_id, away_team_id),
        player_id: item.player.as_ref().and_then(|p| p.id),
        shot_type: item.shot_type.clone(),
        goal_type: item.goal_type.clone(),
        situation: item.situation.clone(),
        body_part: item.body_part.clone(),
        goal_mouth_location: item.goal_mouth_location.clone(),
        player_coordinates: item.player_coordinates.clone(),
        goal_mouth_coordinates: item.goal_mouth_coordinates.clone(),
        draw_coordinates: item.draw.clone(),
        xg: item.xg,
        xgot: item.xgot,
        minute: item.time,
        added_time: item.added_time,
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  const PAGE: &str = r#"{
    "shotmap": [
      {
        "id": 31, "isHome": true, "time": 23,
        "player": { "id": 100, "name": "Saka" },
        "shotType": "goal", "situation": "assisted", "bodyPart": "left-foot",
        "goalMouthLocation": "low-left",
        "playerCoordinates": { "x": 88.1, "y": 40.2 },
        "goalMouthCoordinates": { "x": 100, "y": 48, "z": 10 },
        "xg": 0.12, "xgot": 0.35
      },
      { "isHome": false, "time": 50, "shotType": "miss" },
      { "id": 32, "isHome": false, "time": 90, "addedTime": 3, "shotType": "save" }
    ]
  }"#;

  #[test]
  fn shots_need_an_id_and_resolve_sides() {
    let page = parse_shotmap(PAGE).unwrap();
    let shots = shots_from_shotmap(&page, Some(10), Some(20));

    assert_eq!(shots.len(), 2);
    assert_eq!(shots[0].shot_id, 31);
    assert_eq!(shots[0].team_id, Some(10));
    assert_eq!(shots[0].player_id, Some(100));
    assert_eq!(shots[0].player_coordinates, Some(json!({ "x": 88.1, "y": 40.2 })));
    assert_eq!(shots[0].xg, Some(0.12));
    assert_eq!(shots[1].team_id, Some(20));
    assert_eq!(shots[1].added_time, Some(3));
  }
}

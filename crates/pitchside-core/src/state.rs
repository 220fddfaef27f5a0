//! Game-state segmentation: who was winning, and when.
//!
//! The match clock is cut into windows between scoring events; every window
//! labels each side as winning, drawing or losing. Segments are a projection
//! of the goals table, so re-deriving them is always safe and the store
//! replaces a fixture's segments wholesale.

use serde::{Deserialize, Serialize};

use crate::{event::Half, stats::Side, Error, Result};

/// One side's situation during a window of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
  Winning,
  Drawing,
  Losing,
}

impl GameState {
  fn from_scores(own: i64, other: i64) -> Self {
    match own.cmp(&other) {
      std::cmp::Ordering::Greater => Self::Winning,
      std::cmp::Ordering::Less => Self::Losing,
      std::cmp::Ordering::Equal => Self::Drawing,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Winning => "winning",
      Self::Drawing => "drawing",
      Self::Losing => "losing",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "winning" => Ok(Self::Winning),
      "drawing" => Ok(Self::Drawing),
      "losing" => Ok(Self::Losing),
      other => Err(Error::UnknownGameState(other.to_owned())),
    }
  }
}

/// A time-boxed snapshot of match state, `[start_minute, end_minute)` on the
/// running match clock (added time folded in).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateSegment {
  pub half:         Half,
  pub start_minute: i64,
  pub end_minute:   i64,
  pub home_state:   GameState,
  pub away_state:   GameState,
}

/// A goal reduced to what segmentation needs: when it counted and which side
/// it counted for. Own goals must already be resolved to the benefiting side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringEvent {
  pub match_minute: i64,
  pub side:         Side,
}

/// Cut `0..total_time` into game-state segments around `goals`.
///
/// Goals beyond `total_time` are clamped to it; goals sharing a minute fold
/// into one boundary instead of emitting zero-width segments. The halftime
/// boundary sits at `45 + injury_time_1` on the running clock.
pub fn compute_game_states(
  total_time: i64,
  injury_time_1: i64,
  goals: &[ScoringEvent],
) -> Vec<GameStateSegment> {
  let halftime_boundary = 45 + injury_time_1;
  let half_of = |minute: i64| {
    if minute < halftime_boundary { Half::First } else { Half::Second }
  };

  let mut ordered: Vec<ScoringEvent> = goals.to_vec();
  ordered.sort_by_key(|g| g.match_minute);

  let mut segments = Vec::new();
  let mut home = 0i64;
  let mut away = 0i64;
  let mut start = 0i64;

  let push = |segments: &mut Vec<GameStateSegment>, start: i64, end: i64, home: i64, away: i64| {
    if end <= start {
      return;
    }
    segments.push(GameStateSegment {
      half:         half_of(start),
      start_minute: start,
      end_minute:   end,
      home_state:   GameState::from_scores(home, away),
      away_state:   GameState::from_scores(away, home),
    });
  };

  for goal in &ordered {
    let at = goal.match_minute.clamp(0, total_time);
    push(&mut segments, start, at, home, away);
    match goal.side {
      Side::Home => home += 1,
      Side::Away => away += 1,
    }
    start = start.max(at);
  }

  push(&mut segments, start, total_time, home, away);
  segments
}

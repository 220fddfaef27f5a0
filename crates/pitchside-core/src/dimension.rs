//! Dimension entities, the long-lived rows facts hang off.
//!
//! Tournaments, seasons, teams, managers and players are created or upserted
//! as the feed first mentions them and are rarely deleted afterwards. Each
//! pairs a `New*` input (what ingestion supplies) with the persisted row type
//! (surrogate `id` plus `created_at` assigned by the store).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Tournaments ─────────────────────────────────────────────────────────────

/// A competition, e.g. the Premier League.
///
/// The feed addresses tournaments by two distinct external IDs (`tournament`
/// and `unique-tournament` endpoints); both are kept, both unique, either may
/// be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
  pub id:                   i64,
  pub name:                 String,
  pub tournament_id:        Option<i64>,
  pub unique_tournament_id: Option<i64>,
  pub created_at:           DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTournament {
  pub name:                 String,
  pub tournament_id:        Option<i64>,
  pub unique_tournament_id: Option<i64>,
}

// ─── Seasons ─────────────────────────────────────────────────────────────────

/// One run of a tournament, e.g. "Premier League 24/25".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
  pub id:                   i64,
  /// Stable external season ID; all fixture joins use this.
  pub season_id:            i64,
  pub name:                 Option<String>,
  pub year:                 Option<String>,
  pub tournament_id:        Option<i64>,
  pub unique_tournament_id: Option<i64>,
  pub created_at:           DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSeason {
  pub season_id:            i64,
  pub name:                 Option<String>,
  pub year:                 Option<String>,
  pub tournament_id:        Option<i64>,
  pub unique_tournament_id: Option<i64>,
}

// ─── Teams ───────────────────────────────────────────────────────────────────

/// A club or side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
  pub id:              i64,
  pub team_id:         i64,
  pub name:            String,
  pub short_name:      Option<String>,
  pub slug:            Option<String>,
  pub name_code:       Option<String>,
  pub primary_color:   Option<String>,
  pub secondary_color: Option<String>,
  pub created_at:      DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeam {
  pub team_id:         i64,
  pub name:            String,
  pub short_name:      Option<String>,
  pub slug:            Option<String>,
  pub name_code:       Option<String>,
  pub primary_color:   Option<String>,
  pub secondary_color: Option<String>,
}

// ─── Managers ────────────────────────────────────────────────────────────────

/// A coach, scoped to the team they were observed managing.
///
/// The feed's manager ID is not unique on its own; the same person can
/// appear under several teams across seasons, so identity is the
/// `(manager_id, team_id)` pair and fixtures link managers by row `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manager {
  pub id:         i64,
  pub manager_id: i64,
  pub team_id:    i64,
  pub name:       Option<String>,
  pub short_name: Option<String>,
  pub slug:       Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewManager {
  pub manager_id: i64,
  pub team_id:    i64,
  pub name:       Option<String>,
  pub short_name: Option<String>,
  pub slug:       Option<String>,
}

// ─── Players ─────────────────────────────────────────────────────────────────

/// An athlete. `team_id` is the current team as last observed in a lineup
/// and goes NULL if that team row is ever removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
  pub id:                      i64,
  pub player_id:               i64,
  pub name:                    Option<String>,
  pub short_name:              Option<String>,
  /// Unix timestamp, as the feed delivers it.
  pub date_of_birth_timestamp: Option<i64>,
  pub team_id:                 Option<i64>,
  pub sofascore_id:            Option<String>,
  pub created_at:              DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlayer {
  pub player_id:               i64,
  pub name:                    Option<String>,
  pub short_name:              Option<String>,
  pub date_of_birth_timestamp: Option<i64>,
  pub team_id:                 Option<i64>,
  pub sofascore_id:            Option<String>,
}

impl NewPlayer {
  /// Number of populated optional fields; upserts keep whichever record of a
  /// player is more complete.
  pub fn completeness(&self) -> usize {
    [
      self.name.is_some(),
      self.short_name.is_some(),
      self.date_of_birth_timestamp.is_some(),
      self.team_id.is_some(),
      self.sofascore_id.is_some(),
    ]
    .iter()
    .filter(|b| **b)
    .count()
  }
}

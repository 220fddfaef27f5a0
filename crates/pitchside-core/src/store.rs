//! The `MatchStore` trait and the per-fixture read model.
//!
//! The trait is implemented by storage backends (e.g.
//! `pitchside-store-sqlite`). Ingestion and inspection layers depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  dimension::{
    Manager, NewManager, NewPlayer, NewSeason, NewTeam, NewTournament, Player,
    Season, Team, Tournament,
  },
  event::{Card, EventCounts, Goal, Incident, MatchEvents, NewShot, Shot, Substitution},
  fixture::{Fixture, NewFixture},
  state::GameStateSegment,
  stats::{
    Appearance, MatchStatistic, NewAppearance, NewMatchStatistic,
    NewPlayerStatistic, PlayerStatistic,
  },
};

// ─── Read model ──────────────────────────────────────────────────────────────

/// Everything the warehouse holds about one fixture, assembled on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
  pub fixture:           Fixture,
  pub goals:             Vec<Goal>,
  pub cards:             Vec<Card>,
  pub shots:             Vec<Shot>,
  pub substitutions:     Vec<Substitution>,
  pub incidents:         Vec<Incident>,
  pub match_statistics:  Vec<MatchStatistic>,
  pub player_statistics: Vec<PlayerStatistic>,
  pub appearances:       Vec<Appearance>,
  pub game_states:       Vec<GameStateSegment>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a match-warehouse backend.
///
/// Dimension writes are idempotent upserts: the feed re-delivers the same
/// teams, players and managers for every fixture they appear in. Fact writes
/// are insert-once: rows already present (by their natural dedup keys) are
/// skipped, never updated. The only destructive operation is
/// [`delete_fixture`](MatchStore::delete_fixture), which cascades to every
/// dependent fact row.
///
/// All methods return `Send` futures so the trait works on multi-threaded
/// async runtimes.
pub trait MatchStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Dimensions ────────────────────────────────────────────────────────

  /// Insert a tournament if no row with either of its external IDs exists.
  fn add_tournament(
    &self,
    input: NewTournament,
  ) -> impl Future<Output = Result<Tournament, Self::Error>> + Send + '_;

  fn list_tournaments(
    &self,
  ) -> impl Future<Output = Result<Vec<Tournament>, Self::Error>> + Send + '_;

  /// Insert a season keyed on its external `season_id`; an existing row wins.
  fn add_season(
    &self,
    input: NewSeason,
  ) -> impl Future<Output = Result<Season, Self::Error>> + Send + '_;

  /// List seasons, optionally restricted to one tournament.
  fn list_seasons(
    &self,
    tournament_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Season>, Self::Error>> + Send + '_;

  /// Insert or refresh a team, keyed on `team_id`.
  fn upsert_team(
    &self,
    input: NewTeam,
  ) -> impl Future<Output = Result<Team, Self::Error>> + Send + '_;

  fn get_team(
    &self,
    team_id: i64,
  ) -> impl Future<Output = Result<Option<Team>, Self::Error>> + Send + '_;

  fn list_teams(
    &self,
  ) -> impl Future<Output = Result<Vec<Team>, Self::Error>> + Send + '_;

  /// Insert or refresh a player, keyed on `player_id`. A record that fills
  /// fewer fields than the stored one never overwrites it.
  fn upsert_player(
    &self,
    input: NewPlayer,
  ) -> impl Future<Output = Result<Player, Self::Error>> + Send + '_;

  fn get_player(
    &self,
    player_id: i64,
  ) -> impl Future<Output = Result<Option<Player>, Self::Error>> + Send + '_;

  /// Insert or refresh a manager, keyed on `(manager_id, team_id)`. Returns
  /// the stored row, whose `id` is what fixtures link to.
  fn upsert_manager(
    &self,
    input: NewManager,
  ) -> impl Future<Output = Result<Manager, Self::Error>> + Send + '_;

  /// Point a fixture's home/away manager columns at manager row IDs. `None`
  /// leaves the respective column untouched.
  fn set_fixture_managers(
    &self,
    fixture_id: i64,
    home: Option<i64>,
    away: Option<i64>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Fixtures ──────────────────────────────────────────────────────────

  /// Insert fixtures whose `fixture_id` has not been seen; returns how many
  /// were actually inserted.
  fn insert_fixtures(
    &self,
    fixtures: Vec<NewFixture>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  fn get_fixture(
    &self,
    fixture_id: i64,
  ) -> impl Future<Output = Result<Option<Fixture>, Self::Error>> + Send + '_;

  /// List fixtures, optionally restricted to one season, ordered by kickoff.
  fn list_fixtures(
    &self,
    season_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Fixture>, Self::Error>> + Send + '_;

  /// Delete a fixture and, by cascade, every fact row that hangs off it.
  /// Returns whether a row was removed.
  fn delete_fixture(
    &self,
    fixture_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Facts ─────────────────────────────────────────────────────────────

  /// Record one incidents payload's worth of events for a fixture,
  /// deduplicated per family on their natural keys.
  fn record_events(
    &self,
    fixture_id: i64,
    events: MatchEvents,
  ) -> impl Future<Output = Result<EventCounts, Self::Error>> + Send + '_;

  /// Record shotmap rows, deduplicated on `(fixture_id, shot_id)`.
  fn record_shots(
    &self,
    fixture_id: i64,
    shots: Vec<NewShot>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Record team-statistics rows; duplicates on `(fixture_id, period, key)`
  /// are skipped.
  fn record_match_statistics(
    &self,
    rows: Vec<NewMatchStatistic>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Record per-player statistics rows; duplicates on
  /// `(fixture_id, player_id)` are skipped.
  fn record_player_statistics(
    &self,
    rows: Vec<NewPlayerStatistic>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Record lineup appearances; duplicates on `(player_id, fixture_id)` are
  /// skipped.
  fn record_appearances(
    &self,
    fixture_id: i64,
    rows: Vec<NewAppearance>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Replace a fixture's derived game-state segments wholesale.
  fn replace_game_states(
    &self,
    fixture_id: i64,
    segments: Vec<GameStateSegment>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Assemble the full read model for a fixture. Returns `None` if the
  /// fixture does not exist.
  fn materialize(
    &self,
    fixture_id: i64,
  ) -> impl Future<Output = Result<Option<MatchSummary>, Self::Error>> + Send + '_;
}

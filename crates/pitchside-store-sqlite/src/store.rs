//! [`SqliteStore`], the SQLite implementation of [`MatchStore`].

use std::{collections::HashSet, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use pitchside_core::{
  dimension::{
    Manager, NewManager, NewPlayer, NewSeason, NewTeam, NewTournament, Player,
    Season, Team, Tournament,
  },
  event::{
    Card, EventCounts, Goal, Incident, MatchEvents, NewShot, Shot, Substitution,
  },
  fixture::{Fixture, NewFixture},
  state::GameStateSegment,
  stats::{
    Appearance, MatchStatistic, NewAppearance, NewMatchStatistic,
    NewPlayerStatistic, PlayerStatistic,
  },
  store::{MatchStore, MatchSummary},
};

use crate::{
  encode::{
    encode_dt, encode_opt_dt, encode_opt_half, encode_opt_json, RawFixture,
    RawGameState, RawGoal, RawIncident, RawManager, RawPlayer,
    RawPlayerStatistic, RawSeason, RawShot, RawSubstitution, RawTeam,
    RawTournament,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A match warehouse backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fixture_exists(&self, fixture_id: i64) -> Result<bool> {
    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM fixtures WHERE fixture_id = ?1",
              rusqlite::params![fixture_id],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  async fn require_fixture(&self, fixture_id: i64) -> Result<()> {
    if self.fixture_exists(fixture_id).await? {
      Ok(())
    } else {
      Err(Error::FixtureNotFound(fixture_id))
    }
  }

  // ── Per-family fact reads ─────────────────────────────────────────────────
  // Used by `materialize` and directly by tests and the inspection CLI.

  pub async fn goals_for_fixture(&self, fixture_id: i64) -> Result<Vec<Goal>> {
    let raws: Vec<RawGoal> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, fixture_id, team_id, player_id, assist_player_id,
                  goal_minute, added_time, match_minute, half, type,
                  is_own_goal, incident_id
           FROM goals WHERE fixture_id = ?1
           ORDER BY match_minute, id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![fixture_id], |row| {
            Ok(RawGoal {
              id:               row.get(0)?,
              fixture_id:       row.get(1)?,
              team_id:          row.get(2)?,
              player_id:        row.get(3)?,
              assist_player_id: row.get(4)?,
              goal_minute:      row.get(5)?,
              added_time:       row.get(6)?,
              match_minute:     row.get(7)?,
              half:             row.get(8)?,
              goal_type:        row.get(9)?,
              is_own_goal:      row.get(10)?,
              incident_id:      row.get(11)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGoal::into_goal).collect()
  }

  pub async fn cards_for_fixture(&self, fixture_id: i64) -> Result<Vec<Card>> {
    let cards: Vec<Card> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, fixture_id, team_id, player_id, card_minute, added_time,
                  match_minute, yellow, yellow_2, red, reason, rescinded,
                  incident_id
           FROM cards WHERE fixture_id = ?1
           ORDER BY match_minute, id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![fixture_id], |row| {
            Ok(Card {
              id:           row.get(0)?,
              fixture_id:   row.get(1)?,
              team_id:      row.get(2)?,
              player_id:    row.get(3)?,
              card_minute:  row.get(4)?,
              added_time:   row.get(5)?,
              match_minute: row.get(6)?,
              yellow:       row.get(7)?,
              yellow_2:     row.get(8)?,
              red:          row.get(9)?,
              reason:       row.get(10)?,
              rescinded:    row.get(11)?,
              incident_id:  row.get(12)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(cards)
  }

  pub async fn shots_for_fixture(&self, fixture_id: i64) -> Result<Vec<Shot>> {
    let raws: Vec<RawShot> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, fixture_id, shot_id, team_id, player_id, shot_type,
                  goal_type, situation, body_part, goal_mouth_location,
                  player_coordinates, goal_mouth_coordinates, draw_coordinates,
                  xg, xgot, minute, added_time
           FROM shots WHERE fixture_id = ?1
           ORDER BY minute, id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![fixture_id], |row| {
            Ok(RawShot {
              id:                     row.get(0)?,
              fixture_id:             row.get(1)?,
              shot_id:                row.get(2)?,
              team_id:                row.get(3)?,
              player_id:              row.get(4)?,
              shot_type:              row.get(5)?,
              goal_type:              row.get(6)?,
              situation:              row.get(7)?,
              body_part:              row.get(8)?,
              goal_mouth_location:    row.get(9)?,
              player_coordinates:     row.get(10)?,
              goal_mouth_coordinates: row.get(11)?,
              draw_coordinates:       row.get(12)?,
              xg:                     row.get(13)?,
              xgot:                   row.get(14)?,
              minute:                 row.get(15)?,
              added_time:             row.get(16)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawShot::into_shot).collect()
  }

  pub async fn substitutions_for_fixture(
    &self,
    fixture_id: i64,
  ) -> Result<Vec<Substitution>> {
    let raws: Vec<RawSubstitution> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, fixture_id, team_id, player_in_id, player_out_id,
                  minute, added_time, match_minute, half, injury, incident_id
           FROM substitutions WHERE fixture_id = ?1
           ORDER BY match_minute, id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![fixture_id], |row| {
            Ok(RawSubstitution {
              id:            row.get(0)?,
              fixture_id:    row.get(1)?,
              team_id:       row.get(2)?,
              player_in_id:  row.get(3)?,
              player_out_id: row.get(4)?,
              minute:        row.get(5)?,
              added_time:    row.get(6)?,
              match_minute:  row.get(7)?,
              half:          row.get(8)?,
              injury:        row.get(9)?,
              incident_id:   row.get(10)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubstitution::into_substitution).collect()
  }

  pub async fn incidents_for_fixture(
    &self,
    fixture_id: i64,
  ) -> Result<Vec<Incident>> {
    let raws: Vec<RawIncident> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, fixture_id, incident_type, incident_id, team_id,
                  player_id, minute, added_time, match_minute, half, text,
                  home_score, away_score, is_live, time_seconds,
                  period_time_seconds, length, confirmed, incident_class,
                  reason, description, incident_data
           FROM incidents WHERE fixture_id = ?1
           ORDER BY match_minute, id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![fixture_id], |row| {
            Ok(RawIncident {
              id:                  row.get(0)?,
              fixture_id:          row.get(1)?,
              incident_type:       row.get(2)?,
              incident_id:         row.get(3)?,
              team_id:             row.get(4)?,
              player_id:           row.get(5)?,
              minute:              row.get(6)?,
              added_time:          row.get(7)?,
              match_minute:        row.get(8)?,
              half:                row.get(9)?,
              text:                row.get(10)?,
              home_score:          row.get(11)?,
              away_score:          row.get(12)?,
              is_live:             row.get(13)?,
              time_seconds:        row.get(14)?,
              period_time_seconds: row.get(15)?,
              length:              row.get(16)?,
              confirmed:           row.get(17)?,
              incident_class:      row.get(18)?,
              reason:              row.get(19)?,
              description:         row.get(20)?,
              incident_data:       row.get(21)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIncident::into_incident).collect()
  }

  pub async fn match_statistics_for_fixture(
    &self,
    fixture_id: i64,
  ) -> Result<Vec<MatchStatistic>> {
    let stats: Vec<MatchStatistic> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, fixture_id, period, group_name, key, name, value_type,
                  home_value, away_value, home_raw, away_raw
           FROM match_statistics WHERE fixture_id = ?1
           ORDER BY period, group_name, key",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![fixture_id], |row| {
            Ok(MatchStatistic {
              id:         row.get(0)?,
              fixture_id: row.get(1)?,
              period:     row.get(2)?,
              group_name: row.get(3)?,
              key:        row.get(4)?,
              name:       row.get(5)?,
              value_type: row.get(6)?,
              home_value: row.get(7)?,
              away_value: row.get(8)?,
              home_raw:   row.get(9)?,
              away_raw:   row.get(10)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(stats)
  }

  pub async fn player_statistics_for_fixture(
    &self,
    fixture_id: i64,
  ) -> Result<Vec<PlayerStatistic>> {
    let raws: Vec<RawPlayerStatistic> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, fixture_id, player_id, team_id, side, position,
                  jersey_number, started, substitute, stats_json
           FROM player_statistics WHERE fixture_id = ?1
           ORDER BY player_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![fixture_id], |row| {
            Ok(RawPlayerStatistic {
              id:            row.get(0)?,
              fixture_id:    row.get(1)?,
              player_id:     row.get(2)?,
              team_id:       row.get(3)?,
              side:          row.get(4)?,
              position:      row.get(5)?,
              jersey_number: row.get(6)?,
              started:       row.get(7)?,
              substitute:    row.get(8)?,
              stats_json:    row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawPlayerStatistic::into_player_statistic)
      .collect()
  }

  pub async fn appearances_for_fixture(
    &self,
    fixture_id: i64,
  ) -> Result<Vec<Appearance>> {
    let rows: Vec<Appearance> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, player_id, fixture_id, team_id, started, substitute,
                  subbed_in, subbed_out, minutes_played
           FROM players_fixtures WHERE fixture_id = ?1
           ORDER BY player_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![fixture_id], |row| {
            Ok(Appearance {
              id:             row.get(0)?,
              player_id:      row.get(1)?,
              fixture_id:     row.get(2)?,
              team_id:        row.get(3)?,
              started:        row.get(4)?,
              substitute:     row.get(5)?,
              subbed_in:      row.get(6)?,
              subbed_out:     row.get(7)?,
              minutes_played: row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn game_states_for_fixture(
    &self,
    fixture_id: i64,
  ) -> Result<Vec<GameStateSegment>> {
    let raws: Vec<RawGameState> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT half, start_minute, end_minute, home_state, away_state
           FROM game_states WHERE fixture_id = ?1
           ORDER BY start_minute",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![fixture_id], |row| {
            Ok(RawGameState {
              half:         row.get(0)?,
              start_minute: row.get(1)?,
              end_minute:   row.get(2)?,
              home_state:   row.get(3)?,
              away_state:   row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGameState::into_segment).collect()
  }
}

// ─── MatchStore impl ─────────────────────────────────────────────────────────

impl MatchStore for SqliteStore {
  type Error = Error;

  // ── Dimensions ────────────────────────────────────────────────────────────

  async fn add_tournament(&self, input: NewTournament) -> Result<Tournament> {
    let created_at = encode_dt(Utc::now());
    let raw: RawTournament = self
      .conn
      .call(move |conn| {
        // A row matching either external ID wins over the incoming record.
        let existing = conn
          .query_row(
            "SELECT id, name, tournament_id, unique_tournament_id, created_at
             FROM tournaments
             WHERE (?1 IS NOT NULL AND tournament_id = ?1)
                OR (?2 IS NOT NULL AND unique_tournament_id = ?2)",
            rusqlite::params![input.tournament_id, input.unique_tournament_id],
            map_raw_tournament,
          )
          .optional()?;
        if let Some(raw) = existing {
          return Ok(raw);
        }

        conn.execute(
          "INSERT INTO tournaments (name, tournament_id, unique_tournament_id, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![
            input.name,
            input.tournament_id,
            input.unique_tournament_id,
            created_at,
          ],
        )?;
        Ok(conn.query_row(
          "SELECT id, name, tournament_id, unique_tournament_id, created_at
           FROM tournaments WHERE id = ?1",
          rusqlite::params![conn.last_insert_rowid()],
          map_raw_tournament,
        )?)
      })
      .await?;

    raw.into_tournament()
  }

  async fn list_tournaments(&self) -> Result<Vec<Tournament>> {
    let raws: Vec<RawTournament> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, tournament_id, unique_tournament_id, created_at
           FROM tournaments ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], map_raw_tournament)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTournament::into_tournament).collect()
  }

  async fn add_season(&self, input: NewSeason) -> Result<Season> {
    let created_at = encode_dt(Utc::now());
    let raw: RawSeason = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO seasons
             (season_id, name, year, tournament_id, unique_tournament_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            input.season_id,
            input.name,
            input.year,
            input.tournament_id,
            input.unique_tournament_id,
            created_at,
          ],
        )?;
        Ok(conn.query_row(
          "SELECT id, season_id, name, year, tournament_id, unique_tournament_id, created_at
           FROM seasons WHERE season_id = ?1",
          rusqlite::params![input.season_id],
          |row| {
            Ok(RawSeason {
              id:                   row.get(0)?,
              season_id:            row.get(1)?,
              name:                 row.get(2)?,
              year:                 row.get(3)?,
              tournament_id:        row.get(4)?,
              unique_tournament_id: row.get(5)?,
              created_at:           row.get(6)?,
            })
          },
        )?)
      })
      .await?;

    raw.into_season()
  }

  async fn list_seasons(&self, tournament_id: Option<i64>) -> Result<Vec<Season>> {
    let raws: Vec<RawSeason> = self
      .conn
      .call(move |conn| {
        let sql = "SELECT id, season_id, name, year, tournament_id,
                          unique_tournament_id, created_at
                   FROM seasons
                   WHERE ?1 IS NULL OR tournament_id = ?1
                   ORDER BY season_id";
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params![tournament_id], |row| {
            Ok(RawSeason {
              id:                   row.get(0)?,
              season_id:            row.get(1)?,
              name:                 row.get(2)?,
              year:                 row.get(3)?,
              tournament_id:        row.get(4)?,
              unique_tournament_id: row.get(5)?,
              created_at:           row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSeason::into_season).collect()
  }

  async fn upsert_team(&self, input: NewTeam) -> Result<Team> {
    let created_at = encode_dt(Utc::now());
    let raw: RawTeam = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO teams
             (team_id, name, short_name, slug, name_code, primary_color,
              secondary_color, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT (team_id) DO UPDATE SET
             name            = excluded.name,
             short_name      = COALESCE(excluded.short_name, short_name),
             slug            = COALESCE(excluded.slug, slug),
             name_code       = COALESCE(excluded.name_code, name_code),
             primary_color   = COALESCE(excluded.primary_color, primary_color),
             secondary_color = COALESCE(excluded.secondary_color, secondary_color)",
          rusqlite::params![
            input.team_id,
            input.name,
            input.short_name,
            input.slug,
            input.name_code,
            input.primary_color,
            input.secondary_color,
            created_at,
          ],
        )?;
        Ok(conn.query_row(
          "SELECT id, team_id, name, short_name, slug, name_code,
                  primary_color, secondary_color, created_at
           FROM teams WHERE team_id = ?1",
          rusqlite::params![input.team_id],
          |row| {
            Ok(RawTeam {
              id:              row.get(0)?,
              team_id:         row.get(1)?,
              name:            row.get(2)?,
              short_name:      row.get(3)?,
              slug:            row.get(4)?,
              name_code:       row.get(5)?,
              primary_color:   row.get(6)?,
              secondary_color: row.get(7)?,
              created_at:      row.get(8)?,
            })
          },
        )?)
      })
      .await?;

    raw.into_team()
  }

  async fn get_team(&self, team_id: i64) -> Result<Option<Team>> {
    let raw: Option<RawTeam> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, team_id, name, short_name, slug, name_code,
                      primary_color, secondary_color, created_at
               FROM teams WHERE team_id = ?1",
              rusqlite::params![team_id],
              |row| {
                Ok(RawTeam {
                  id:              row.get(0)?,
                  team_id:         row.get(1)?,
                  name:            row.get(2)?,
                  short_name:      row.get(3)?,
                  slug:            row.get(4)?,
                  name_code:       row.get(5)?,
                  primary_color:   row.get(6)?,
                  secondary_color: row.get(7)?,
                  created_at:      row.get(8)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTeam::into_team).transpose()
  }

  async fn list_teams(&self) -> Result<Vec<Team>> {
    let raws: Vec<RawTeam> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, team_id, name, short_name, slug, name_code,
                  primary_color, secondary_color, created_at
           FROM teams ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawTeam {
              id:              row.get(0)?,
              team_id:         row.get(1)?,
              name:            row.get(2)?,
              short_name:      row.get(3)?,
              slug:            row.get(4)?,
              name_code:       row.get(5)?,
              primary_color:   row.get(6)?,
              secondary_color: row.get(7)?,
              created_at:      row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTeam::into_team).collect()
  }

  async fn upsert_player(&self, input: NewPlayer) -> Result<Player> {
    let created_at = encode_dt(Utc::now());
    let completeness = input.completeness() as i64;

    let raw: RawPlayer = self
      .conn
      .call(move |conn| {
        let existing: Option<i64> = conn
          .query_row(
            "SELECT (name IS NOT NULL) + (short_name IS NOT NULL)
                  + (date_of_birth_timestamp IS NOT NULL)
                  + (team_id IS NOT NULL) + (sofascore_id IS NOT NULL)
             FROM players WHERE player_id = ?1",
            rusqlite::params![input.player_id],
            |row| row.get(0),
          )
          .optional()?;

        match existing {
          None => {
            conn.execute(
              "INSERT INTO players
                 (player_id, name, short_name, date_of_birth_timestamp,
                  team_id, sofascore_id, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
              rusqlite::params![
                input.player_id,
                input.name,
                input.short_name,
                input.date_of_birth_timestamp,
                input.team_id,
                input.sofascore_id,
                created_at,
              ],
            )?;
          }
          // The stored record wins unless the new one is strictly more
          // complete, mirroring the feed's dedup rule.
          Some(stored) if completeness > stored => {
            conn.execute(
              "UPDATE players SET
                 name = ?2, short_name = ?3, date_of_birth_timestamp = ?4,
                 team_id = ?5, sofascore_id = ?6
               WHERE player_id = ?1",
              rusqlite::params![
                input.player_id,
                input.name,
                input.short_name,
                input.date_of_birth_timestamp,
                input.team_id,
                input.sofascore_id,
              ],
            )?;
          }
          Some(_) => {}
        }

        Ok(conn.query_row(
          "SELECT id, player_id, name, short_name, date_of_birth_timestamp,
                  team_id, sofascore_id, created_at
           FROM players WHERE player_id = ?1",
          rusqlite::params![input.player_id],
          |row| {
            Ok(RawPlayer {
              id:                      row.get(0)?,
              player_id:               row.get(1)?,
              name:                    row.get(2)?,
              short_name:              row.get(3)?,
              date_of_birth_timestamp: row.get(4)?,
              team_id:                 row.get(5)?,
              sofascore_id:            row.get(6)?,
              created_at:              row.get(7)?,
            })
          },
        )?)
      })
      .await?;

    raw.into_player()
  }

  async fn get_player(&self, player_id: i64) -> Result<Option<Player>> {
    let raw: Option<RawPlayer> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, player_id, name, short_name, date_of_birth_timestamp,
                      team_id, sofascore_id, created_at
               FROM players WHERE player_id = ?1",
              rusqlite::params![player_id],
              |row| {
                Ok(RawPlayer {
                  id:                      row.get(0)?,
                  player_id:               row.get(1)?,
                  name:                    row.get(2)?,
                  short_name:              row.get(3)?,
                  date_of_birth_timestamp: row.get(4)?,
                  team_id:                 row.get(5)?,
                  sofascore_id:            row.get(6)?,
                  created_at:              row.get(7)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPlayer::into_player).transpose()
  }

  async fn upsert_manager(&self, input: NewManager) -> Result<Manager> {
    let created_at = encode_dt(Utc::now());
    let raw: RawManager = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO managers (manager_id, team_id, name, short_name, slug, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (manager_id, team_id) DO UPDATE SET
             name       = COALESCE(excluded.name, name),
             short_name = COALESCE(excluded.short_name, short_name),
             slug       = COALESCE(excluded.slug, slug)",
          rusqlite::params![
            input.manager_id,
            input.team_id,
            input.name,
            input.short_name,
            input.slug,
            created_at,
          ],
        )?;
        Ok(conn.query_row(
          "SELECT id, manager_id, team_id, name, short_name, slug, created_at
           FROM managers WHERE manager_id = ?1 AND team_id = ?2",
          rusqlite::params![input.manager_id, input.team_id],
          |row| {
            Ok(RawManager {
              id:         row.get(0)?,
              manager_id: row.get(1)?,
              team_id:    row.get(2)?,
              name:       row.get(3)?,
              short_name: row.get(4)?,
              slug:       row.get(5)?,
              created_at: row.get(6)?,
            })
          },
        )?)
      })
      .await?;

    raw.into_manager()
  }

  async fn set_fixture_managers(
    &self,
    fixture_id: i64,
    home: Option<i64>,
    away: Option<i64>,
  ) -> Result<()> {
    self.require_fixture(fixture_id).await?;
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE fixtures SET
             home_manager_id = COALESCE(?2, home_manager_id),
             away_manager_id = COALESCE(?3, away_manager_id)
           WHERE fixture_id = ?1",
          rusqlite::params![fixture_id, home, away],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Fixtures ──────────────────────────────────────────────────────────────

  async fn insert_fixtures(&self, fixtures: Vec<NewFixture>) -> Result<usize> {
    let created_at = encode_dt(Utc::now());
    let inserted: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0usize;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO fixtures
               (fixture_id, fixture_custom_id, home_team_id, away_team_id,
                season_id, round, kickoff_date_time, status, home_score,
                away_score, result, injury_time_1, injury_time_2, total_time,
                created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
          )?;
          for f in &fixtures {
            inserted += stmt.execute(rusqlite::params![
              f.fixture_id,
              f.fixture_custom_id,
              f.home_team_id,
              f.away_team_id,
              f.season_id,
              f.round,
              encode_opt_dt(f.kickoff_date_time),
              f.status,
              f.home_score,
              f.away_score,
              f.result.map(|r| r.as_str()),
              f.injury_time_1,
              f.injury_time_2,
              f.total_time,
              created_at,
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;
    Ok(inserted)
  }

  async fn get_fixture(&self, fixture_id: i64) -> Result<Option<Fixture>> {
    let raw: Option<RawFixture> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, fixture_id, fixture_custom_id, home_team_id,
                      away_team_id, season_id, round, kickoff_date_time,
                      status, home_score, away_score, result, injury_time_1,
                      injury_time_2, total_time, home_manager_id,
                      away_manager_id, created_at
               FROM fixtures WHERE fixture_id = ?1",
              rusqlite::params![fixture_id],
              map_raw_fixture,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFixture::into_fixture).transpose()
  }

  async fn list_fixtures(&self, season_id: Option<i64>) -> Result<Vec<Fixture>> {
    let raws: Vec<RawFixture> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, fixture_id, fixture_custom_id, home_team_id,
                  away_team_id, season_id, round, kickoff_date_time, status,
                  home_score, away_score, result, injury_time_1,
                  injury_time_2, total_time, home_manager_id, away_manager_id,
                  created_at
           FROM fixtures
           WHERE ?1 IS NULL OR season_id = ?1
           ORDER BY kickoff_date_time, fixture_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![season_id], map_raw_fixture)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFixture::into_fixture).collect()
  }

  async fn delete_fixture(&self, fixture_id: i64) -> Result<bool> {
    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM fixtures WHERE fixture_id = ?1",
          rusqlite::params![fixture_id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Facts ─────────────────────────────────────────────────────────────────

  async fn record_events(
    &self,
    fixture_id: i64,
    events: MatchEvents,
  ) -> Result<EventCounts> {
    self.require_fixture(fixture_id).await?;

    let counts: EventCounts = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut counts = EventCounts::default();

        // Existing natural keys per family; events from a re-ingested payload
        // must land exactly once.
        let existing_goals: HashSet<(
          Option<i64>,
          Option<i64>,
          Option<i64>,
          Option<i64>,
          Option<String>,
          bool,
        )> = {
          let mut stmt = tx.prepare(
            "SELECT player_id, team_id, goal_minute, added_time, type, is_own_goal
             FROM goals WHERE fixture_id = ?1",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![fixture_id], |row| {
              Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
              ))
            })?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
          rows
        };

        {
          let mut stmt = tx.prepare(
            "INSERT INTO goals
               (fixture_id, team_id, player_id, assist_player_id, goal_minute,
                added_time, match_minute, half, type, is_own_goal, incident_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          )?;
          for g in &events.goals {
            let key = (
              g.player_id,
              g.team_id,
              g.goal_minute,
              g.added_time,
              g.goal_type.clone(),
              g.is_own_goal,
            );
            if existing_goals.contains(&key) {
              continue;
            }
            stmt.execute(rusqlite::params![
              fixture_id,
              g.team_id,
              g.player_id,
              g.assist_player_id,
              g.goal_minute,
              g.added_time,
              g.match_minute,
              encode_opt_half(g.half),
              g.goal_type,
              g.is_own_goal,
              g.incident_id,
            ])?;
            counts.goals += 1;
          }
        }

        let existing_cards: HashSet<(
          Option<i64>,
          Option<i64>,
          Option<i64>,
          Option<i64>,
          bool,
          bool,
          bool,
        )> = {
          let mut stmt = tx.prepare(
            "SELECT player_id, team_id, card_minute, added_time, yellow, yellow_2, red
             FROM cards WHERE fixture_id = ?1",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![fixture_id], |row| {
              Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
              ))
            })?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
          rows
        };

        {
          let mut stmt = tx.prepare(
            "INSERT INTO cards
               (fixture_id, team_id, player_id, card_minute, added_time,
                match_minute, yellow, yellow_2, red, reason, rescinded,
                incident_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          )?;
          for c in &events.cards {
            let key = (
              c.player_id,
              c.team_id,
              c.card_minute,
              c.added_time,
              c.yellow,
              c.yellow_2,
              c.red,
            );
            if existing_cards.contains(&key) {
              continue;
            }
            stmt.execute(rusqlite::params![
              fixture_id,
              c.team_id,
              c.player_id,
              c.card_minute,
              c.added_time,
              c.match_minute,
              c.yellow,
              c.yellow_2,
              c.red,
              c.reason,
              c.rescinded,
              c.incident_id,
            ])?;
            counts.cards += 1;
          }
        }

        let existing_subs: HashSet<(
          Option<i64>,
          Option<i64>,
          Option<i64>,
          Option<i64>,
        )> = {
          let mut stmt = tx.prepare(
            "SELECT player_in_id, player_out_id, minute, added_time
             FROM substitutions WHERE fixture_id = ?1",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![fixture_id], |row| {
              Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
          rows
        };

        {
          let mut stmt = tx.prepare(
            "INSERT INTO substitutions
               (fixture_id, team_id, player_in_id, player_out_id, minute,
                added_time, match_minute, half, injury, incident_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          )?;
          for s in &events.substitutions {
            let key = (s.player_in_id, s.player_out_id, s.minute, s.added_time);
            if existing_subs.contains(&key) {
              continue;
            }
            stmt.execute(rusqlite::params![
              fixture_id,
              s.team_id,
              s.player_in_id,
              s.player_out_id,
              s.minute,
              s.added_time,
              s.match_minute,
              encode_opt_half(s.half),
              s.injury,
              s.incident_id,
            ])?;
            counts.substitutions += 1;
          }
        }

        let existing_incidents: HashSet<(
          String,
          Option<i64>,
          Option<i64>,
          Option<i64>,
        )> = {
          let mut stmt = tx.prepare(
            "SELECT incident_type, incident_id, minute, added_time
             FROM incidents WHERE fixture_id = ?1",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![fixture_id], |row| {
              Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
          rows
        };

        {
          let mut stmt = tx.prepare(
            "INSERT INTO incidents
               (fixture_id, incident_type, incident_id, team_id, player_id,
                minute, added_time, match_minute, half, text, home_score,
                away_score, is_live, time_seconds, period_time_seconds,
                length, confirmed, incident_class, reason, description,
                incident_data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
          )?;
          for i in &events.incidents {
            let key = (
              i.incident_type.as_str().to_owned(),
              i.incident_id,
              i.minute,
              i.added_time,
            );
            if existing_incidents.contains(&key) {
              continue;
            }
            let data = serde_json::to_string(&i.incident_data)
              .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            stmt.execute(rusqlite::params![
              fixture_id,
              i.incident_type.as_str(),
              i.incident_id,
              i.team_id,
              i.player_id,
              i.minute,
              i.added_time,
              i.match_minute,
              encode_opt_half(i.half),
              i.text,
              i.home_score,
              i.away_score,
              i.is_live,
              i.time_seconds,
              i.period_time_seconds,
              i.length,
              i.confirmed,
              i.incident_class,
              i.reason,
              i.description,
              data,
            ])?;
            counts.incidents += 1;
          }
        }

        tx.commit()?;
        Ok(counts)
      })
      .await?;

    Ok(counts)
  }

  async fn record_shots(&self, fixture_id: i64, shots: Vec<NewShot>) -> Result<usize> {
    self.require_fixture(fixture_id).await?;

    // Serialize coordinate blobs before moving into the blocking closure.
    let mut encoded = Vec::with_capacity(shots.len());
    for s in shots {
      let player_coordinates = encode_opt_json(s.player_coordinates.as_ref())?;
      let goal_mouth_coordinates =
        encode_opt_json(s.goal_mouth_coordinates.as_ref())?;
      let draw_coordinates = encode_opt_json(s.draw_coordinates.as_ref())?;
      encoded.push((s, player_coordinates, goal_mouth_coordinates, draw_coordinates));
    }

    let inserted: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0usize;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO shots
               (fixture_id, shot_id, team_id, player_id, shot_type, goal_type,
                situation, body_part, goal_mouth_location, player_coordinates,
                goal_mouth_coordinates, draw_coordinates, xg, xgot, minute,
                added_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16)",
          )?;
          for (s, player_c, mouth_c, draw_c) in &encoded {
            inserted += stmt.execute(rusqlite::params![
              fixture_id,
              s.shot_id,
              s.team_id,
              s.player_id,
              s.shot_type,
              s.goal_type,
              s.situation,
              s.body_part,
              s.goal_mouth_location,
              player_c,
              mouth_c,
              draw_c,
              s.xg,
              s.xgot,
              s.minute,
              s.added_time,
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;
    Ok(inserted)
  }

  async fn record_match_statistics(
    &self,
    rows: Vec<NewMatchStatistic>,
  ) -> Result<usize> {
    let inserted: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0usize;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO match_statistics
               (fixture_id, period, group_name, key, name, value_type,
                home_value, away_value, home_raw, away_raw)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          )?;
          for r in &rows {
            inserted += stmt.execute(rusqlite::params![
              r.fixture_id,
              r.period,
              r.group_name,
              r.key,
              r.name,
              r.value_type,
              r.home_value,
              r.away_value,
              r.home_raw,
              r.away_raw,
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;
    Ok(inserted)
  }

  async fn record_player_statistics(
    &self,
    rows: Vec<NewPlayerStatistic>,
  ) -> Result<usize> {
    let mut encoded = Vec::with_capacity(rows.len());
    for r in rows {
      let stats_json = serde_json::to_string(&r.stats_json)?;
      encoded.push((r, stats_json));
    }

    let inserted: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0usize;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO player_statistics
               (fixture_id, player_id, team_id, side, position, jersey_number,
                started, substitute, stats_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          )?;
          for (r, stats_json) in &encoded {
            inserted += stmt.execute(rusqlite::params![
              r.fixture_id,
              r.player_id,
              r.team_id,
              r.side.map(|s| s.as_str()),
              r.position,
              r.jersey_number,
              r.started,
              r.substitute,
              stats_json,
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;
    Ok(inserted)
  }

  async fn record_appearances(
    &self,
    fixture_id: i64,
    rows: Vec<NewAppearance>,
  ) -> Result<usize> {
    self.require_fixture(fixture_id).await?;

    let inserted: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0usize;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO players_fixtures
               (player_id, fixture_id, team_id, started, substitute,
                subbed_in, subbed_out, minutes_played)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          )?;
          for r in &rows {
            inserted += stmt.execute(rusqlite::params![
              r.player_id,
              fixture_id,
              r.team_id,
              r.started,
              r.substitute,
              r.subbed_in,
              r.subbed_out,
              r.minutes_played,
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;
    Ok(inserted)
  }

  async fn replace_game_states(
    &self,
    fixture_id: i64,
    segments: Vec<GameStateSegment>,
  ) -> Result<()> {
    self.require_fixture(fixture_id).await?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM game_states WHERE fixture_id = ?1",
          rusqlite::params![fixture_id],
        )?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO game_states
               (fixture_id, half, start_minute, end_minute, home_state, away_state)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for seg in &segments {
            stmt.execute(rusqlite::params![
              fixture_id,
              seg.half.as_str(),
              seg.start_minute,
              seg.end_minute,
              seg.home_state.as_str(),
              seg.away_state.as_str(),
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn materialize(&self, fixture_id: i64) -> Result<Option<MatchSummary>> {
    let fixture = match self.get_fixture(fixture_id).await? {
      Some(f) => f,
      None => return Ok(None),
    };

    Ok(Some(MatchSummary {
      fixture,
      goals: self.goals_for_fixture(fixture_id).await?,
      cards: self.cards_for_fixture(fixture_id).await?,
      shots: self.shots_for_fixture(fixture_id).await?,
      substitutions: self.substitutions_for_fixture(fixture_id).await?,
      incidents: self.incidents_for_fixture(fixture_id).await?,
      match_statistics: self.match_statistics_for_fixture(fixture_id).await?,
      player_statistics: self.player_statistics_for_fixture(fixture_id).await?,
      appearances: self.appearances_for_fixture(fixture_id).await?,
      game_states: self.game_states_for_fixture(fixture_id).await?,
    }))
  }
}

#[cfg(test)]
impl SqliteStore {
  /// Escape hatch for tests that need to poke the schema directly, e.g.
  /// deleting a dimension row to observe referential actions.
  pub(crate) async fn execute_raw(&self, sql: String) -> Result<usize> {
    let n = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, [])?))
      .await?;
    Ok(n)
  }
}

fn map_raw_tournament(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTournament> {
  Ok(RawTournament {
    id:                   row.get(0)?,
    name:                 row.get(1)?,
    tournament_id:        row.get(2)?,
    unique_tournament_id: row.get(3)?,
    created_at:           row.get(4)?,
  })
}

/// Shared row mapper for the full `fixtures` column list.
fn map_raw_fixture(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFixture> {
  Ok(RawFixture {
    id:                row.get(0)?,
    fixture_id:        row.get(1)?,
    fixture_custom_id: row.get(2)?,
    home_team_id:      row.get(3)?,
    away_team_id:      row.get(4)?,
    season_id:         row.get(5)?,
    round:             row.get(6)?,
    kickoff_date_time: row.get(7)?,
    status:            row.get(8)?,
    home_score:        row.get(9)?,
    away_score:        row.get(10)?,
    result:            row.get(11)?,
    injury_time_1:     row.get(12)?,
    injury_time_2:     row.get(13)?,
    total_time:        row.get(14)?,
    home_manager_id:   row.get(15)?,
    away_manager_id:   row.get(16)?,
    created_at:        row.get(17)?,
  })
}

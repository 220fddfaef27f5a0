//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. JSON-typed columns
//! (coordinates, per-player stat maps, raw incident payloads) are stored as
//! compact JSON text. Enumerated markers (result, half, side, game state,
//! incident type) are stored as the feed's own short codes.

use chrono::{DateTime, Utc};
use pitchside_core::{
  dimension::{Manager, Player, Season, Team, Tournament},
  event::{Goal, Half, Incident, IncidentType, Shot, Substitution},
  fixture::{Fixture, FixtureResult},
  state::{GameState, GameStateSegment},
  stats::{PlayerStatistic, Side},
};
use serde_json::Value;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_opt_dt(dt: Option<DateTime<Utc>>) -> Option<String> {
  dt.map(encode_dt)
}

pub fn decode_opt_dt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_json(v: &Value) -> Result<String> {
  Ok(serde_json::to_string(v)?)
}

pub fn decode_json(s: &str) -> Result<Value> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_opt_json(v: Option<&Value>) -> Result<Option<String>> {
  v.map(encode_json).transpose()
}

pub fn decode_opt_json(s: Option<&str>) -> Result<Option<Value>> {
  s.map(decode_json).transpose()
}

// ─── Enumerated markers ──────────────────────────────────────────────────────

pub fn encode_opt_half(h: Option<Half>) -> Option<&'static str> {
  h.map(Half::as_str)
}

pub fn decode_opt_half(s: Option<&str>) -> Result<Option<Half>> {
  Ok(s.map(Half::parse).transpose()?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `tournaments` row.
pub struct RawTournament {
  pub id:                   i64,
  pub name:                 String,
  pub tournament_id:        Option<i64>,
  pub unique_tournament_id: Option<i64>,
  pub created_at:           String,
}

impl RawTournament {
  pub fn into_tournament(self) -> Result<Tournament> {
    Ok(Tournament {
      id:                   self.id,
      name:                 self.name,
      tournament_id:        self.tournament_id,
      unique_tournament_id: self.unique_tournament_id,
      created_at:           decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawSeason {
  pub id:                   i64,
  pub season_id:            i64,
  pub name:                 Option<String>,
  pub year:                 Option<String>,
  pub tournament_id:        Option<i64>,
  pub unique_tournament_id: Option<i64>,
  pub created_at:           String,
}

impl RawSeason {
  pub fn into_season(self) -> Result<Season> {
    Ok(Season {
      id:                   self.id,
      season_id:            self.season_id,
      name:                 self.name,
      year:                 self.year,
      tournament_id:        self.tournament_id,
      unique_tournament_id: self.unique_tournament_id,
      created_at:           decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawTeam {
  pub id:              i64,
  pub team_id:         i64,
  pub name:            String,
  pub short_name:      Option<String>,
  pub slug:            Option<String>,
  pub name_code:       Option<String>,
  pub primary_color:   Option<String>,
  pub secondary_color: Option<String>,
  pub created_at:      String,
}

impl RawTeam {
  pub fn into_team(self) -> Result<Team> {
    Ok(Team {
      id:              self.id,
      team_id:         self.team_id,
      name:            self.name,
      short_name:      self.short_name,
      slug:            self.slug,
      name_code:       self.name_code,
      primary_color:   self.primary_color,
      secondary_color: self.secondary_color,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawManager {
  pub id:         i64,
  pub manager_id: i64,
  pub team_id:    i64,
  pub name:       Option<String>,
  pub short_name: Option<String>,
  pub slug:       Option<String>,
  pub created_at: String,
}

impl RawManager {
  pub fn into_manager(self) -> Result<Manager> {
    Ok(Manager {
      id:         self.id,
      manager_id: self.manager_id,
      team_id:    self.team_id,
      name:       self.name,
      short_name: self.short_name,
      slug:       self.slug,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawPlayer {
  pub id:                      i64,
  pub player_id:               i64,
  pub name:                    Option<String>,
  pub short_name:              Option<String>,
  pub date_of_birth_timestamp: Option<i64>,
  pub team_id:                 Option<i64>,
  pub sofascore_id:            Option<String>,
  pub created_at:              String,
}

impl RawPlayer {
  pub fn into_player(self) -> Result<Player> {
    Ok(Player {
      id:                      self.id,
      player_id:               self.player_id,
      name:                    self.name,
      short_name:              self.short_name,
      date_of_birth_timestamp: self.date_of_birth_timestamp,
      team_id:                 self.team_id,
      sofascore_id:            self.sofascore_id,
      created_at:              decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `fixtures` row.
pub struct RawFixture {
  pub id:                i64,
  pub fixture_id:        i64,
  pub fixture_custom_id: Option<String>,
  pub home_team_id:      Option<i64>,
  pub away_team_id:      Option<i64>,
  pub season_id:         Option<i64>,
  pub round:             Option<i64>,
  pub kickoff_date_time: Option<String>,
  pub status:            Option<String>,
  pub home_score:        Option<i64>,
  pub away_score:        Option<i64>,
  pub result:            Option<String>,
  pub injury_time_1:     i64,
  pub injury_time_2:     i64,
  pub total_time:        i64,
  pub home_manager_id:   Option<i64>,
  pub away_manager_id:   Option<i64>,
  pub created_at:        String,
}

impl RawFixture {
  pub fn into_fixture(self) -> Result<Fixture> {
    let result =
      self.result.as_deref().map(FixtureResult::parse).transpose()?;

    Ok(Fixture {
      id:                self.id,
      fixture_id:        self.fixture_id,
      fixture_custom_id: self.fixture_custom_id,
      home_team_id:      self.home_team_id,
      away_team_id:      self.away_team_id,
      season_id:         self.season_id,
      round:             self.round,
      kickoff_date_time: decode_opt_dt(self.kickoff_date_time.as_deref())?,
      status:            self.status,
      home_score:        self.home_score,
      away_score:        self.away_score,
      result,
      injury_time_1:     self.injury_time_1,
      injury_time_2:     self.injury_time_2,
      total_time:        self.total_time,
      home_manager_id:   self.home_manager_id,
      away_manager_id:   self.away_manager_id,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawGoal {
  pub id:               i64,
  pub fixture_id:       i64,
  pub team_id:          Option<i64>,
  pub player_id:        Option<i64>,
  pub assist_player_id: Option<i64>,
  pub goal_minute:      Option<i64>,
  pub added_time:       Option<i64>,
  pub match_minute:     Option<i64>,
  pub half:             Option<String>,
  pub goal_type:        Option<String>,
  pub is_own_goal:      bool,
  pub incident_id:      Option<i64>,
}

impl RawGoal {
  pub fn into_goal(self) -> Result<Goal> {
    Ok(Goal {
      id:               self.id,
      fixture_id:       self.fixture_id,
      team_id:          self.team_id,
      player_id:        self.player_id,
      assist_player_id: self.assist_player_id,
      goal_minute:      self.goal_minute,
      added_time:       self.added_time,
      match_minute:     self.match_minute,
      half:             decode_opt_half(self.half.as_deref())?,
      goal_type:        self.goal_type,
      is_own_goal:      self.is_own_goal,
      incident_id:      self.incident_id,
    })
  }
}

pub struct RawSubstitution {
  pub id:            i64,
  pub fixture_id:    i64,
  pub team_id:       Option<i64>,
  pub player_in_id:  Option<i64>,
  pub player_out_id: Option<i64>,
  pub minute:        Option<i64>,
  pub added_time:    Option<i64>,
  pub match_minute:  Option<i64>,
  pub half:          Option<String>,
  pub injury:        bool,
  pub incident_id:   Option<i64>,
}

impl RawSubstitution {
  pub fn into_substitution(self) -> Result<Substitution> {
    Ok(Substitution {
      id:            self.id,
      fixture_id:    self.fixture_id,
      team_id:       self.team_id,
      player_in_id:  self.player_in_id,
      player_out_id: self.player_out_id,
      minute:        self.minute,
      added_time:    self.added_time,
      match_minute:  self.match_minute,
      half:          decode_opt_half(self.half.as_deref())?,
      injury:        self.injury,
      incident_id:   self.incident_id,
    })
  }
}

pub struct RawShot {
  pub id:                     i64,
  pub fixture_id:             i64,
  pub shot_id:                i64,
  pub team_id:                Option<i64>,
  pub player_id:              Option<i64>,
  pub shot_type:              Option<String>,
  pub goal_type:              Option<String>,
  pub situation:              Option<String>,
  pub body_part:              Option<String>,
  pub goal_mouth_location:    Option<String>,
  pub player_coordinates:     Option<String>,
  pub goal_mouth_coordinates: Option<String>,
  pub draw_coordinates:       Option<String>,
  pub xg:                     Option<f64>,
  pub xgot:                   Option<f64>,
  pub minute:                 Option<i64>,
  pub added_time:             Option<i64>,
}

impl RawShot {
  pub fn into_shot(self) -> Result<Shot> {
    Ok(Shot {
      id:                     self.id,
      fixture_id:             self.fixture_id,
      shot_id:                self.shot_id,
      team_id:                self.team_id,
      player_id:              self.player_id,
      shot_type:              self.shot_type,
      goal_type:              self.goal_type,
      situation:              self.situation,
      body_part:              self.body_part,
      goal_mouth_location:    self.goal_mouth_location,
      player_coordinates:     decode_opt_json(self.player_coordinates.as_deref())?,
      goal_mouth_coordinates: decode_opt_json(self.goal_mouth_coordinates.as_deref())?,
      draw_coordinates:       decode_opt_json(self.draw_coordinates.as_deref())?,
      xg:                     self.xg,
      xgot:                   self.xgot,
      minute:                 self.minute,
      added_time:             self.added_time,
    })
  }
}

pub struct RawIncident {
  pub id:                  i64,
  pub fixture_id:          i64,
  pub incident_type:       String,
  pub incident_id:         Option<i64>,
  pub team_id:             Option<i64>,
  pub player_id:           Option<i64>,
  pub minute:              Option<i64>,
  pub added_time:          Option<i64>,
  pub match_minute:        Option<i64>,
  pub half:                Option<String>,
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
  pub incident_data:       String,
}

impl RawIncident {
  pub fn into_incident(self) -> Result<Incident> {
    Ok(Incident {
      id:                  self.id,
      fixture_id:          self.fixture_id,
      incident_type:       IncidentType::parse(&self.incident_type)?,
      incident_id:         self.incident_id,
      team_id:             self.team_id,
      player_id:           self.player_id,
      minute:              self.minute,
      added_time:          self.added_time,
      match_minute:        self.match_minute,
      half:                decode_opt_half(self.half.as_deref())?,
      text:                self.text,
      home_score:          self.home_score,
      away_score:          self.away_score,
      is_live:             self.is_live,
      time_seconds:        self.time_seconds,
      period_time_seconds: self.period_time_seconds,
      length:              self.length,
      confirmed:           self.confirmed,
      incident_class:      self.incident_class,
      reason:              self.reason,
      description:         self.description,
      incident_data:       decode_json(&self.incident_data)?,
    })
  }
}

pub struct RawPlayerStatistic {
  pub id:            i64,
  pub fixture_id:    i64,
  pub player_id:     i64,
  pub team_id:       Option<i64>,
  pub side:          Option<String>,
  pub position:      Option<String>,
  pub jersey_number: Option<String>,
  pub started:       bool,
  pub substitute:    bool,
  pub stats_json:    String,
}

impl RawPlayerStatistic {
  pub fn into_player_statistic(self) -> Result<PlayerStatistic> {
    Ok(PlayerStatistic {
      id:            self.id,
      fixture_id:    self.fixture_id,
      player_id:     self.player_id,
      team_id:       self.team_id,
      side:          self.side.as_deref().map(Side::parse).transpose()?,
      position:      self.position,
      jersey_number: self.jersey_number,
      started:       self.started,
      substitute:    self.substitute,
      stats_json:    decode_json(&self.stats_json)?,
    })
  }
}

pub struct RawGameState {
  pub half:         Option<String>,
  pub start_minute: i64,
  pub end_minute:   i64,
  pub home_state:   String,
  pub away_state:   String,
}

impl RawGameState {
  pub fn into_segment(self) -> Result<GameStateSegment> {
    let half = decode_opt_half(self.half.as_deref())?.unwrap_or(Half::First);
    Ok(GameStateSegment {
      half,
      start_minute: self.start_minute,
      end_minute:   self.end_minute,
      home_state:   GameState::parse(&self.home_state)?,
      away_state:   GameState::parse(&self.away_state)?,
    })
  }
}

//! Integration tests for `SqliteStore` against an in-memory database.

use pitchside_core::{
  dimension::{NewManager, NewPlayer, NewSeason, NewTeam, NewTournament},
  event::{
    Half, IncidentType, MatchEvents, NewCard, NewGoal, NewIncident, NewShot,
    NewSubstitution,
  },
  fixture::{FixtureResult, NewFixture},
  state::{compute_game_states, GameState, ScoringEvent},
  stats::{NewAppearance, NewMatchStatistic, NewPlayerStatistic, Side},
  store::MatchStore,
};
use serde_json::json;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn team(team_id: i64, name: &str) -> NewTeam {
  NewTeam {
    team_id,
    name: name.into(),
    short_name: None,
    slug: None,
    name_code: None,
    primary_color: None,
    secondary_color: None,
  }
}

fn player(player_id: i64, name: &str, team_id: i64) -> NewPlayer {
  NewPlayer {
    player_id,
    name: Some(name.into()),
    short_name: None,
    date_of_birth_timestamp: None,
    team_id: Some(team_id),
    sofascore_id: None,
  }
}

fn fixture(fixture_id: i64, home: i64, away: i64, season_id: i64) -> NewFixture {
  NewFixture {
    fixture_id,
    fixture_custom_id: None,
    home_team_id: Some(home),
    away_team_id: Some(away),
    season_id: Some(season_id),
    round: Some(1),
    kickoff_date_time: None,
    status: Some("finished".into()),
    home_score: Some(2),
    away_score: Some(1),
    result: Some(FixtureResult::HomeWin),
    injury_time_1: 2,
    injury_time_2: 4,
    total_time: 96,
  }
}

fn goal(team_id: i64, player_id: i64, minute: i64) -> NewGoal {
  NewGoal {
    team_id: Some(team_id),
    player_id: Some(player_id),
    assist_player_id: None,
    goal_minute: Some(minute),
    added_time: None,
    match_minute: Some(minute),
    half: Half::from_minute(minute),
    goal_type: Some("regular".into()),
    is_own_goal: false,
    incident_id: None,
  }
}

fn card(team_id: i64, player_id: i64, minute: i64) -> NewCard {
  NewCard {
    team_id: Some(team_id),
    player_id: Some(player_id),
    card_minute: Some(minute),
    added_time: None,
    match_minute: Some(minute),
    yellow: true,
    yellow_2: false,
    red: false,
    reason: Some("foul".into()),
    rescinded: false,
    incident_id: None,
  }
}

fn substitution(team_id: i64, p_in: i64, p_out: i64, minute: i64) -> NewSubstitution {
  NewSubstitution {
    team_id: Some(team_id),
    player_in_id: Some(p_in),
    player_out_id: Some(p_out),
    minute: Some(minute),
    added_time: None,
    match_minute: Some(minute),
    half: Half::from_minute(minute),
    injury: false,
    incident_id: None,
  }
}

fn halftime_incident() -> NewIncident {
  NewIncident {
    incident_type: IncidentType::Period,
    incident_id: None,
    team_id: None,
    player_id: None,
    minute: Some(45),
    added_time: None,
    match_minute: Some(45),
    half: Some(Half::First),
    text: Some("HT".into()),
    home_score: Some(1),
    away_score: Some(0),
    is_live: false,
    time_seconds: Some(2700),
    period_time_seconds: Some(2700),
    length: None,
    confirmed: false,
    incident_class: None,
    reason: None,
    description: None,
    incident_data: json!({ "incidentType": "period", "text": "HT" }),
  }
}

fn var_incident(team_id: i64, player_id: i64, minute: i64) -> NewIncident {
  NewIncident {
    incident_type: IncidentType::VarDecision,
    incident_id: Some(77),
    team_id: Some(team_id),
    player_id: Some(player_id),
    minute: Some(minute),
    added_time: None,
    match_minute: Some(minute),
    half: Half::from_minute(minute),
    text: None,
    home_score: None,
    away_score: None,
    is_live: false,
    time_seconds: None,
    period_time_seconds: None,
    length: None,
    confirmed: true,
    incident_class: Some("goalAwarded".into()),
    reason: None,
    description: None,
    incident_data: json!({ "incidentType": "varDecision" }),
  }
}

fn shot(shot_id: i64, team_id: i64, player_id: i64, minute: i64) -> NewShot {
  NewShot {
    shot_id,
    team_id: Some(team_id),
    player_id: Some(player_id),
    shot_type: Some("goal".into()),
    goal_type: Some("regular".into()),
    situation: Some("assisted".into()),
    body_part: Some("right-foot".into()),
    goal_mouth_location: Some("low-centre".into()),
    player_coordinates: Some(json!({ "x": 91.2, "y": 45.1 })),
    goal_mouth_coordinates: Some(json!({ "x": 100.0, "y": 50.0, "z": 2.0 })),
    draw_coordinates: None,
    xg: Some(0.34),
    xgot: Some(0.52),
    minute: Some(minute),
    added_time: None,
  }
}

fn match_stat(fixture_id: i64, period: &str, key: &str) -> NewMatchStatistic {
  NewMatchStatistic {
    fixture_id,
    period: period.into(),
    group_name: Some("Possession".into()),
    key: key.into(),
    name: Some("Ball possession".into()),
    value_type: Some("percentage".into()),
    home_value: Some(57.0),
    away_value: Some(43.0),
    home_raw: Some("57%".into()),
    away_raw: Some("43%".into()),
  }
}

fn player_stat(fixture_id: i64, player_id: i64, team_id: i64) -> NewPlayerStatistic {
  NewPlayerStatistic {
    fixture_id,
    player_id,
    team_id: Some(team_id),
    side: Some(Side::Home),
    position: Some("F".into()),
    jersey_number: Some("9".into()),
    started: true,
    substitute: false,
    stats_json: json!({ "minutesPlayed": 90, "goals": 1, "rating": 7.8 }),
  }
}

fn appearance(player_id: i64, team_id: i64) -> NewAppearance {
  NewAppearance {
    player_id,
    team_id: Some(team_id),
    started: true,
    substitute: false,
    subbed_in: false,
    subbed_out: false,
    minutes_played: Some(90),
  }
}

/// Two teams, three players, one season and one played fixture (id 9001).
async fn seeded() -> SqliteStore {
  let s = store().await;

  let t = s
    .add_tournament(NewTournament {
      name: "Premier League".into(),
      tournament_id: Some(1),
      unique_tournament_id: Some(17),
    })
    .await
    .unwrap();
  s.add_season(NewSeason {
    season_id: 555,
    name: Some("Premier League 24/25".into()),
    year: Some("24/25".into()),
    tournament_id: t.tournament_id,
    unique_tournament_id: t.unique_tournament_id,
  })
  .await
  .unwrap();

  s.upsert_team(team(10, "Arsenal")).await.unwrap();
  s.upsert_team(team(20, "Chelsea")).await.unwrap();
  s.upsert_player(player(100, "Saka", 10)).await.unwrap();
  s.upsert_player(player(101, "Rice", 10)).await.unwrap();
  s.upsert_player(player(200, "Palmer", 20)).await.unwrap();

  let n = s.insert_fixtures(vec![fixture(9001, 10, 20, 555)]).await.unwrap();
  assert_eq!(n, 1);
  s
}

// ─── Dimensions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_tournament_is_idempotent_on_external_ids() {
  let s = store().await;
  let first = s
    .add_tournament(NewTournament {
      name: "Premier League".into(),
      tournament_id: Some(1),
      unique_tournament_id: Some(17),
    })
    .await
    .unwrap();

  // Same unique-tournament id, different name: the stored row wins.
  let second = s
    .add_tournament(NewTournament {
      name: "EPL".into(),
      tournament_id: None,
      unique_tournament_id: Some(17),
    })
    .await
    .unwrap();

  assert_eq!(second.id, first.id);
  assert_eq!(second.name, "Premier League");
  assert_eq!(s.list_tournaments().await.unwrap().len(), 1);
}

#[tokio::test]
async fn add_season_keeps_existing_row() {
  let s = store().await;
  let first = s
    .add_season(NewSeason {
      season_id: 555,
      name: Some("24/25".into()),
      year: Some("24/25".into()),
      tournament_id: None,
      unique_tournament_id: None,
    })
    .await
    .unwrap();
  let second = s
    .add_season(NewSeason {
      season_id: 555,
      name: Some("renamed".into()),
      year: None,
      tournament_id: None,
      unique_tournament_id: None,
    })
    .await
    .unwrap();

  assert_eq!(second.id, first.id);
  assert_eq!(second.name.as_deref(), Some("24/25"));
}

#[tokio::test]
async fn list_seasons_filters_by_tournament() {
  let s = store().await;
  for (name, tournament_id) in [("Premier League", 1), ("La Liga", 2)] {
    s.add_tournament(NewTournament {
      name: name.into(),
      tournament_id: Some(tournament_id),
      unique_tournament_id: None,
    })
    .await
    .unwrap();
  }
  for (season_id, tournament_id) in [(1, Some(1)), (2, Some(1)), (3, Some(2))] {
    s.add_season(NewSeason {
      season_id,
      name: None,
      year: None,
      tournament_id,
      unique_tournament_id: None,
    })
    .await
    .unwrap();
  }

  assert_eq!(s.list_seasons(None).await.unwrap().len(), 3);
  assert_eq!(s.list_seasons(Some(1)).await.unwrap().len(), 2);
  assert_eq!(s.list_seasons(Some(9)).await.unwrap().len(), 0);
}

#[tokio::test]
async fn upsert_team_refreshes_fields() {
  let s = store().await;
  s.upsert_team(team(10, "Arsenal")).await.unwrap();

  let updated = s
    .upsert_team(NewTeam {
      short_name: Some("ARS".into()),
      ..team(10, "Arsenal FC")
    })
    .await
    .unwrap();

  assert_eq!(updated.name, "Arsenal FC");
  assert_eq!(updated.short_name.as_deref(), Some("ARS"));
  assert_eq!(s.list_teams().await.unwrap().len(), 1);
}

#[tokio::test]
async fn upsert_player_prefers_more_complete_record() {
  let s = store().await;
  s.upsert_team(team(10, "Arsenal")).await.unwrap();

  s.upsert_player(player(100, "Saka", 10)).await.unwrap();

  // Sparser record must not clobber the stored one.
  let sparse = s
    .upsert_player(NewPlayer {
      player_id: 100,
      name: Some("B. Saka".into()),
      short_name: None,
      date_of_birth_timestamp: None,
      team_id: None,
      sofascore_id: None,
    })
    .await
    .unwrap();
  assert_eq!(sparse.name.as_deref(), Some("Saka"));
  assert_eq!(sparse.team_id, Some(10));

  // Strictly more complete record replaces it.
  let full = s
    .upsert_player(NewPlayer {
      short_name: Some("B. Saka".into()),
      date_of_birth_timestamp: Some(999_999_999),
      ..player(100, "Bukayo Saka", 10)
    })
    .await
    .unwrap();
  assert_eq!(full.name.as_deref(), Some("Bukayo Saka"));
  assert_eq!(full.short_name.as_deref(), Some("B. Saka"));

  assert!(s.get_player(100).await.unwrap().is_some());
  assert!(s.get_player(404).await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_manager_scoped_per_team() {
  let s = store().await;
  s.upsert_team(team(10, "Arsenal")).await.unwrap();
  s.upsert_team(team(20, "Chelsea")).await.unwrap();

  let m1 = s
    .upsert_manager(NewManager {
      manager_id: 7,
      team_id:    10,
      name:       Some("Arteta".into()),
      short_name: None,
      slug:       None,
    })
    .await
    .unwrap();
  let m1_again = s
    .upsert_manager(NewManager {
      manager_id: 7,
      team_id:    10,
      name:       None,
      short_name: Some("M. Arteta".into()),
      slug:       None,
    })
    .await
    .unwrap();
  // Same external manager at a different club is a distinct row.
  let m2 = s
    .upsert_manager(NewManager {
      manager_id: 7,
      team_id:    20,
      name:       Some("Arteta".into()),
      short_name: None,
      slug:       None,
    })
    .await
    .unwrap();

  assert_eq!(m1_again.id, m1.id);
  assert_eq!(m1_again.name.as_deref(), Some("Arteta"));
  assert_eq!(m1_again.short_name.as_deref(), Some("M. Arteta"));
  assert_ne!(m2.id, m1.id);
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_fixtures_skips_already_seen_ids() {
  let s = seeded().await;

  // 9001 already exists; only 9002 lands.
  let n = s
    .insert_fixtures(vec![fixture(9001, 10, 20, 555), fixture(9002, 20, 10, 555)])
    .await
    .unwrap();
  assert_eq!(n, 1);
  assert_eq!(s.list_fixtures(Some(555)).await.unwrap().len(), 2);
  assert_eq!(s.list_fixtures(Some(556)).await.unwrap().len(), 0);
}

#[tokio::test]
async fn get_fixture_round_trips_fields() {
  let s = seeded().await;
  let f = s.get_fixture(9001).await.unwrap().unwrap();

  assert_eq!(f.fixture_id, 9001);
  assert_eq!(f.home_team_id, Some(10));
  assert_eq!(f.away_team_id, Some(20));
  assert_eq!(f.result, Some(FixtureResult::HomeWin));
  assert_eq!(f.injury_time_1, 2);
  assert_eq!(f.total_time, 96);
  assert!(f.home_manager_id.is_none());

  assert!(s.get_fixture(404).await.unwrap().is_none());
}

#[tokio::test]
async fn insert_fixture_with_unknown_team_is_rejected() {
  let s = seeded().await;
  let result = s.insert_fixtures(vec![fixture(9002, 999, 20, 555)]).await;
  assert!(result.is_err());
}

#[tokio::test]
async fn insert_fixture_with_unknown_season_is_rejected() {
  let s = store().await;
  s.upsert_team(team(10, "Arsenal")).await.unwrap();
  s.upsert_team(team(20, "Chelsea")).await.unwrap();

  // The season reference must exist; no seasons row 555 has been added.
  let result = s.insert_fixtures(vec![fixture(9001, 10, 20, 555)]).await;
  assert!(result.is_err());

  // NULL is the other legal state for the reference.
  let mut unkeyed = fixture(9001, 10, 20, 555);
  unkeyed.season_id = None;
  let n = s.insert_fixtures(vec![unkeyed]).await.unwrap();
  assert_eq!(n, 1);
}

#[tokio::test]
async fn set_fixture_managers_links_and_preserves() {
  let s = seeded().await;
  let home = s
    .upsert_manager(NewManager {
      manager_id: 7,
      team_id:    10,
      name:       Some("Arteta".into()),
      short_name: None,
      slug:       None,
    })
    .await
    .unwrap();
  let away = s
    .upsert_manager(NewManager {
      manager_id: 8,
      team_id:    20,
      name:       Some("Maresca".into()),
      short_name: None,
      slug:       None,
    })
    .await
    .unwrap();

  s.set_fixture_managers(9001, Some(home.id), Some(away.id)).await.unwrap();
  let f = s.get_fixture(9001).await.unwrap().unwrap();
  assert_eq!(f.home_manager_id, Some(home.id));
  assert_eq!(f.away_manager_id, Some(away.id));

  // None leaves the column untouched.
  s.set_fixture_managers(9001, None, None).await.unwrap();
  let f = s.get_fixture(9001).await.unwrap().unwrap();
  assert_eq!(f.home_manager_id, Some(home.id));

  // Removing the manager row nulls the link, not the fixture.
  s.execute_raw(format!("DELETE FROM managers WHERE id = {}", home.id))
    .await
    .unwrap();
  let f = s.get_fixture(9001).await.unwrap().unwrap();
  assert_eq!(f.home_manager_id, None);
  assert_eq!(f.away_manager_id, Some(away.id));
}

#[tokio::test]
async fn set_fixture_managers_missing_fixture_errors() {
  let s = seeded().await;
  assert!(s.set_fixture_managers(404, None, None).await.is_err());
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_events_counts_and_reads_back() {
  let s = seeded().await;

  let events = MatchEvents {
    goals:         vec![goal(10, 100, 23), goal(20, 200, 57)],
    cards:         vec![card(20, 200, 40)],
    substitutions: vec![substitution(10, 101, 100, 70)],
    incidents:     vec![halftime_incident()],
  };
  let counts = s.record_events(9001, events).await.unwrap();
  assert_eq!(counts.goals, 2);
  assert_eq!(counts.cards, 1);
  assert_eq!(counts.substitutions, 1);
  assert_eq!(counts.incidents, 1);
  assert_eq!(counts.total(), 5);

  let goals = s.goals_for_fixture(9001).await.unwrap();
  assert_eq!(goals.len(), 2);
  assert_eq!(goals[0].match_minute, Some(23));
  assert_eq!(goals[0].half, Some(Half::First));
  assert_eq!(goals[1].half, Some(Half::Second));

  let cards = s.cards_for_fixture(9001).await.unwrap();
  assert!(cards[0].yellow);
  assert!(!cards[0].red);

  let subs = s.substitutions_for_fixture(9001).await.unwrap();
  assert_eq!(subs[0].player_in_id, Some(101));

  let incidents = s.incidents_for_fixture(9001).await.unwrap();
  assert_eq!(incidents[0].incident_type, IncidentType::Period);
  assert_eq!(incidents[0].text.as_deref(), Some("HT"));
  assert_eq!(incidents[0].incident_data["text"], json!("HT"));
}

#[tokio::test]
async fn record_events_is_idempotent() {
  let s = seeded().await;

  let events = MatchEvents {
    goals:         vec![goal(10, 100, 23)],
    cards:         vec![card(20, 200, 40)],
    substitutions: vec![substitution(10, 101, 100, 70)],
    incidents:     vec![halftime_incident()],
  };
  s.record_events(9001, events.clone()).await.unwrap();

  let second = s.record_events(9001, events).await.unwrap();
  assert_eq!(second.total(), 0);
  assert_eq!(s.goals_for_fixture(9001).await.unwrap().len(), 1);
  assert_eq!(s.cards_for_fixture(9001).await.unwrap().len(), 1);
}

#[tokio::test]
async fn record_events_missing_fixture_errors() {
  let s = seeded().await;
  let result = s
    .record_events(404, MatchEvents {
      goals: vec![goal(10, 100, 23)],
      ..MatchEvents::default()
    })
    .await;
  assert!(result.is_err());
}

#[tokio::test]
async fn same_minute_same_player_distinct_goals_both_land() {
  let s = seeded().await;

  // A brace in the same minute differs by nothing except the payload; two
  // identical keys in one batch still dedup against stored rows only once
  // each, so the second write of the same pair is skipped.
  let mut penalty = goal(10, 100, 45);
  penalty.goal_type = Some("penalty".into());
  let events = MatchEvents {
    goals: vec![goal(10, 100, 45), penalty],
    ..MatchEvents::default()
  };
  let counts = s.record_events(9001, events).await.unwrap();
  assert_eq!(counts.goals, 2);
}

// ─── Shots ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_shots_dedups_on_shot_id() {
  let s = seeded().await;

  let n = s
    .record_shots(9001, vec![shot(1, 10, 100, 23), shot(2, 20, 200, 57)])
    .await
    .unwrap();
  assert_eq!(n, 2);

  let again = s
    .record_shots(9001, vec![shot(1, 10, 100, 23), shot(3, 10, 101, 80)])
    .await
    .unwrap();
  assert_eq!(again, 1);

  let shots = s.shots_for_fixture(9001).await.unwrap();
  assert_eq!(shots.len(), 3);
  assert_eq!(shots[0].player_coordinates, Some(json!({ "x": 91.2, "y": 45.1 })));
  assert_eq!(shots[0].xg, Some(0.34));
}

#[tokio::test]
async fn record_shots_missing_fixture_errors() {
  let s = seeded().await;
  assert!(s.record_shots(404, vec![shot(1, 10, 100, 23)]).await.is_err());
}

// ─── Statistics ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn match_statistics_unique_per_period_and_key() {
  let s = seeded().await;

  let n = s
    .record_match_statistics(vec![
      match_stat(9001, "ALL", "ballPossession"),
      match_stat(9001, "1ST", "ballPossession"),
      match_stat(9001, "ALL", "totalShotsOnGoal"),
    ])
    .await
    .unwrap();
  assert_eq!(n, 3);

  // Same (fixture, period, key) again is skipped.
  let again = s
    .record_match_statistics(vec![match_stat(9001, "ALL", "ballPossession")])
    .await
    .unwrap();
  assert_eq!(again, 0);

  let stats = s.match_statistics_for_fixture(9001).await.unwrap();
  assert_eq!(stats.len(), 3);
  assert_eq!(stats[0].home_raw.as_deref(), Some("57%"));
}

#[tokio::test]
async fn player_statistics_unique_per_player() {
  let s = seeded().await;

  let n = s
    .record_player_statistics(vec![
      player_stat(9001, 100, 10),
      player_stat(9001, 101, 10),
    ])
    .await
    .unwrap();
  assert_eq!(n, 2);

  let again = s
    .record_player_statistics(vec![player_stat(9001, 100, 10)])
    .await
    .unwrap();
  assert_eq!(again, 0);

  let rows = s.player_statistics_for_fixture(9001).await.unwrap();
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0].side, Some(Side::Home));
  assert_eq!(rows[0].stats_json["minutesPlayed"], json!(90));
}

#[tokio::test]
async fn appearances_unique_per_player_and_fixture() {
  let s = seeded().await;

  let n = s
    .record_appearances(9001, vec![appearance(100, 10), appearance(200, 20)])
    .await
    .unwrap();
  assert_eq!(n, 2);

  let again = s.record_appearances(9001, vec![appearance(100, 10)]).await.unwrap();
  assert_eq!(again, 0);

  let rows = s.appearances_for_fixture(9001).await.unwrap();
  assert_eq!(rows.len(), 2);
  assert!(rows[0].started);
  assert_eq!(rows[0].minutes_played, Some(90));
}

// ─── Game states ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn game_states_replace_wholesale() {
  let s = seeded().await;

  let segments = compute_game_states(96, 2, &[ScoringEvent {
    match_minute: 23,
    side:         Side::Home,
  }]);
  s.replace_game_states(9001, segments.clone()).await.unwrap();
  assert_eq!(
    s.game_states_for_fixture(9001).await.unwrap().len(),
    segments.len()
  );

  // A recompute with more goals replaces, never appends.
  let richer = compute_game_states(96, 2, &[
    ScoringEvent { match_minute: 23, side: Side::Home },
    ScoringEvent { match_minute: 57, side: Side::Away },
  ]);
  s.replace_game_states(9001, richer.clone()).await.unwrap();

  let stored = s.game_states_for_fixture(9001).await.unwrap();
  assert_eq!(stored.len(), richer.len());
  assert_eq!(stored[0].home_state, GameState::Drawing);
  assert_eq!(stored[1].home_state, GameState::Winning);
}

// ─── Deletion semantics ──────────────────────────────────────────────────────

async fn seeded_with_facts() -> SqliteStore {
  let s = seeded().await;
  s.record_events(9001, MatchEvents {
    goals:         vec![goal(10, 100, 23)],
    cards:         vec![card(20, 200, 40)],
    substitutions: vec![substitution(10, 101, 100, 70)],
    incidents:     vec![halftime_incident()],
  })
  .await
  .unwrap();
  s.record_shots(9001, vec![shot(1, 10, 100, 23)]).await.unwrap();
  s.record_match_statistics(vec![match_stat(9001, "ALL", "ballPossession")])
    .await
    .unwrap();
  s.record_player_statistics(vec![player_stat(9001, 100, 10)])
    .await
    .unwrap();
  s.record_appearances(9001, vec![appearance(100, 10)]).await.unwrap();
  s.replace_game_states(
    9001,
    compute_game_states(96, 2, &[ScoringEvent {
      match_minute: 23,
      side:         Side::Home,
    }]),
  )
  .await
  .unwrap();
  s
}

#[tokio::test]
async fn delete_fixture_cascades_to_all_facts() {
  let s = seeded_with_facts().await;

  assert!(s.delete_fixture(9001).await.unwrap());

  assert!(s.get_fixture(9001).await.unwrap().is_none());
  assert!(s.goals_for_fixture(9001).await.unwrap().is_empty());
  assert!(s.cards_for_fixture(9001).await.unwrap().is_empty());
  assert!(s.shots_for_fixture(9001).await.unwrap().is_empty());
  assert!(s.substitutions_for_fixture(9001).await.unwrap().is_empty());
  assert!(s.incidents_for_fixture(9001).await.unwrap().is_empty());
  assert!(s.match_statistics_for_fixture(9001).await.unwrap().is_empty());
  assert!(s.player_statistics_for_fixture(9001).await.unwrap().is_empty());
  assert!(s.appearances_for_fixture(9001).await.unwrap().is_empty());
  assert!(s.game_states_for_fixture(9001).await.unwrap().is_empty());

  // Dimensions are untouched.
  assert!(s.get_team(10).await.unwrap().is_some());
  assert!(s.get_player(100).await.unwrap().is_some());

  // Second delete is a no-op.
  assert!(!s.delete_fixture(9001).await.unwrap());
}

#[tokio::test]
async fn delete_player_nulls_soft_refs_and_cascades_hard_ones() {
  let s = seeded_with_facts().await;
  s.record_events(9001, MatchEvents {
    incidents: vec![var_incident(10, 100, 55)],
    ..MatchEvents::default()
  })
  .await
  .unwrap();

  s.execute_raw("DELETE FROM players WHERE player_id = 100".into())
    .await
    .unwrap();

  // Event rows survive with the reference nulled.
  let goals = s.goals_for_fixture(9001).await.unwrap();
  assert_eq!(goals.len(), 1);
  assert_eq!(goals[0].player_id, None);
  assert_eq!(goals[0].team_id, Some(10));

  let subs = s.substitutions_for_fixture(9001).await.unwrap();
  assert_eq!(subs[0].player_out_id, None);
  assert_eq!(subs[0].player_in_id, Some(101));

  let shots = s.shots_for_fixture(9001).await.unwrap();
  assert_eq!(shots[0].player_id, None);

  let var = s
    .incidents_for_fixture(9001)
    .await
    .unwrap()
    .into_iter()
    .find(|i| i.incident_type == IncidentType::VarDecision)
    .unwrap();
  assert_eq!(var.player_id, None);

  // Rows keyed on the player go with it.
  assert!(s.player_statistics_for_fixture(9001).await.unwrap().is_empty());
  assert!(s.appearances_for_fixture(9001).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_team_nulls_event_refs() {
  let s = seeded().await;
  s.record_events(9001, MatchEvents {
    cards: vec![card(20, 200, 40)],
    ..MatchEvents::default()
  })
  .await
  .unwrap();

  // The away side of the fixture still points at team 20, so clear it first.
  s.execute_raw("UPDATE fixtures SET away_team_id = NULL WHERE fixture_id = 9001".into())
    .await
    .unwrap();
  s.execute_raw("DELETE FROM teams WHERE team_id = 20".into())
    .await
    .unwrap();

  let cards = s.cards_for_fixture(9001).await.unwrap();
  assert_eq!(cards[0].team_id, None);
  // The player kept their row, just unattached.
  let palmer = s.get_player(200).await.unwrap().unwrap();
  assert_eq!(palmer.team_id, None);
}

// ─── Materialization ─────────────────────────────────────────────────────────

#[tokio::test]
async fn materialize_assembles_full_read_model() {
  let s = seeded_with_facts().await;

  let summary = s.materialize(9001).await.unwrap().unwrap();
  assert_eq!(summary.fixture.fixture_id, 9001);
  assert_eq!(summary.goals.len(), 1);
  assert_eq!(summary.cards.len(), 1);
  assert_eq!(summary.shots.len(), 1);
  assert_eq!(summary.substitutions.len(), 1);
  assert_eq!(summary.incidents.len(), 1);
  assert_eq!(summary.match_statistics.len(), 1);
  assert_eq!(summary.player_statistics.len(), 1);
  assert_eq!(summary.appearances.len(), 1);
  assert!(!summary.game_states.is_empty());

  assert!(s.materialize(404).await.unwrap().is_none());
}

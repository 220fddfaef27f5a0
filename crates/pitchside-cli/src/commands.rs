//! Command implementations. Each takes an open store and a local payload
//! file; payload shapes and normalisation live in `pitchside-feed`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use pitchside_core::{
  dimension::{NewSeason, NewTournament},
  event::{Goal, NewSubstitution},
  fixture::Fixture,
  state::{compute_game_states, ScoringEvent},
  stats::Side,
  store::MatchStore,
};
use pitchside_feed::{events, incidents, lineups, managers, shotmap, statistics};
use pitchside_store_sqlite::SqliteStore;

fn read_payload(file: &Path) -> Result<String> {
  std::fs::read_to_string(file)
    .with_context(|| format!("reading payload {}", file.display()))
}

async fn require_fixture(store: &SqliteStore, fixture_id: i64) -> Result<Fixture> {
  match store.get_fixture(fixture_id).await? {
    Some(f) => Ok(f),
    None => bail!("fixture {fixture_id} not found; load fixtures first"),
  }
}

pub async fn add_tournament(
  store: &SqliteStore,
  name: String,
  tournament_id: Option<i64>,
  unique_tournament_id: Option<i64>,
) -> Result<()> {
  let tournament = store
    .add_tournament(NewTournament { name, tournament_id, unique_tournament_id })
    .await?;
  tracing::info!(id = tournament.id, name = %tournament.name, "tournament added");
  Ok(())
}

pub async fn add_season(
  store: &SqliteStore,
  season_id: i64,
  name: Option<String>,
  year: Option<String>,
  tournament_id: Option<i64>,
  unique_tournament_id: Option<i64>,
) -> Result<()> {
  let season = store
    .add_season(NewSeason {
      season_id,
      name,
      year,
      tournament_id,
      unique_tournament_id,
    })
    .await?;
  tracing::info!(id = season.id, season_id = season.season_id, "season added");
  Ok(())
}

pub async fn load_fixtures(
  store: &SqliteStore,
  season_id: i64,
  round: i64,
  file: &Path,
) -> Result<()> {
  let page = events::parse_round_events(&read_payload(file)?)?;

  // Teams first; fixtures reference them.
  let teams = events::teams_from_round(&page);
  for team in teams {
    store.upsert_team(team).await?;
  }

  let fixtures = events::fixtures_from_round(&page, season_id, round);
  let total = fixtures.len();
  let inserted = store.insert_fixtures(fixtures).await?;
  tracing::info!(season_id, round, inserted, skipped = total - inserted, "fixtures loaded");
  Ok(())
}

pub async fn load_incidents(
  store: &SqliteStore,
  fixture_id: i64,
  file: &Path,
) -> Result<()> {
  let fixture = require_fixture(store, fixture_id).await?;

  let items = incidents::parse_incidents(&read_payload(file)?)?;
  let events = incidents::events_from_incidents(
    &items,
    fixture.home_team_id,
    fixture.away_team_id,
  )?;
  let counts = store.record_events(fixture_id, events).await?;
  tracing::info!(
    fixture_id,
    goals = counts.goals,
    cards = counts.cards,
    substitutions = counts.substitutions,
    incidents = counts.incidents,
    "events recorded"
  );

  rederive_game_states(store, &fixture).await
}

/// Game-state segments are a projection of the goals table, recomputed from
/// everything stored for the fixture rather than just this payload.
async fn rederive_game_states(store: &SqliteStore, fixture: &Fixture) -> Result<()> {
  let goals = store.goals_for_fixture(fixture.fixture_id).await?;
  let scoring = scoring_events(&goals, fixture);

  let segments =
    compute_game_states(fixture.total_time, fixture.injury_time_1, &scoring);
  let count = segments.len();
  store.replace_game_states(fixture.fixture_id, segments).await?;
  tracing::info!(fixture_id = fixture.fixture_id, segments = count, "game states derived");
  Ok(())
}

/// Goals with no surviving team reference, or a team that is not one of the
/// fixture's sides, carry no score information and are skipped.
fn scoring_events(goals: &[Goal], fixture: &Fixture) -> Vec<ScoringEvent> {
  goals
    .iter()
    .filter_map(|g| {
      let team_id = g.team_id?;
      let side = if Some(team_id) == fixture.home_team_id {
        Side::Home
      } else if Some(team_id) == fixture.away_team_id {
        Side::Away
      } else {
        return None;
      };
      Some(ScoringEvent { match_minute: g.match_minute?, side })
    })
    .collect()
}

pub async fn load_lineups(
  store: &SqliteStore,
  fixture_id: i64,
  file: &Path,
) -> Result<()> {
  let fixture = require_fixture(store, fixture_id).await?;
  let page = lineups::parse_lineups(&read_payload(file)?)?;

  let players =
    lineups::players_from_lineups(&page, fixture.home_team_id, fixture.away_team_id);
  let player_count = players.len();
  for player in players {
    store.upsert_player(player).await?;
  }

  let stats = lineups::player_statistics_from_lineups(
    &page,
    fixture_id,
    fixture.home_team_id,
    fixture.away_team_id,
  );
  let stats_inserted = store.record_player_statistics(stats).await?;

  // Sub on/off flags come from whatever substitutions are already recorded.
  let subs: Vec<NewSubstitution> = store
    .substitutions_for_fixture(fixture_id)
    .await?
    .into_iter()
    .map(|s| NewSubstitution {
      team_id:       s.team_id,
      player_in_id:  s.player_in_id,
      player_out_id: s.player_out_id,
      minute:        s.minute,
      added_time:    s.added_time,
      match_minute:  s.match_minute,
      half:          s.half,
      injury:        s.injury,
      incident_id:   s.incident_id,
    })
    .collect();
  let appearances = lineups::appearances_from_lineups(
    &page,
    &subs,
    fixture.home_team_id,
    fixture.away_team_id,
  );
  let appearances_inserted = store.record_appearances(fixture_id, appearances).await?;

  tracing::info!(
    fixture_id,
    players = player_count,
    player_statistics = stats_inserted,
    appearances = appearances_inserted,
    "lineups loaded"
  );
  Ok(())
}

pub async fn load_shotmap(
  store: &SqliteStore,
  fixture_id: i64,
  file: &Path,
) -> Result<()> {
  let fixture = require_fixture(store, fixture_id).await?;
  let page = shotmap::parse_shotmap(&read_payload(file)?)?;

  let shots =
    shotmap::shots_from_shotmap(&page, fixture.home_team_id, fixture.away_team_id);
  let total = shots.len();
  let inserted = store.record_shots(fixture_id, shots).await?;
  tracing::info!(fixture_id, inserted, skipped = total - inserted, "shots loaded");
  Ok(())
}

pub async fn load_statistics(
  store: &SqliteStore,
  fixture_id: i64,
  file: &Path,
) -> Result<()> {
  require_fixture(store, fixture_id).await?;
  let page = statistics::parse_statistics(&read_payload(file)?)?;

  let rows = statistics::match_statistics_from_page(&page, fixture_id);
  let total = rows.len();
  let inserted = store.record_match_statistics(rows).await?;
  tracing::info!(fixture_id, inserted, skipped = total - inserted, "statistics loaded");
  Ok(())
}

pub async fn load_managers(
  store: &SqliteStore,
  fixture_id: i64,
  file: &Path,
) -> Result<()> {
  let fixture = require_fixture(store, fixture_id).await?;
  let page = managers::parse_managers(&read_payload(file)?)?;

  let (home, away) =
    managers::managers_from_page(&page, fixture.home_team_id, fixture.away_team_id);

  let mut home_id = None;
  if let Some(manager) = home {
    home_id = Some(store.upsert_manager(manager).await?.id);
  }
  let mut away_id = None;
  if let Some(manager) = away {
    away_id = Some(store.upsert_manager(manager).await?.id);
  }

  if home_id.is_none() && away_id.is_none() {
    tracing::warn!(fixture_id, "payload carried no usable managers");
    return Ok(());
  }

  store.set_fixture_managers(fixture_id, home_id, away_id).await?;
  tracing::info!(fixture_id, ?home_id, ?away_id, "managers linked");
  Ok(())
}

pub async fn list_fixtures(store: &SqliteStore, season_id: Option<i64>) -> Result<()> {
  let fixtures = store.list_fixtures(season_id).await?;
  for f in &fixtures {
    let kickoff = f
      .kickoff_date_time
      .map(|dt| dt.to_rfc3339())
      .unwrap_or_else(|| "-".to_owned());
    let score = match (f.home_score, f.away_score) {
      (Some(h), Some(a)) => format!("{h}-{a}"),
      _ => "-".to_owned(),
    };
    println!(
      "{:>10}  round {:>2}  {}  {:>5}  {}",
      f.fixture_id,
      f.round.unwrap_or(0),
      kickoff,
      score,
      f.status.as_deref().unwrap_or("unknown"),
    );
  }
  tracing::info!(count = fixtures.len(), "fixtures listed");
  Ok(())
}

pub async fn show(store: &SqliteStore, fixture_id: i64) -> Result<()> {
  let Some(summary) = store.materialize(fixture_id).await? else {
    bail!("fixture {fixture_id} not found");
  };
  println!("{}", serde_json::to_string_pretty(&summary)?);
  Ok(())
}

pub async fn delete_fixture(store: &SqliteStore, fixture_id: i64) -> Result<()> {
  if store.delete_fixture(fixture_id).await? {
    tracing::info!(fixture_id, "fixture and dependent facts deleted");
  } else {
    tracing::warn!(fixture_id, "fixture not found");
  }
  Ok(())
}

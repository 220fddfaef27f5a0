//! `pitchside`, the ingestion and inspection CLI for the match warehouse.
//!
//! # Usage
//!
//! ```text
//! pitchside init
//! pitchside add-tournament --name "Premier League" --tournament-id 1
//! pitchside add-season --season-id 555 --tournament-id 1
//! pitchside load-fixtures --season-id 555 --round 3 round3.json
//! pitchside load-incidents --fixture-id 9001 incidents.json
//! pitchside show --fixture-id 9001
//! ```
//!
//! Feed payloads are read from local JSON files; fetching them is someone
//! else's job.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pitchside_store_sqlite::SqliteStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "pitchside", about = "Football match-statistics warehouse")]
struct Args {
  /// Path to a TOML config file (db path).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Path to the SQLite database (default: pitchside.db).
  #[arg(long, value_name = "FILE")]
  db: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create the database and apply the schema.
  Init,
  /// Create a tournament; a row already known under either external ID wins.
  AddTournament {
    #[arg(long)]
    name:                 String,
    #[arg(long)]
    tournament_id:        Option<i64>,
    #[arg(long)]
    unique_tournament_id: Option<i64>,
  },
  /// Create a season. Fixtures reference seasons by this external ID, so the
  /// season must exist before its rounds are loaded.
  AddSeason {
    #[arg(long)]
    season_id:            i64,
    #[arg(long)]
    name:                 Option<String>,
    #[arg(long)]
    year:                 Option<String>,
    #[arg(long)]
    tournament_id:        Option<i64>,
    #[arg(long)]
    unique_tournament_id: Option<i64>,
  },
  /// Insert fixtures (and their teams) from a round events payload.
  LoadFixtures {
    #[arg(long)]
    season_id: i64,
    #[arg(long)]
    round:     i64,
    file:      PathBuf,
  },
  /// Record goals, cards, substitutions and generic incidents for a fixture,
  /// then rederive its game-state segments.
  LoadIncidents {
    #[arg(long)]
    fixture_id: i64,
    file:       PathBuf,
  },
  /// Upsert players and record lineup statistics and appearances.
  LoadLineups {
    #[arg(long)]
    fixture_id: i64,
    file:       PathBuf,
  },
  /// Record shotmap rows for a fixture.
  LoadShotmap {
    #[arg(long)]
    fixture_id: i64,
    file:       PathBuf,
  },
  /// Record match-statistics rows for a fixture.
  LoadStatistics {
    #[arg(long)]
    fixture_id: i64,
    file:       PathBuf,
  },
  /// Upsert the manager pair and link them to the fixture.
  LoadManagers {
    #[arg(long)]
    fixture_id: i64,
    file:       PathBuf,
  },
  /// List fixtures, optionally for one season.
  ListFixtures {
    #[arg(long)]
    season_id: Option<i64>,
  },
  /// Print everything the warehouse holds about a fixture, as JSON.
  Show {
    #[arg(long)]
    fixture_id: i64,
  },
  /// Delete a fixture and every fact row that hangs off it.
  DeleteFixture {
    #[arg(long)]
    fixture_id: i64,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  db: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let db_path = args
    .db
    .or_else(|| (!file_cfg.db.is_empty()).then(|| PathBuf::from(&file_cfg.db)))
    .unwrap_or_else(|| PathBuf::from("pitchside.db"));

  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("opening store at {}", db_path.display()))?;

  match args.command {
    Command::Init => {
      // Opening the store already applied the schema.
      tracing::info!(db = %db_path.display(), "database initialised");
      Ok(())
    }
    Command::AddTournament { name, tournament_id, unique_tournament_id } => {
      commands::add_tournament(&store, name, tournament_id, unique_tournament_id)
        .await
    }
    Command::AddSeason {
      season_id,
      name,
      year,
      tournament_id,
      unique_tournament_id,
    } => {
      commands::add_season(
        &store,
        season_id,
        name,
        year,
        tournament_id,
        unique_tournament_id,
      )
      .await
    }
    Command::LoadFixtures { season_id, round, file } => {
      commands::load_fixtures(&store, season_id, round, &file).await
    }
    Command::LoadIncidents { fixture_id, file } => {
      commands::load_incidents(&store, fixture_id, &file).await
    }
    Command::LoadLineups { fixture_id, file } => {
      commands::load_lineups(&store, fixture_id, &file).await
    }
    Command::LoadShotmap { fixture_id, file } => {
      commands::load_shotmap(&store, fixture_id, &file).await
    }
    Command::LoadStatistics { fixture_id, file } => {
      commands::load_statistics(&store, fixture_id, &file).await
    }
    Command::LoadManagers { fixture_id, file } => {
      commands::load_managers(&store, fixture_id, &file).await
    }
    Command::ListFixtures { season_id } => {
      commands::list_fixtures(&store, season_id).await
    }
    Command::Show { fixture_id } => commands::show(&store, fixture_id).await,
    Command::DeleteFixture { fixture_id } => {
      commands::delete_fixture(&store, fixture_id).await
    }
  }
}

//! SQL schema for the Pitchside SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.
//!
//! Conventions: every table has an `INTEGER PRIMARY KEY` surrogate `id`;
//! cross-entity joins go through the stable external keys (`fixture_id`,
//! `team_id`, `player_id`, `season_id`, `tournament_id`), which carry their
//! own UNIQUE constraints. The one exception is the manager link on
//! fixtures, which must use the managers row `id` because a manager's
//! external ID is only unique per team. Fact tables cascade away with their
//! fixture; soft team/player references on fact rows survive dimension
//! deletion as NULL.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- ── Dimensions ──────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS tournaments (
    id                    INTEGER PRIMARY KEY,
    name                  TEXT NOT NULL,
    tournament_id         INTEGER UNIQUE,        -- external 'tournament' id
    unique_tournament_id  INTEGER UNIQUE,        -- external 'unique-tournament' id
    created_at            TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS seasons (
    id                    INTEGER PRIMARY KEY,
    season_id             INTEGER NOT NULL UNIQUE,
    name                  TEXT,
    year                  TEXT,
    tournament_id         INTEGER REFERENCES tournaments(tournament_id),
    unique_tournament_id  INTEGER REFERENCES tournaments(unique_tournament_id),
    created_at            TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS teams (
    id               INTEGER PRIMARY KEY,
    team_id          INTEGER NOT NULL UNIQUE,
    name             TEXT NOT NULL,
    short_name       TEXT,
    slug             TEXT,
    name_code        TEXT,
    primary_color    TEXT,
    secondary_color  TEXT,
    created_at       TEXT NOT NULL
);

-- A manager is scoped to the team they were observed with; the external
-- manager id alone is not unique.
CREATE TABLE IF NOT EXISTS managers (
    id          INTEGER PRIMARY KEY,
    manager_id  INTEGER NOT NULL,
    team_id     INTEGER NOT NULL REFERENCES teams(team_id) ON DELETE CASCADE,
    name        TEXT,
    short_name  TEXT,
    slug        TEXT,
    created_at  TEXT NOT NULL,
    UNIQUE (manager_id, team_id)
);

CREATE TABLE IF NOT EXISTS players (
    id                       INTEGER PRIMARY KEY,
    player_id                INTEGER NOT NULL UNIQUE,
    name                     TEXT,
    short_name               TEXT,
    date_of_birth_timestamp  INTEGER,
    team_id                  INTEGER REFERENCES teams(team_id) ON DELETE SET NULL,
    sofascore_id             TEXT,
    created_at               TEXT NOT NULL
);

-- ── Fixtures ────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS fixtures (
    id                 INTEGER PRIMARY KEY,
    fixture_id         INTEGER NOT NULL UNIQUE,
    fixture_custom_id  TEXT,
    home_team_id       INTEGER REFERENCES teams(team_id),
    away_team_id       INTEGER REFERENCES teams(team_id),
    season_id          INTEGER REFERENCES seasons(season_id),
    round              INTEGER,
    kickoff_date_time  TEXT,
    status             TEXT,
    home_score         INTEGER,
    away_score         INTEGER,
    result             TEXT,                     -- 'H' | 'A' | 'D'
    injury_time_1      INTEGER NOT NULL DEFAULT 0,
    injury_time_2      INTEGER NOT NULL DEFAULT 0,
    total_time         INTEGER NOT NULL DEFAULT 90,
    home_manager_id    INTEGER REFERENCES managers(id) ON DELETE SET NULL,
    away_manager_id    INTEGER REFERENCES managers(id) ON DELETE SET NULL,
    created_at         TEXT NOT NULL
);

-- ── Facts ───────────────────────────────────────────────────────────────
-- All fact tables hang off fixtures(fixture_id) and cascade with it.

CREATE TABLE IF NOT EXISTS game_states (
    id            INTEGER PRIMARY KEY,
    fixture_id    INTEGER NOT NULL REFERENCES fixtures(fixture_id) ON DELETE CASCADE,
    half          TEXT,                          -- '1' | '2' | 'ET1' | 'ET2'
    start_minute  INTEGER NOT NULL,
    end_minute    INTEGER NOT NULL,
    home_state    TEXT NOT NULL,                 -- 'winning' | 'drawing' | 'losing'
    away_state    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS goals (
    id                INTEGER PRIMARY KEY,
    fixture_id        INTEGER NOT NULL REFERENCES fixtures(fixture_id) ON DELETE CASCADE,
    team_id           INTEGER REFERENCES teams(team_id) ON DELETE SET NULL,
    player_id         INTEGER REFERENCES players(player_id) ON DELETE SET NULL,
    assist_player_id  INTEGER REFERENCES players(player_id) ON DELETE SET NULL,
    goal_minute       INTEGER,
    added_time        INTEGER,
    match_minute      INTEGER,
    half              TEXT,
    type              TEXT,                      -- 'regular' | 'penalty' | 'ownGoal' | ...
    is_own_goal       INTEGER NOT NULL DEFAULT 0,
    incident_id       INTEGER
);

CREATE TABLE IF NOT EXISTS cards (
    id            INTEGER PRIMARY KEY,
    fixture_id    INTEGER NOT NULL REFERENCES fixtures(fixture_id) ON DELETE CASCADE,
    team_id       INTEGER REFERENCES teams(team_id) ON DELETE SET NULL,
    player_id     INTEGER REFERENCES players(player_id) ON DELETE SET NULL,
    card_minute   INTEGER,
    added_time    INTEGER,
    match_minute  INTEGER,
    yellow        INTEGER NOT NULL DEFAULT 0,
    yellow_2      INTEGER NOT NULL DEFAULT 0,
    red           INTEGER NOT NULL DEFAULT 0,
    reason        TEXT,
    rescinded     INTEGER NOT NULL DEFAULT 0,
    incident_id   INTEGER
);

CREATE TABLE IF NOT EXISTS shots (
    id                      INTEGER PRIMARY KEY,
    fixture_id              INTEGER NOT NULL REFERENCES fixtures(fixture_id) ON DELETE CASCADE,
    shot_id                 INTEGER NOT NULL,
    team_id                 INTEGER REFERENCES teams(team_id) ON DELETE SET NULL,
    player_id               INTEGER REFERENCES players(player_id) ON DELETE SET NULL,
    shot_type               TEXT,
    goal_type               TEXT,
    situation               TEXT,
    body_part               TEXT,
    goal_mouth_location     TEXT,
    player_coordinates      TEXT,                -- JSON
    goal_mouth_coordinates  TEXT,                -- JSON
    draw_coordinates        TEXT,                -- JSON
    xg                      REAL,
    xgot                    REAL,
    minute                  INTEGER,
    added_time              INTEGER,
    UNIQUE (fixture_id, shot_id)
);

CREATE TABLE IF NOT EXISTS substitutions (
    id             INTEGER PRIMARY KEY,
    fixture_id     INTEGER NOT NULL REFERENCES fixtures(fixture_id) ON DELETE CASCADE,
    team_id        INTEGER REFERENCES teams(team_id) ON DELETE SET NULL,
    player_in_id   INTEGER REFERENCES players(player_id) ON DELETE SET NULL,
    player_out_id  INTEGER REFERENCES players(player_id) ON DELETE SET NULL,
    minute         INTEGER,
    added_time     INTEGER,
    match_minute   INTEGER,
    half           TEXT,
    injury         INTEGER NOT NULL DEFAULT 0,
    incident_id    INTEGER
);

-- Wide event-sourcing-style table for everything that is not a goal, card
-- or substitution. Which columns are populated depends on incident_type;
-- the raw feed payload is always kept in incident_data.
CREATE TABLE IF NOT EXISTS incidents (
    id                   INTEGER PRIMARY KEY,
    fixture_id           INTEGER NOT NULL REFERENCES fixtures(fixture_id) ON DELETE CASCADE,
    incident_type        TEXT NOT NULL,          -- 'period' | 'injuryTime' | 'varDecision' | 'inGamePenalty'
    incident_id          INTEGER,
    team_id              INTEGER REFERENCES teams(team_id) ON DELETE SET NULL,
    player_id            INTEGER REFERENCES players(player_id) ON DELETE SET NULL,
    minute               INTEGER,
    added_time           INTEGER,
    match_minute         INTEGER,
    half                 TEXT,
    text                 TEXT,                   -- period: 'HT', 'FT', ...
    home_score           INTEGER,
    away_score           INTEGER,
    is_live              INTEGER NOT NULL DEFAULT 0,
    time_seconds         INTEGER,
    period_time_seconds  INTEGER,
    length               INTEGER,                -- injuryTime
    confirmed            INTEGER NOT NULL DEFAULT 0,  -- varDecision
    incident_class       TEXT,
    reason               TEXT,                   -- inGamePenalty
    description          TEXT,
    incident_data        TEXT NOT NULL           -- full raw JSON payload
);

CREATE TABLE IF NOT EXISTS match_statistics (
    id          INTEGER PRIMARY KEY,
    fixture_id  INTEGER NOT NULL REFERENCES fixtures(fixture_id) ON DELETE CASCADE,
    period      TEXT NOT NULL,                   -- 'ALL' | '1ST' | '2ND'
    group_name  TEXT,
    key         TEXT NOT NULL,
    name        TEXT,
    value_type  TEXT,
    home_value  REAL,
    away_value  REAL,
    home_raw    TEXT,
    away_raw    TEXT,
    UNIQUE (fixture_id, period, key)
);

CREATE TABLE IF NOT EXISTS player_statistics (
    id             INTEGER PRIMARY KEY,
    fixture_id     INTEGER NOT NULL REFERENCES fixtures(fixture_id) ON DELETE CASCADE,
    player_id      INTEGER NOT NULL REFERENCES players(player_id) ON DELETE CASCADE,
    team_id        INTEGER REFERENCES teams(team_id) ON DELETE SET NULL,
    side           TEXT,                         -- 'home' | 'away'
    position       TEXT,
    jersey_number  TEXT,
    started        INTEGER NOT NULL DEFAULT 0,
    substitute     INTEGER NOT NULL DEFAULT 0,
    stats_json     TEXT NOT NULL,                -- open-ended per-player stat map
    UNIQUE (fixture_id, player_id)
);

CREATE TABLE IF NOT EXISTS players_fixtures (
    id              INTEGER PRIMARY KEY,
    player_id       INTEGER NOT NULL REFERENCES players(player_id) ON DELETE CASCADE,
    fixture_id      INTEGER NOT NULL REFERENCES fixtures(fixture_id) ON DELETE CASCADE,
    team_id         INTEGER REFERENCES teams(team_id) ON DELETE SET NULL,
    started         INTEGER NOT NULL DEFAULT 0,
    substitute      INTEGER NOT NULL DEFAULT 0,
    subbed_in       INTEGER NOT NULL DEFAULT 0,
    subbed_out      INTEGER NOT NULL DEFAULT 0,
    minutes_played  INTEGER,
    UNIQUE (player_id, fixture_id)
);

-- ── Indexes ─────────────────────────────────────────────────────────────

CREATE INDEX IF NOT EXISTS fixtures_season_idx        ON fixtures(season_id);
CREATE INDEX IF NOT EXISTS fixtures_kickoff_idx       ON fixtures(kickoff_date_time);
CREATE INDEX IF NOT EXISTS players_team_idx           ON players(team_id);
CREATE INDEX IF NOT EXISTS game_states_fixture_idx    ON game_states(fixture_id);
CREATE INDEX IF NOT EXISTS goals_fixture_idx          ON goals(fixture_id);
CREATE INDEX IF NOT EXISTS cards_fixture_idx          ON cards(fixture_id);
CREATE INDEX IF NOT EXISTS shots_fixture_idx          ON shots(fixture_id);
CREATE INDEX IF NOT EXISTS substitutions_fixture_idx  ON substitutions(fixture_id);
CREATE INDEX IF NOT EXISTS incidents_fixture_idx      ON incidents(fixture_id);
CREATE INDEX IF NOT EXISTS incidents_type_idx         ON incidents(incident_type);
CREATE INDEX IF NOT EXISTS match_stats_fixture_idx    ON match_statistics(fixture_id);
CREATE INDEX IF NOT EXISTS player_stats_fixture_idx   ON player_statistics(fixture_id);
CREATE INDEX IF NOT EXISTS player_stats_player_idx    ON player_statistics(player_id);
CREATE INDEX IF NOT EXISTS players_fixtures_fixture_idx ON players_fixtures(fixture_id);

PRAGMA user_version = 1;
";

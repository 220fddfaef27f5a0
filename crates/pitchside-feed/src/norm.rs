//! Normalisation rules shared across payload families.

/// The feed marks period-boundary incidents with an added time of 999; any
/// value in that sentinel range normalises to "no added time".
pub fn added_time(raw: Option<i64>) -> Option<i64> {
  raw.filter(|&v| v < 900)
}

/// Running match-clock minute: base minute plus whatever added time applies.
pub fn match_minute(minute: Option<i64>, added: Option<i64>) -> Option<i64> {
  minute.map(|m| m + added.unwrap_or(0))
}

/// Resolve the feed's `isHome` flag against the fixture's team IDs.
pub fn team_from_flag(
  is_home: Option<bool>,
  home_team_id: Option<i64>,
  away_team_id: Option<i64>,
) -> Option<i64> {
  match is_home {
    Some(true) => home_team_id,
    Some(false) => away_team_id,
    None => None,
  }
}

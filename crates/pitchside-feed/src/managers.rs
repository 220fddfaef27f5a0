//! Manager payloads: a home/away pair per fixture.

use pitchside_core::dimension::NewManager;
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagersPage {
  pub home_manager: Option<ManagerRef>,
  pub away_manager: Option<ManagerRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagerRef {
  pub id:         Option<i64>,
  pub name:       Option<String>,
  pub short_name: Option<String>,
  pub slug:       Option<String>,
}

pub fn parse_managers(json: &str) -> Result<ManagersPage> {
  Ok(serde_json::from_str(json)?)
}

/// The home and (then) away manager rows, when the payload and fixture give
/// us both the external manager ID and a team to scope it to.
pub fn managers_from_page(
  page: &ManagersPage,
  home_team_id: Option<i64>,
  away_team_id: Option<i64>,
) -> (Option<NewManager>, Option<NewManager>) {
  let row = |mgr: Option<&ManagerRef>, team_id: Option<i64>| {
    let mgr = mgr?;
    Some(NewManager {
      manager_id: mgr.id?,
      team_id:    team_id?,
      name:       mgr.name.clone(),
      short_name: mgr.short_name.clone(),
      slug:       mgr.slug.clone(),
    })
  };
  (
    row(page.home_manager.as_ref(), home_team_id),
    row(page.away_manager.as_ref(), away_team_id),
  )
}

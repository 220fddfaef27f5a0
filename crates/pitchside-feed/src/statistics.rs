//! Match-statistics payloads: period blocks of grouped stat items.

use pitchside_core::stats::NewMatchStatistic;
use serde::Deserialize;
use serde_json::Value;

use crate::Result;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatisticsPage {
  pub statistics: Vec<PeriodBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PeriodBlock {
  pub period: Option<String>,
  pub groups: Vec<StatGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatGroup {
  pub group_name:       Option<String>,
  pub statistics_items: Vec<StatItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatItem {
  pub key:        Option<String>,
  pub name:       Option<String>,
  pub value_type: Option<String>,
  pub home_value: Option<f64>,
  pub away_value: Option<f64>,
  /// Display values; strings like "57%" or plain numbers.
  pub home:       Option<Value>,
  pub away:       Option<Value>,
}

pub fn parse_statistics(json: &str) -> Result<StatisticsPage> {
  Ok(serde_json::from_str(json)?)
}

fn raw_text(v: Option<&Value>) -> Option<String> {
  match v? {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

/// Flatten the period/group/item tree into long-form rows. Blocks without a
/// period and items without a key have no uniqueness identity and are
/// skipped.
pub fn match_statistics_from_page(
  page: &StatisticsPage,
  fixture_id: i64,
) -> Vec<NewMatchStatistic> {
  let mut rows = Vec::new();
  for block in &page.statistics {
    let Some(period) = block.period.as_ref() else { continue };
    for group in &block.groups {
      for item in &group.statistics_items {
        let Some(key) = item.key.as_ref() else { continue };
        rows.push(NewMatchStatistic {
          fixture_id,
          period: period.clone(),
          group_name: group.group_name.clone(),
          key: key.clone(),
          name: item.name.clone(),
          value_type: item.value_type.clone(),
          home_value: item.home_value,
          away_value: item.away_value,
          home_raw: raw_text(item.home.as_ref()),
          away_raw: raw_text(item.away.as_ref()),
        });
      }
    }
  }
  rows
}

use serde_json::Value;

use crate::models::kpi::{Kpi, KpiReport};

/// Picks the objectives of the current reporting period.
pub struct KpiService;

impl KpiService {
    pub fn new() -> Self {
        Self
    }

    /// Objectives for `period` (`YYYY-MM`).
    ///
    /// The period is looked up at the top level of the document, then under
    /// `objectifs` / `objectives`. A missing or non-object period yields the
    /// default objectives.
    pub fn for_period(&self, doc: &Value, period: &str) -> KpiReport {
        let entry = doc
            .get(period)
            .or_else(|| doc.get("objectifs").and_then(|o| o.get(period)))
            .or_else(|| doc.get("objectives").and_then(|o| o.get(period)))
            .and_then(Value::as_object);

        let Some(entry) = entry else {
            log::debug!("no objectives for {period}, using defaults");
            return KpiReport::defaults(period);
        };

        KpiReport {
            period: period.to_string(),
            configured: true,
            objectives: entry
                .iter()
                .filter_map(|(name, raw)| Kpi::from_raw(raw).map(|k| (name.clone(), k)))
                .collect(),
        }
    }
}

impl Default for KpiService {
    fn default() -> Self {
        Self::new()
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::fields::{num_or_zero, str_or};

/// One objective for a reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub target: f64,

    pub achieved: f64,

    pub unit: String,

    /// Percentage of target achieved, one decimal. 0 when target is 0.
    pub progress: f64,
}

impl Kpi {
    pub fn new(target: f64, achieved: f64, unit: impl Into<String>) -> Self {
        let progress = if target > 0.0 {
            ((achieved / target) * 1000.0).round() / 10.0
        } else {
            0.0
        };
        Self {
            target,
            achieved,
            unit: unit.into(),
            progress,
        }
    }

    /// Build a KPI from a raw objective record.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;
        Some(Self::new(
            num_or_zero(record, &["objectif", "target"]),
            num_or_zero(record, &["realise", "achieved"]),
            str_or(record, &["unite", "unit"], ""),
        ))
    }
}

/// KPIs of one reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiReport {
    /// `YYYY-MM`
    pub period: String,

    /// False when the objectives file had no entry for the period and the
    /// default objectives were used instead.
    pub configured: bool,

    pub objectives: BTreeMap<String, Kpi>,
}

impl KpiReport {
    /// Default objectives used when a period has no record.
    pub fn defaults(period: impl Into<String>) -> Self {
        let mut objectives = BTreeMap::new();
        objectives.insert("ca".to_string(), Kpi::new(50_000.0, 0.0, "MAD"));
        objectives.insert("clients".to_string(), Kpi::new(5.0, 0.0, "clients"));
        objectives.insert("trading".to_string(), Kpi::new(2_000.0, 0.0, "USD"));
        Self {
            period: period.into(),
            configured: false,
            objectives,
        }
    }
}

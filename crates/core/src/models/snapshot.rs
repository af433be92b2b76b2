use serde::{Deserialize, Serialize};

use super::alert::Alert;
use super::client::Client;
use super::deal::Deal;
use super::kpi::KpiReport;
use super::planning::Appointment;
use super::signals::SignalsSection;
use super::subscriber::LoginCode;
use super::trading::TradingSection;

/// An installed skill, one per directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
}

/// A short advisory message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// "trading" or "commercial".
    #[serde(rename = "type")]
    pub category: String,
    pub message: String,
}

/// Counters computed over the assembled lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub skills_count: usize,
    pub clients_count: usize,
    pub active_clients: usize,
    pub prospects_count: usize,
    pub deals_count: usize,
    /// Sum of deal values outside the "won" stage.
    pub pipeline_total: f64,
    pub won_total: f64,
    pub alerts_count: usize,
    pub high_priority_alerts: usize,
    pub active_subscribers: usize,
    /// RFC 3339 assembly instant.
    pub last_update: String,
}

/// The document written to the dashboard on every run.
///
/// Field order is the key order of the written JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub trading: TradingSection,
    pub konan_signals: SignalsSection,
    pub login_codes: Vec<LoginCode>,
    pub alerts: Vec<Alert>,
    pub kpis: KpiReport,
    pub planning: Vec<Appointment>,
    pub predictions: Vec<Prediction>,
    pub clients: Vec<Client>,
    pub deals: Vec<Deal>,
    pub skills: Vec<Skill>,
    pub stats: Stats,
}

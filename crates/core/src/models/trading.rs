use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{int_field, num_or_zero, str_or};

pub const STATUS_ONLINE: &str = "online";
pub const STATUS_OFFLINE: &str = "offline";

/// Account metrics reported by the trading terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingStatus {
    /// "online" when the backend answered, "offline" otherwise.
    pub status: String,
    pub balance: f64,
    pub equity: f64,
    pub profit_today: f64,
    pub profit_week: f64,
    pub profit_month: f64,
    pub trades_today: i64,
    /// Percentage, 0–100.
    pub win_rate: f64,
    pub open_positions: i64,
    /// Percentage, 0–100.
    pub drawdown: f64,
}

impl TradingStatus {
    /// All-zero status used whenever the backend is unreachable.
    pub fn offline() -> Self {
        Self {
            status: STATUS_OFFLINE.to_string(),
            balance: 0.0,
            equity: 0.0,
            profit_today: 0.0,
            profit_week: 0.0,
            profit_month: 0.0,
            trades_today: 0,
            win_rate: 0.0,
            open_positions: 0,
            drawdown: 0.0,
        }
    }

    /// Parse a backend status payload. Missing metrics are 0; the status is
    /// "online" unless the payload says otherwise.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;
        Some(Self {
            status: str_or(record, &["status"], STATUS_ONLINE),
            balance: num_or_zero(record, &["balance"]),
            equity: num_or_zero(record, &["equity"]),
            profit_today: num_or_zero(record, &["profit_today", "daily_profit"]),
            profit_week: num_or_zero(record, &["profit_week", "weekly_profit"]),
            profit_month: num_or_zero(record, &["profit_month", "monthly_profit"]),
            trades_today: int_field(record, &["trades_today", "trades"]).unwrap_or(0),
            win_rate: num_or_zero(record, &["win_rate", "winrate"]),
            open_positions: int_field(record, &["open_positions", "positions"]).unwrap_or(0),
            drawdown: num_or_zero(record, &["drawdown"]),
        })
    }

    pub fn is_online(&self) -> bool {
        self.status == STATUS_ONLINE
    }
}

impl Default for TradingStatus {
    fn default() -> Self {
        Self::offline()
    }
}

/// Whether a background worker process was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Running,
    Stopped,
    /// The process list could not be read in time.
    Unknown,
    /// The process list cannot be queried on this machine.
    Error,
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerState::Running => write!(f, "running"),
            WorkerState::Stopped => write!(f, "stopped"),
            WorkerState::Unknown => write!(f, "unknown"),
            WorkerState::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStatus {
    pub name: String,
    pub status: WorkerState,
}

/// The `trading` section of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSection {
    pub mt5: TradingStatus,
    pub workers: Vec<WorkerStatus>,
}

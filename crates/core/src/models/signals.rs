use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::fields::{num_or_zero, parse_datetime, str_or};

/// A single published trading signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub symbol: String,
    pub direction: String,
    pub entry_price: f64,
    /// win, loss or pending.
    pub status: String,
    pub pnl: f64,
    pub published_at: String,
}

impl Signal {
    pub fn from_raw(id: &str, raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;
        Some(Self {
            id: id.to_string(),
            symbol: str_or(record, &["symbol", "symbole"], ""),
            direction: str_or(record, &["direction", "type"], "").to_uppercase(),
            entry_price: num_or_zero(record, &["entry_price", "entry"]),
            status: normalize_signal_status(&str_or(record, &["status", "result"], "pending")),
            pnl: num_or_zero(record, &["pnl", "profit"]),
            published_at: str_or(record, &["published_at", "date"], ""),
        })
    }

    pub fn published(&self) -> Option<DateTime<Local>> {
        parse_datetime(&self.published_at)
    }

    pub fn is_win(&self) -> bool {
        self.status == "win"
    }

    pub fn is_loss(&self) -> bool {
        self.status == "loss"
    }
}

/// Collapse the outcome spellings used by the signal bot.
pub fn normalize_signal_status(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    match lower.as_str() {
        "win" | "won" | "tp" | "gagne" | "gagné" => "win".to_string(),
        "loss" | "lost" | "sl" | "perdu" => "loss".to_string(),
        _ => "pending".to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalStats {
    pub total_signals: usize,
    pub wins: usize,
    pub losses: usize,
    pub pending: usize,
    /// Wins over closed signals, percent, one decimal.
    pub win_rate: f64,
    pub total_pnl: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySignals {
    pub signals: usize,
    pub wins: usize,
    pub pnl: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriberStats {
    pub total: usize,
    pub active: usize,
    pub revenue: f64,
}

/// The `konan_signals` section of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalsSection {
    pub stats: SignalStats,
    pub recent_signals: Vec<Signal>,
    /// Keyed by `YYYY-MM`.
    pub monthly: BTreeMap<String, MonthlySignals>,
    pub subscribers: SubscriberStats,
}

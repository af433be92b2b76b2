use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{num_or_zero, parse_datetime, str_field, str_or};

/// A signal-channel subscriber, keyed by Telegram id.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscriber {
    pub telegram_id: String,
    pub name: String,
    pub plan: String,
    pub status: String,
    /// Raw expiry text, kept for export.
    pub expires_at: Option<String>,
    pub price: f64,
    /// Permanent code, valid for the whole subscription.
    pub access_code: Option<String>,
    /// Short-lived code handed out by the bot.
    pub login_code: Option<String>,
    pub login_code_expires: Option<String>,
}

impl Subscriber {
    pub fn from_raw(telegram_id: &str, raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;
        Some(Self {
            telegram_id: str_field(record, &["telegram_id"]).unwrap_or_else(|| telegram_id.to_string()),
            name: str_or(record, &["name", "nom", "username"], ""),
            plan: str_or(record, &["plan"], ""),
            status: str_or(record, &["status"], "").trim().to_lowercase(),
            expires_at: str_field(record, &["expires_at", "expires"]),
            price: num_or_zero(record, &["price", "prix", "amount"]),
            access_code: str_field(record, &["access_code"]).and_then(|c| normalize_code(&c)),
            login_code: str_field(record, &["login_code"]).and_then(|c| normalize_code(&c)),
            login_code_expires: str_field(record, &["login_code_expires", "login_expires"]),
        })
    }

    pub fn expiry(&self) -> Option<DateTime<Local>> {
        self.expires_at.as_deref().and_then(parse_datetime)
    }

    /// The subscription expiry when the subscriber is active at `now`.
    ///
    /// Active means status "active" and an expiry strictly after `now`.
    /// A missing or unparseable expiry is never active.
    pub fn active_until(&self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        if self.status != "active" {
            return None;
        }
        self.expiry().filter(|exp| *exp > now)
    }

    pub fn is_active(&self, now: DateTime<Local>) -> bool {
        self.active_until(now).is_some()
    }
}

/// Codes are compared upper-cased and trimmed by the dashboard.
pub fn normalize_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_uppercase();
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

/// An entry of the snapshot's `login_codes` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCode {
    pub telegram_id: String,
    pub code: String,
    /// RFC 3339 expiry of this code.
    pub expires: String,
    pub name: String,
    pub plan: String,
}

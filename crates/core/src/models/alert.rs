use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{bool_field, str_field, str_or};

pub const PRIORITY_HIGH: &str = "haute";
pub const PRIORITY_MEDIUM: &str = "moyenne";
pub const PRIORITY_LOW: &str = "basse";

pub const ALERT_RELANCE: &str = "relance";
pub const ALERT_OPPORTUNITY: &str = "opportunite";
pub const ALERT_INCIDENT: &str = "incident";

/// A dashboard alert, either stored in the CRM alert file or generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,

    /// relance, opportunite, incident or any stored free text.
    #[serde(rename = "type")]
    pub alert_type: String,

    /// haute, moyenne or basse.
    pub priority: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal: Option<String>,

    pub message: String,

    /// Creation date, `YYYY-MM-DD` for generated alerts.
    pub date: String,

    /// True when produced by the alert generator.
    pub auto: bool,
}

/// A stored alert together with its handled flag, which is not exported.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAlert {
    pub alert: Alert,
    pub handled: bool,
}

impl StoredAlert {
    /// Build a stored alert from a raw alert record.
    ///
    /// Returns `None` when the record is not an object.
    pub fn from_raw(id: &str, raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;
        let priority = str_field(record, &["priorite", "priority"])
            .map(|p| normalize_priority(&p))
            .unwrap_or_else(|| PRIORITY_MEDIUM.to_string());
        Some(Self {
            alert: Alert {
                id: id.to_string(),
                alert_type: str_or(record, &["type"], "info"),
                priority,
                client: str_field(record, &["client", "client_id"]),
                deal: str_field(record, &["deal", "deal_id"]),
                message: str_or(record, &["message", "texte"], ""),
                date: str_or(record, &["date", "created_at"], ""),
                auto: bool_field(record, &["auto"]).unwrap_or(false),
            },
            handled: bool_field(record, &["traitee", "handled", "resolved"]).unwrap_or(false),
        })
    }

    /// Whether this alert survives into the next snapshot.
    pub fn is_pending_manual(&self) -> bool {
        !self.handled && !self.alert.auto
    }
}

/// Map English priority names onto the French ones used by the dashboard.
pub fn normalize_priority(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    match lower.as_str() {
        "high" | "haute" | "urgent" => PRIORITY_HIGH.to_string(),
        "medium" | "moyenne" | "normal" => PRIORITY_MEDIUM.to_string(),
        "low" | "basse" => PRIORITY_LOW.to_string(),
        _ => lower,
    }
}

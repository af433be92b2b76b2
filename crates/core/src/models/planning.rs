use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{date_field, str_field, str_or};

/// An upcoming appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,

    pub title: String,

    pub date: NaiveDate,

    /// Free-form time of day, e.g. "14:30".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Appointment {
    /// Build an appointment from a raw record. Records without a parseable
    /// date are skipped.
    pub fn from_raw(id: &str, raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;
        Some(Self {
            id: id.to_string(),
            title: str_or(record, &["titre", "title", "objet"], ""),
            date: date_field(record, &["date"])?,
            time: str_field(record, &["heure", "time"]),
            client: str_field(record, &["client", "client_id"]),
            location: str_field(record, &["lieu", "location"]),
        })
    }
}

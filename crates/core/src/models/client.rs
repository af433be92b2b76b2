use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields::{date_field, first_present, int_field, str_field, str_or};

/// Score given to clients whose source record carries none.
pub const DEFAULT_CLIENT_SCORE: i64 = 75;

/// A CRM client as exposed to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,

    pub name: String,

    /// "active", "prospect" or whatever free text the CRM holds.
    #[serde(rename = "type")]
    pub client_type: String,

    pub sector: String,

    /// Email, or phone when no email is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    pub score: i64,

    /// Date of the last recorded contact, used to schedule follow-ups.
    #[serde(
        rename = "lastContact",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_contact: Option<NaiveDate>,
}

impl Client {
    /// Build a client from a raw CRM record.
    ///
    /// Returns `None` only when the record is not a JSON object.
    pub fn from_raw(id: &str, raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;
        Some(Self {
            id: id.to_string(),
            name: str_or(record, &["nom", "name"], ""),
            client_type: normalize_client_type(&str_or(record, &["statut", "type"], "active")),
            sector: str_or(record, &["secteur", "sector"], ""),
            contact: contact_of(record),
            score: int_field(record, &["score"]).unwrap_or(DEFAULT_CLIENT_SCORE),
            last_contact: date_field(record, &["dernier_contact", "last_contact", "lastContact"]),
        })
    }

    pub fn is_active(&self) -> bool {
        self.client_type == "active"
    }

    pub fn is_prospect(&self) -> bool {
        self.client_type == "prospect"
    }
}

/// Map French status spellings onto the canonical English ones.
/// Unknown values pass through lower-cased.
pub fn normalize_client_type(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    match lower.as_str() {
        "actif" | "active" | "client" => "active".to_string(),
        "prospect" | "lead" => "prospect".to_string(),
        "inactif" | "inactive" => "inactive".to_string(),
        _ => lower,
    }
}

fn contact_of(record: &Map<String, Value>) -> Option<String> {
    let from_nested = first_present(record, &["contact"]).and_then(|c| match c {
        Value::Object(inner) => str_field(inner, &["email", "telephone", "phone"]),
        Value::String(s) => Some(s.clone()),
        _ => None,
    });
    from_nested
        .or_else(|| str_field(record, &["email", "telephone", "phone"]))
        .filter(|s| !s.trim().is_empty())
}

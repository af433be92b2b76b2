use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{num_or_zero, str_field, str_or};

/// Sales pipeline stage.
///
/// Serialized as the lower-case English stage name; unknown stages keep
/// their source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DealStage {
    Qualification,
    Proposal,
    Negotiation,
    Closing,
    Won,
    Other(String),
}

impl DealStage {
    /// Parse a stage name, accepting the French spellings used by the CRM.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        match lower.as_str() {
            "qualification" | "decouverte" | "découverte" => DealStage::Qualification,
            "proposal" | "proposition" | "devis" => DealStage::Proposal,
            "negotiation" | "negociation" | "négociation" => DealStage::Negotiation,
            "closing" | "cloture" | "clôture" | "signature" => DealStage::Closing,
            "won" | "gagne" | "gagné" | "signe" | "signé" => DealStage::Won,
            _ => DealStage::Other(lower),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DealStage::Qualification => "qualification",
            DealStage::Proposal => "proposal",
            DealStage::Negotiation => "negotiation",
            DealStage::Closing => "closing",
            DealStage::Won => "won",
            DealStage::Other(s) => s,
        }
    }
}

impl std::fmt::Display for DealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for DealStage {
    fn from(s: String) -> Self {
        DealStage::parse(&s)
    }
}

impl From<DealStage> for String {
    fn from(stage: DealStage) -> Self {
        stage.as_str().to_string()
    }
}

/// A pipeline deal as exposed to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,

    pub title: String,

    /// Id of the client this deal belongs to. Not checked against the client list.
    pub client: String,

    /// Deal amount. Never negative: bad or missing amounts become 0.
    pub value: f64,

    pub stage: DealStage,
}

impl Deal {
    /// Build a deal from a raw pipeline record.
    ///
    /// Returns `None` only when the record is not a JSON object.
    pub fn from_raw(id: &str, raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;
        let value = num_or_zero(record, &["montant", "value"]).max(0.0);
        let stage = str_field(record, &["stage", "etape"])
            .map(|s| DealStage::parse(&s))
            .unwrap_or(DealStage::Negotiation);
        Some(Self {
            id: id.to_string(),
            title: str_or(record, &["titre", "title"], ""),
            client: str_or(record, &["client_id", "client"], ""),
            value,
            stage,
        })
    }

    pub fn is_won(&self) -> bool {
        self.stage == DealStage::Won
    }
}

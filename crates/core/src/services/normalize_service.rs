use serde_json::Value;
use uuid::Uuid;

use crate::models::alert::StoredAlert;
use crate::models::client::Client;
use crate::models::deal::Deal;
use crate::models::planning::Appointment;
use crate::models::signals::Signal;
use crate::models::subscriber::Subscriber;

/// Where a resolved entity list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrigin {
    /// The authoritative source file (possibly an empty collection).
    Source,
    /// The previous snapshot, because the source was absent.
    Previous,
    /// Demonstration records, because demo mode is on.
    Demo,
    /// Nothing available.
    Empty,
}

impl std::fmt::Display for ListOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListOrigin::Source => write!(f, "source"),
            ListOrigin::Previous => write!(f, "previous snapshot"),
            ListOrigin::Demo => write!(f, "demo data"),
            ListOrigin::Empty => write!(f, "empty"),
        }
    }
}

/// Maps raw source documents onto the canonical entity lists.
///
/// Collections are accepted either as an object keyed by id or as an array
/// of objects carrying `id`. Records that are not objects are skipped; a
/// collection of the wrong type is read as empty.
pub struct NormalizeService;

impl NormalizeService {
    pub fn new() -> Self {
        Self
    }

    /// Entries of the collection stored under the first present key.
    ///
    /// `None` when `doc` has none of the keys (the collection is absent).
    /// When `allow_root_array` is set, a document that is itself an array
    /// is taken as the collection.
    pub fn collection<'a>(
        &self,
        doc: &'a Value,
        keys: &[&str],
        allow_root_array: bool,
    ) -> Option<Vec<(String, &'a Value)>> {
        let raw = match doc {
            Value::Array(_) if allow_root_array => doc,
            Value::Object(map) => keys.iter().find_map(|k| map.get(*k).filter(|v| !v.is_null()))?,
            _ => return None,
        };

        let entries = match raw {
            Value::Object(map) => map.iter().map(|(id, v)| (id.clone(), v)).collect(),
            Value::Array(items) => items
                .iter()
                .filter(|item| item.is_object())
                .map(|item| (Self::record_id(item), item))
                .collect(),
            other => {
                log::warn!("collection {:?} has unexpected type {}, read as empty", keys, type_name(other));
                Vec::new()
            }
        };
        Some(entries)
    }

    /// The record's own `id`, or a stable id derived from its content.
    pub fn record_id(record: &Value) -> String {
        match record.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => Uuid::new_v5(&Uuid::NAMESPACE_OID, record.to_string().as_bytes()).to_string(),
        }
    }

    pub fn clients(&self, doc: &Value) -> Option<Vec<Client>> {
        let entries = self.collection(doc, &["clients"], false)?;
        Some(
            entries
                .into_iter()
                .filter_map(|(id, raw)| Client::from_raw(&id, raw))
                .collect(),
        )
    }

    pub fn deals(&self, doc: &Value) -> Option<Vec<Deal>> {
        let entries = self.collection(doc, &["deals", "pipeline"], false)?;
        Some(
            entries
                .into_iter()
                .filter_map(|(id, raw)| Deal::from_raw(&id, raw))
                .collect(),
        )
    }

    pub fn stored_alerts(&self, doc: &Value) -> Vec<StoredAlert> {
        self.collection(doc, &["alerts", "alertes"], true)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(id, raw)| StoredAlert::from_raw(&id, raw))
            .collect()
    }

    pub fn appointments(&self, doc: &Value) -> Vec<Appointment> {
        self.collection(doc, &["rdv", "appointments", "planning"], true)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(id, raw)| Appointment::from_raw(&id, raw))
            .collect()
    }

    pub fn signals(&self, doc: &Value) -> Vec<Signal> {
        self.collection(doc, &["signals", "history"], true)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(id, raw)| Signal::from_raw(&id, raw))
            .collect()
    }

    pub fn subscribers(&self, doc: &Value) -> Vec<Subscriber> {
        self.collection(doc, &["subscribers", "abonnes"], true)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(id, raw)| Subscriber::from_raw(&id, raw))
            .collect()
    }

    /// Choose the list to publish.
    ///
    /// A present source always wins, even when empty. Otherwise the previous
    /// snapshot's list is kept if it has entries, then demo records (only
    /// passed in when demo mode is on), then an empty list.
    pub fn resolve_list<T>(
        &self,
        source: Option<Vec<T>>,
        previous: Option<Vec<T>>,
        demo: Option<Vec<T>>,
    ) -> (Vec<T>, ListOrigin) {
        if let Some(list) = source {
            return (list, ListOrigin::Source);
        }
        if let Some(list) = previous.filter(|l| !l.is_empty()) {
            return (list, ListOrigin::Previous);
        }
        if let Some(list) = demo {
            return (list, ListOrigin::Demo);
        }
        (Vec::new(), ListOrigin::Empty)
    }
}

impl Default for NormalizeService {
    fn default() -> Self {
        Self::new()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

use serde_json::Value;
use std::path::Path;

/// Outcome of reading one JSON source.
///
/// `Missing` and `Malformed` both end up as the caller's default value, but
/// stay distinct so the log says which one happened.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRead {
    /// The file parsed as JSON.
    Loaded(Value),
    /// The file does not exist.
    Missing,
    /// The file exists but could not be read or parsed.
    Malformed(String),
}

impl SourceRead {
    /// The parsed document, or `default` for a missing or malformed source.
    pub fn or_default(self, default: Value) -> Value {
        match self {
            SourceRead::Loaded(v) => v,
            SourceRead::Missing | SourceRead::Malformed(_) => default,
        }
    }

    /// The parsed document, if any.
    pub fn loaded(self) -> Option<Value> {
        match self {
            SourceRead::Loaded(v) => Some(v),
            SourceRead::Missing | SourceRead::Malformed(_) => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, SourceRead::Loaded(_))
    }
}

/// Read and parse a JSON file. Never fails: every problem is folded into the
/// returned [`SourceRead`] and logged.
pub fn read_json(path: &Path) -> SourceRead {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("source {} not found", path.display());
            return SourceRead::Missing;
        }
        Err(e) => {
            log::warn!("source {} unreadable: {e}", path.display());
            return SourceRead::Malformed(e.to_string());
        }
    };

    // Accept files written with a UTF-8 byte order mark.
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => SourceRead::Loaded(value),
        Err(e) => {
            log::warn!("source {} is not valid JSON: {e}", path.display());
            SourceRead::Malformed(e.to_string())
        }
    }
}

/// Read a JSON file, substituting `default` when it is missing or malformed.
pub fn read_or_default(path: &Path, default: Value) -> Value {
    read_json(path).or_default(default)
}

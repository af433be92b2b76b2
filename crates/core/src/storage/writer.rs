use serde::Serialize;
use std::path::Path;

use crate::errors::SyncError;

/// Render a document as pretty JSON: 2-space indent, non-ASCII kept as-is,
/// trailing newline.
pub fn to_json_bytes<T: Serialize>(document: &T) -> Result<Vec<u8>, SyncError> {
    let mut bytes = serde_json::to_vec_pretty(document)
        .map_err(|e| SyncError::Serialization(format!("Failed to serialize snapshot: {e}")))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write a document to `path`, creating parent directories first.
///
/// The file is overwritten in place; there is no temp-file rename.
pub fn write_json<T: Serialize>(path: &Path, document: &T) -> Result<(), SyncError> {
    let bytes = to_json_bytes(document)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    log::info!("snapshot written to {}", path.display());
    Ok(())
}

use thiserror::Error;

/// Unified error type for the dashboard-sync-core library.
///
/// Source readers never return it: a missing or malformed source resolves to
/// a default value. It surfaces only from the writer, the settings loader,
/// the integrations and the publisher.
#[derive(Debug, Error)]
pub enum SyncError {
    // ── Storage / File ──────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid settings: {0}")]
    Config(String),

    // ── Integrations ────────────────────────────────────────────────
    #[error("Integration error ({backend}): {message}")]
    Integration {
        backend: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Process probe failed: {0}")]
    ProcessProbe(String),

    #[error("Process probe timed out after {0}s")]
    ProbeTimeout(u64),

    // ── Publishing ──────────────────────────────────────────────────
    #[error("Publish failed: {0}")]
    Publish(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for SyncError {
    fn from(e: std::io::Error) -> Self {
        SyncError::FileIO(e.to_string())
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        // Bridge URLs may carry an access token as a query parameter.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        SyncError::Network(sanitized)
    }
}

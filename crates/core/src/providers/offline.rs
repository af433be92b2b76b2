use crate::errors::SyncError;
use crate::models::trading::TradingStatus;

use super::traits::{ProcessProbe, TradingBackend};

/// Trading backend used when no bridge is configured. Always offline.
#[derive(Debug, Default)]
pub struct OfflineTradingBackend;

impl TradingBackend for OfflineTradingBackend {
    fn name(&self) -> &str {
        "Offline"
    }

    fn fetch_status(&self) -> Result<TradingStatus, SyncError> {
        Ok(TradingStatus::offline())
    }
}

/// Process probe for machines where the process list cannot be queried.
/// Every worker is reported as `error`.
#[derive(Debug, Default)]
pub struct UnavailableProcessProbe;

impl ProcessProbe for UnavailableProcessProbe {
    fn name(&self) -> &str {
        "Unavailable"
    }

    fn list_processes(&self) -> Result<Vec<String>, SyncError> {
        Err(SyncError::ProcessProbe(
            "process listing is not available".into(),
        ))
    }
}

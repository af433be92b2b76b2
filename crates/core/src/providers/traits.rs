use crate::errors::SyncError;
use crate::models::trading::TradingStatus;

/// Source of live trading-account metrics.
///
/// The real adapter talks to the terminal bridge; the offline stub stands in
/// when no bridge is configured, so the pipeline never has to check whether
/// an integration exists.
pub trait TradingBackend {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    /// Current account status. Errors are turned into the offline status by
    /// the caller.
    fn fetch_status(&self) -> Result<TradingStatus, SyncError>;
}

/// Read access to the operating system's process list.
pub trait ProcessProbe {
    fn name(&self) -> &str;

    /// One line per running process, holding at least its command name.
    ///
    /// Returns `SyncError::ProbeTimeout` when the query did not finish in
    /// time and any other error when the query cannot run at all.
    fn list_processes(&self) -> Result<Vec<String>, SyncError>;
}

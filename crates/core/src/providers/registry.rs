use std::time::Duration;

use crate::models::settings::Settings;

use super::bridge::BridgeTradingBackend;
use super::offline::{OfflineTradingBackend, UnavailableProcessProbe};
use super::process::SystemProcessProbe;
use super::traits::{ProcessProbe, TradingBackend};

/// The integrations one sync run talks to.
///
/// Built once from settings; tests swap in their own implementations with
/// [`IntegrationRegistry::new`].
pub struct IntegrationRegistry {
    trading: Box<dyn TradingBackend>,
    processes: Box<dyn ProcessProbe>,
}

impl IntegrationRegistry {
    pub fn new(trading: Box<dyn TradingBackend>, processes: Box<dyn ProcessProbe>) -> Self {
        Self { trading, processes }
    }

    /// Registry with no live integration: trading offline, probe unavailable.
    pub fn offline() -> Self {
        Self::new(
            Box::new(OfflineTradingBackend),
            Box::new(UnavailableProcessProbe),
        )
    }

    /// Pick the real adapters the settings allow.
    ///
    /// A bridge that cannot be initialized falls back to the offline backend.
    pub fn from_settings(settings: &Settings) -> Self {
        let trading: Box<dyn TradingBackend> = match settings.trading_bridge_url.as_deref() {
            Some(url) if !url.trim().is_empty() => {
                match BridgeTradingBackend::new(url, Duration::from_secs(settings.trading_timeout_secs)) {
                    Ok(bridge) => Box::new(bridge),
                    Err(e) => {
                        log::warn!("trading bridge disabled: {e}");
                        Box::new(OfflineTradingBackend)
                    }
                }
            }
            _ => Box::new(OfflineTradingBackend),
        };
        let processes = Box::new(SystemProcessProbe::new(Duration::from_secs(
            settings.probe_timeout_secs.max(1),
        )));
        Self::new(trading, processes)
    }

    pub fn trading(&self) -> &dyn TradingBackend {
        self.trading.as_ref()
    }

    pub fn processes(&self) -> &dyn ProcessProbe {
        self.processes.as_ref()
    }
}

impl Default for IntegrationRegistry {
    fn default() -> Self {
        Self::offline()
    }
}

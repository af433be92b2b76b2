use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use crate::errors::SyncError;
use crate::models::trading::TradingStatus;

use super::traits::TradingBackend;

/// Trading backend reading account metrics from the terminal bridge.
///
/// The bridge runs next to the MT5 terminal and serves `GET /status` as a
/// JSON object carrying `balance`, `equity`, `profit_today`, `profit_week`,
/// `profit_month`, `trades_today`, `win_rate`, `open_positions` and
/// `drawdown`. Missing metrics read as 0.
pub struct BridgeTradingBackend {
    client: Client,
    base_url: String,
}

impl BridgeTradingBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Integration {
                backend: "MT5 bridge".into(),
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn status_url(&self) -> String {
        format!("{}/status", self.base_url)
    }
}

impl TradingBackend for BridgeTradingBackend {
    fn name(&self) -> &str {
        "MT5 bridge"
    }

    fn fetch_status(&self) -> Result<TradingStatus, SyncError> {
        let body: Value = self
            .client
            .get(self.status_url())
            .send()?
            .error_for_status()?
            .json()
            .map_err(|e| SyncError::Integration {
                backend: self.name().into(),
                message: format!("Failed to parse status response: {e}"),
            })?;

        TradingStatus::from_raw(&body).ok_or_else(|| SyncError::Integration {
            backend: self.name().into(),
            message: "status response is not a JSON object".into(),
        })
    }
}

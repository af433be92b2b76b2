use crate::models::client::Client;
use crate::models::deal::{Deal, DealStage};
use crate::models::snapshot::Prediction;
use crate::models::trading::TradingStatus;

use super::alert_service::format_amount;

pub const MAX_PREDICTIONS: usize = 5;

/// Win rate (percent) under which the strategy gets flagged.
pub const LOW_WIN_RATE: f64 = 40.0;

/// Win rate (percent) from which the strategy gets a positive note.
pub const HIGH_WIN_RATE: f64 = 60.0;

/// Prospect count from which a conversion push is suggested.
pub const PROSPECT_THRESHOLD: usize = 3;

const TRADING: &str = "trading";
const COMMERCIAL: &str = "commercial";

/// Turns trading and pipeline state into short advisory messages.
///
/// Each rule is checked on its own, in a fixed order; the first
/// [`MAX_PREDICTIONS`] matches are kept.
pub struct PredictionService;

impl PredictionService {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(
        &self,
        trading: &TradingStatus,
        clients: &[Client],
        deals: &[Deal],
    ) -> Vec<Prediction> {
        let mut out = Vec::new();

        if trading.win_rate > 0.0 && trading.win_rate < LOW_WIN_RATE {
            out.push(prediction(
                TRADING,
                format!(
                    "Win rate à {:.1}% : réduire la taille des positions et revoir la stratégie",
                    trading.win_rate
                ),
            ));
        }

        if trading.win_rate >= HIGH_WIN_RATE {
            out.push(prediction(
                TRADING,
                format!("Win rate solide à {:.1}% : stratégie à maintenir", trading.win_rate),
            ));
        }

        if trading.profit_week > 0.0 {
            out.push(prediction(
                TRADING,
                format!(
                    "Semaine positive (+{}) : objectif mensuel en bonne voie",
                    format_amount(trading.profit_week)
                ),
            ));
        } else if trading.profit_week < 0.0 {
            out.push(prediction(
                TRADING,
                format!(
                    "Semaine négative ({}) : prudence sur les prochaines entrées",
                    format_amount(trading.profit_week)
                ),
            ));
        }

        let prospects = clients.iter().filter(|c| c.is_prospect()).count();
        if prospects >= PROSPECT_THRESHOLD {
            out.push(prediction(
                COMMERCIAL,
                format!("{prospects} prospects en attente : planifier une session de conversion"),
            ));
        }

        let closing: Vec<&Deal> = deals.iter().filter(|d| d.stage == DealStage::Closing).collect();
        if !closing.is_empty() {
            let total: f64 = closing.iter().map(|d| d.value).sum();
            out.push(prediction(
                COMMERCIAL,
                format!(
                    "{} deal(s) en closing : {} MAD à signer",
                    closing.len(),
                    format_amount(total)
                ),
            ));
        }

        out.truncate(MAX_PREDICTIONS);
        out
    }
}

impl Default for PredictionService {
    fn default() -> Self {
        Self::new()
    }
}

fn prediction(category: &str, message: String) -> Prediction {
    Prediction {
        category: category.to_string(),
        message,
    }
}

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::models::alert::{
    Alert, StoredAlert, ALERT_INCIDENT, ALERT_OPPORTUNITY, ALERT_RELANCE, PRIORITY_HIGH,
    PRIORITY_MEDIUM,
};
use crate::models::client::Client;
use crate::models::deal::{Deal, DealStage};
use crate::models::trading::TradingStatus;

/// Maximum number of generated alerts per run.
pub const MAX_AUTO_ALERTS: usize = 10;

/// Days without contact after which a client needs a follow-up.
pub const RELANCE_AFTER_DAYS: i64 = 14;

/// Days without contact after which the follow-up becomes urgent.
pub const URGENT_RELANCE_AFTER_DAYS: i64 = 21;

/// Daily loss (account currency) that raises a trading incident.
pub const INCIDENT_DAILY_LOSS: f64 = -100.0;

/// Derives alerts from clients, deals and trading state, and merges them
/// with the alerts stored in the CRM.
///
/// Generated ids depend only on the triggering entity and the day, so a
/// second run on the same day yields the same ids.
pub struct AlertService;

impl AlertService {
    pub fn new() -> Self {
        Self
    }

    /// Generate alerts for `today`, in order: follow-ups (client order),
    /// opportunities (deal order), trading incident. Only the first
    /// [`MAX_AUTO_ALERTS`] are kept.
    pub fn generate(
        &self,
        clients: &[Client],
        deals: &[Deal],
        trading: &TradingStatus,
        today: NaiveDate,
    ) -> Vec<Alert> {
        let day = today.format("%Y%m%d").to_string();
        let date = today.format("%Y-%m-%d").to_string();
        let mut alerts = Vec::new();

        for client in clients {
            let Some(last) = client.last_contact else {
                continue;
            };
            let days = (today - last).num_days();
            if days <= RELANCE_AFTER_DAYS {
                continue;
            }
            let priority = if days > URGENT_RELANCE_AFTER_DAYS {
                PRIORITY_HIGH
            } else {
                PRIORITY_MEDIUM
            };
            let name = if client.name.is_empty() { &client.id } else { &client.name };
            alerts.push(Alert {
                id: format!("{ALERT_RELANCE}_{}_{day}", client.id),
                alert_type: ALERT_RELANCE.to_string(),
                priority: priority.to_string(),
                client: Some(client.id.clone()),
                deal: None,
                message: format!("Relancer {name} : aucun contact depuis {days} jours"),
                date: date.clone(),
                auto: true,
            });
        }

        for deal in deals {
            let priority = match deal.stage {
                DealStage::Proposal => PRIORITY_MEDIUM,
                DealStage::Negotiation => PRIORITY_HIGH,
                _ => continue,
            };
            let title = if deal.title.is_empty() { &deal.id } else { &deal.title };
            alerts.push(Alert {
                id: format!("{ALERT_OPPORTUNITY}_{}_{day}", deal.id),
                alert_type: ALERT_OPPORTUNITY.to_string(),
                priority: priority.to_string(),
                client: Some(deal.client.clone()).filter(|c| !c.is_empty()),
                deal: Some(deal.id.clone()),
                message: format!(
                    "Deal {title} en {} ({}) : faire avancer",
                    deal.stage,
                    format_amount(deal.value)
                ),
                date: date.clone(),
                auto: true,
            });
        }

        if trading.profit_today < INCIDENT_DAILY_LOSS {
            alerts.push(Alert {
                id: format!("{ALERT_INCIDENT}_trading_{day}"),
                alert_type: ALERT_INCIDENT.to_string(),
                priority: PRIORITY_HIGH.to_string(),
                client: None,
                deal: None,
                message: format!(
                    "Perte journalière MT5 de {} : vérifier les positions",
                    format_amount(trading.profit_today)
                ),
                date,
                auto: true,
            });
        }

        alerts.truncate(MAX_AUTO_ALERTS);
        alerts
    }

    /// Merge stored and generated alerts.
    ///
    /// Stored alerts that are handled or were auto-generated by an earlier
    /// run are dropped. The remaining stored alerts come first, then each
    /// generated alert whose id is not already present. Stored content wins
    /// on an id clash.
    pub fn merge(&self, stored: Vec<StoredAlert>, generated: Vec<Alert>) -> Vec<Alert> {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();

        for alert in stored
            .into_iter()
            .filter(StoredAlert::is_pending_manual)
            .map(|s| s.alert)
            .chain(generated)
        {
            if seen.insert(alert.id.clone()) {
                merged.push(alert);
            }
        }
        merged
    }
}

impl Default for AlertService {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an amount with no decimals and a thin grouping, e.g. `12 500`.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

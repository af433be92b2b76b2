use chrono::{DateTime, Local, SecondsFormat};

use crate::models::alert::{Alert, StoredAlert, PRIORITY_HIGH};
use crate::models::client::Client;
use crate::models::deal::Deal;
use crate::models::kpi::KpiReport;
use crate::models::planning::Appointment;
use crate::models::signals::SignalsSection;
use crate::models::snapshot::{Prediction, Skill, Snapshot, Stats};
use crate::models::subscriber::LoginCode;
use crate::models::trading::TradingSection;

use super::alert_service::AlertService;

/// Everything the assembler needs, already normalized and generated.
#[derive(Debug, Clone)]
pub struct SnapshotParts {
    pub trading: TradingSection,
    pub signals: SignalsSection,
    pub login_codes: Vec<LoginCode>,
    pub stored_alerts: Vec<StoredAlert>,
    pub generated_alerts: Vec<Alert>,
    pub kpis: KpiReport,
    pub planning: Vec<Appointment>,
    pub predictions: Vec<Prediction>,
    pub clients: Vec<Client>,
    pub deals: Vec<Deal>,
    pub skills: Vec<Skill>,
}

/// Combines all pipeline outputs into the snapshot document.
pub struct SnapshotService {
    alert_service: AlertService,
}

impl SnapshotService {
    pub fn new() -> Self {
        Self {
            alert_service: AlertService::new(),
        }
    }

    pub fn assemble(&self, parts: SnapshotParts, now: DateTime<Local>) -> Snapshot {
        let alerts = self
            .alert_service
            .merge(parts.stored_alerts, parts.generated_alerts);
        let stats = self.stats(
            &parts.clients,
            &parts.deals,
            &parts.skills,
            &alerts,
            &parts.signals,
            now,
        );

        Snapshot {
            trading: parts.trading,
            konan_signals: parts.signals,
            login_codes: parts.login_codes,
            alerts,
            kpis: parts.kpis,
            planning: parts.planning,
            predictions: parts.predictions,
            clients: parts.clients,
            deals: parts.deals,
            skills: parts.skills,
            stats,
        }
    }

    /// Counters over the assembled lists. Deal values were coerced to 0 at
    /// normalization, so sums never see a bad value.
    pub fn stats(
        &self,
        clients: &[Client],
        deals: &[Deal],
        skills: &[Skill],
        alerts: &[Alert],
        signals: &SignalsSection,
        now: DateTime<Local>,
    ) -> Stats {
        Stats {
            skills_count: skills.len(),
            clients_count: clients.len(),
            active_clients: clients.iter().filter(|c| c.is_active()).count(),
            prospects_count: clients.iter().filter(|c| c.is_prospect()).count(),
            deals_count: deals.len(),
            pipeline_total: deals.iter().filter(|d| !d.is_won()).map(|d| d.value).sum(),
            won_total: deals.iter().filter(|d| d.is_won()).map(|d| d.value).sum(),
            alerts_count: alerts.len(),
            high_priority_alerts: alerts.iter().filter(|a| a.priority == PRIORITY_HIGH).count(),
            active_subscribers: signals.subscribers.active,
            last_update: now.to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }
}

impl Default for SnapshotService {
    fn default() -> Self {
        Self::new()
    }
}

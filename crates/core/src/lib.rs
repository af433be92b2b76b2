pub mod demo;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, Local};
use serde_json::{json, Value};
use std::path::PathBuf;

use errors::SyncError;
use models::settings::Settings;
use models::snapshot::Snapshot;
use models::trading::{TradingSection, TradingStatus};
use providers::process::worker_statuses;
use providers::registry::IntegrationRegistry;
use services::{
    alert_service::AlertService,
    kpi_service::KpiService,
    normalize_service::{ListOrigin, NormalizeService},
    planning_service::PlanningService,
    prediction_service::PredictionService,
    publish_service::{PublishOutcome, Publisher},
    signal_service::SignalService,
    snapshot_service::{SnapshotParts, SnapshotService},
};
use storage::reader::{read_json, read_or_default};
use storage::skills::scan_skills;
use storage::writer::write_json;

/// Outcome of one collection run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub snapshot: Snapshot,
    /// Where the snapshot was (or would be) written.
    pub output: PathBuf,
    pub clients_origin: ListOrigin,
    pub deals_origin: ListOrigin,
}

/// Main entry point of the library: owns the settings and integrations and
/// runs the read → normalize → generate → assemble → write pipeline.
///
/// No stage below [`DashboardSync::sync`] fails on bad input: missing or
/// malformed sources resolve to defaults. Only writing the snapshot and
/// publishing it can return an error.
#[must_use]
pub struct DashboardSync {
    settings: Settings,
    integrations: IntegrationRegistry,
    normalize_service: NormalizeService,
    alert_service: AlertService,
    prediction_service: PredictionService,
    signal_service: SignalService,
    kpi_service: KpiService,
    planning_service: PlanningService,
    snapshot_service: SnapshotService,
}

impl std::fmt::Debug for DashboardSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardSync")
            .field("output", &self.settings.output_path())
            .field("trading", &self.integrations.trading().name())
            .field("processes", &self.integrations.processes().name())
            .field("demo_mode", &self.settings.demo_mode)
            .finish()
    }
}

impl DashboardSync {
    /// Build a pipeline using the integrations the settings allow.
    pub fn new(settings: Settings) -> Self {
        let integrations = IntegrationRegistry::from_settings(&settings);
        Self::with_integrations(settings, integrations)
    }

    /// Build a pipeline with explicit integrations.
    pub fn with_integrations(settings: Settings, integrations: IntegrationRegistry) -> Self {
        Self {
            settings,
            integrations,
            normalize_service: NormalizeService::new(),
            alert_service: AlertService::new(),
            prediction_service: PredictionService::new(),
            signal_service: SignalService::new(),
            kpi_service: KpiService::new(),
            planning_service: PlanningService::new(),
            snapshot_service: SnapshotService::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Gather every source and assemble the snapshot without writing it.
    pub fn collect(&self, now: DateTime<Local>) -> SyncReport {
        let settings = &self.settings;
        let output = settings.output_path();
        let today = now.date_naive();

        // ── CRM lists ───────────────────────────────────────────────
        let previous = read_or_default(&output, json!({}));

        let source_clients = read_json(&settings.clients_file())
            .loaded()
            .and_then(|doc| self.normalize_service.clients(&doc));
        let previous_clients = self
            .normalize_service
            .clients(&previous)
            .map(|list| self.real_records(list, |c| &c.id));
        let (clients, clients_origin) = self.normalize_service.resolve_list(
            source_clients,
            previous_clients,
            settings.demo_mode.then(demo::demo_clients),
        );

        let source_deals = read_json(&settings.pipeline_file())
            .loaded()
            .and_then(|doc| self.normalize_service.deals(&doc));
        let previous_deals = self
            .normalize_service
            .deals(&previous)
            .map(|list| self.real_records(list, |d| &d.id));
        let (deals, deals_origin) = self.normalize_service.resolve_list(
            source_deals,
            previous_deals,
            settings.demo_mode.then(demo::demo_deals),
        );
        log::info!(
            "{} clients from {clients_origin}, {} deals from {deals_origin}",
            clients.len(),
            deals.len()
        );

        let skills = scan_skills(&settings.skills_dirs);

        // ── Integrations ────────────────────────────────────────────
        let mt5 = self.trading_status();
        let workers = worker_statuses(self.integrations.processes(), &settings.workers);

        // ── Signal bot ──────────────────────────────────────────────
        let performance = read_or_default(&settings.performance_file(), json!({}));
        let subscribers_doc = read_or_default(&settings.subscribers_file(), json!({}));
        let signals = self.normalize_service.signals(&performance);
        let subscribers = self.normalize_service.subscribers(&subscribers_doc);
        let signals_section = self.signal_service.section(&signals, &subscribers, now);
        let login_codes = self.signal_service.login_codes(&subscribers, now);

        // ── Alerts, objectives, planning ────────────────────────────
        let alerts_doc = read_or_default(&settings.alerts_file(), Value::Array(Vec::new()));
        let stored_alerts = self.normalize_service.stored_alerts(&alerts_doc);
        let generated_alerts = self.alert_service.generate(&clients, &deals, &mt5, today);

        let objectives = read_or_default(&settings.objectives_file(), json!({}));
        let kpis = self
            .kpi_service
            .for_period(&objectives, &now.format("%Y-%m").to_string());

        let appointments_doc = read_or_default(&settings.appointments_file(), Value::Array(Vec::new()));
        let planning = self
            .planning_service
            .upcoming(self.normalize_service.appointments(&appointments_doc), today);

        let predictions = self.prediction_service.generate(&mt5, &clients, &deals);

        let snapshot = self.snapshot_service.assemble(
            SnapshotParts {
                trading: TradingSection { mt5, workers },
                signals: signals_section,
                login_codes,
                stored_alerts,
                generated_alerts,
                kpis,
                planning,
                predictions,
                clients,
                deals,
                skills,
            },
            now,
        );

        SyncReport {
            snapshot,
            output,
            clients_origin,
            deals_origin,
        }
    }

    /// Collect and write the snapshot to the configured output path.
    pub fn sync(&self, now: DateTime<Local>) -> Result<SyncReport, SyncError> {
        let report = self.collect(now);
        write_json(&report.output, &report.snapshot)?;
        Ok(report)
    }

    /// Hand the written snapshot to a publisher.
    pub fn publish(
        &self,
        publisher: &dyn Publisher,
        now: DateTime<Local>,
    ) -> Result<PublishOutcome, SyncError> {
        let output = self.settings.output_path();
        log::info!("publishing {} via {}", output.display(), publisher.name());
        publisher.publish(&output, now)
    }

    /// Drop demonstration records carried over from an earlier demo run,
    /// unless demo mode is still on.
    fn real_records<T>(&self, mut list: Vec<T>, id: impl Fn(&T) -> &String) -> Vec<T> {
        if !self.settings.demo_mode {
            let before = list.len();
            list.retain(|item| !demo::is_demo_id(id(item)));
            if list.len() < before {
                log::info!("dropped {} demo records from the previous snapshot", before - list.len());
            }
        }
        list
    }

    fn trading_status(&self) -> TradingStatus {
        let backend = self.integrations.trading();
        match backend.fetch_status() {
            Ok(status) => status,
            Err(e) => {
                log::warn!("trading backend {} unavailable: {e}", backend.name());
                TradingStatus::offline()
            }
        }
    }
}

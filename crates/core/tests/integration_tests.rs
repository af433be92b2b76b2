// ═══════════════════════════════════════════════════════════════════
// Integration Tests — full sync runs against a sandboxed directory tree
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, Local, TimeZone};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use dashboard_sync_core::errors::SyncError;
use dashboard_sync_core::models::settings::Settings;
use dashboard_sync_core::models::trading::{TradingStatus, WorkerState};
use dashboard_sync_core::providers::offline::UnavailableProcessProbe;
use dashboard_sync_core::providers::registry::IntegrationRegistry;
use dashboard_sync_core::providers::traits::TradingBackend;
use dashboard_sync_core::services::normalize_service::ListOrigin;
use dashboard_sync_core::services::publish_service::{GitPublisher, PublishOutcome, Publisher};
use dashboard_sync_core::DashboardSync;

// ── Helpers ─────────────────────────────────────────────────────────

fn now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

fn offline_sync(root: &Path) -> DashboardSync {
    DashboardSync::with_integrations(Settings::rooted_at(root), IntegrationRegistry::offline())
}

fn write(path: &Path, value: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn read_output(sync: &DashboardSync) -> Value {
    let text = fs::read_to_string(sync.settings().output_path()).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn seed_crm(settings: &Settings) {
    write(
        &settings.clients_file(),
        &json!({"clients": {
            "c1": {"nom": "Atlas Digital", "statut": "actif", "dernier_contact": "2026-09-20"},
            "c2": {"nom": "Sahara Logistics", "statut": "prospect"}
        }}),
    );
    write(
        &settings.pipeline_file(),
        &json!({"deals": {"d1": {"titre": "Site", "client_id": "c1", "montant": 15000, "stage": "proposition"}}}),
    );
}

/// Trading backend returning a fixed, online status.
struct FixedTrading(TradingStatus);

impl TradingBackend for FixedTrading {
    fn name(&self) -> &str {
        "Fixed"
    }

    fn fetch_status(&self) -> Result<TradingStatus, SyncError> {
        Ok(self.0.clone())
    }
}

/// Trading backend that always fails.
struct BrokenTrading;

impl TradingBackend for BrokenTrading {
    fn name(&self) -> &str {
        "Broken"
    }

    fn fetch_status(&self) -> Result<TradingStatus, SyncError> {
        Err(SyncError::Network("connection refused".into()))
    }
}

/// Publisher remembering what it was asked to publish.
#[derive(Default)]
struct RecordingPublisher {
    calls: RefCell<Vec<PathBuf>>,
}

impl Publisher for RecordingPublisher {
    fn name(&self) -> &str {
        "recording"
    }

    fn publish(&self, file: &Path, _at: DateTime<Local>) -> Result<PublishOutcome, SyncError> {
        self.calls.borrow_mut().push(file.to_path_buf());
        Ok(PublishOutcome::Pushed)
    }
}

// ═══════════════════════════════════════════════════════════════════
// Sync runs
// ═══════════════════════════════════════════════════════════════════

mod sync_runs {
    use super::*;

    #[test]
    fn empty_environment_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        let report = sync.sync(now()).unwrap();

        assert_eq!(report.clients_origin, ListOrigin::Empty);
        assert_eq!(report.deals_origin, ListOrigin::Empty);
        assert!(report.output.exists());

        let doc = read_output(&sync);
        assert_eq!(doc["trading"]["mt5"]["status"], "offline");
        assert_eq!(doc["clients"], json!([]));
        assert_eq!(doc["deals"], json!([]));
        assert_eq!(doc["alerts"], json!([]));
        assert_eq!(doc["skills"], json!([]));
        assert_eq!(doc["login_codes"], json!([]));
        assert_eq!(doc["kpis"]["configured"], false);
        assert_eq!(doc["kpis"]["period"], "2026-10");
        assert_eq!(doc["stats"]["clientsCount"], 0);
        assert_eq!(doc["konan_signals"]["stats"]["total_signals"], 0);
        for worker in doc["trading"]["workers"].as_array().unwrap() {
            assert_eq!(worker["status"], "error");
        }
    }

    #[test]
    fn crm_counts_with_trading_offline() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        seed_crm(sync.settings());

        let report = sync.sync(now()).unwrap();
        assert_eq!(report.clients_origin, ListOrigin::Source);
        assert_eq!(report.snapshot.stats.clients_count, 2);
        assert_eq!(report.snapshot.stats.deals_count, 1);
        assert_eq!(report.snapshot.stats.active_clients, 1);
        assert_eq!(report.snapshot.stats.prospects_count, 1);
        assert_eq!(report.snapshot.stats.pipeline_total, 15_000.0);

        let doc = read_output(&sync);
        assert_eq!(doc["trading"]["mt5"]["status"], "offline");
        assert_eq!(doc["clients"][0]["type"], "active");
        assert_eq!(doc["deals"][0]["stage"], "proposal");

        // 26 days without contact and one proposal.
        let ids: Vec<&str> = doc["alerts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["relance_c1_20261016", "opportunite_d1_20261016"]);
        assert_eq!(doc["alerts"][0]["priority"], "haute");
    }

    #[test]
    fn top_level_key_order() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        sync.sync(now()).unwrap();

        let text = fs::read_to_string(sync.settings().output_path()).unwrap();
        let keys = [
            "trading",
            "konan_signals",
            "login_codes",
            "alerts",
            "kpis",
            "planning",
            "predictions",
            "clients",
            "deals",
            "skills",
            "stats",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| text.find(&format!("\n  \"{k}\":")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn rerun_is_stable_apart_from_timestamp() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        seed_crm(sync.settings());

        sync.sync(now()).unwrap();
        let mut first = read_output(&sync);
        sync.sync(Local.with_ymd_and_hms(2026, 10, 16, 18, 30, 0).unwrap()).unwrap();
        let mut second = read_output(&sync);

        assert_ne!(first["stats"]["lastUpdate"], second["stats"]["lastUpdate"]);
        first["stats"]["lastUpdate"] = Value::Null;
        second["stats"]["lastUpdate"] = Value::Null;
        assert_eq!(first, second);
    }

    #[test]
    fn same_instant_gives_identical_bytes() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        seed_crm(sync.settings());

        sync.sync(now()).unwrap();
        let first = fs::read(sync.settings().output_path()).unwrap();
        sync.sync(now()).unwrap();
        let second = fs::read(sync.settings().output_path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn absent_source_keeps_previous_lists() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        seed_crm(sync.settings());
        sync.sync(now()).unwrap();

        fs::remove_file(sync.settings().clients_file()).unwrap();
        let report = sync.sync(now()).unwrap();
        assert_eq!(report.clients_origin, ListOrigin::Previous);
        assert_eq!(report.snapshot.stats.clients_count, 2);
        assert_eq!(report.deals_origin, ListOrigin::Source);
    }

    #[test]
    fn emptied_source_clears_lists() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        seed_crm(sync.settings());
        sync.sync(now()).unwrap();

        write(&sync.settings().clients_file(), &json!({"clients": {}}));
        let report = sync.sync(now()).unwrap();
        assert_eq!(report.clients_origin, ListOrigin::Source);
        assert_eq!(report.snapshot.stats.clients_count, 0);
    }

    #[test]
    fn malformed_source_falls_back() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        let clients = sync.settings().clients_file();
        fs::create_dir_all(clients.parent().unwrap()).unwrap();
        fs::write(&clients, "{ not json").unwrap();

        let report = sync.sync(now()).unwrap();
        assert_eq!(report.clients_origin, ListOrigin::Empty);
    }

    #[test]
    fn demo_mode_fills_empty_crm() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::rooted_at(dir.path());
        settings.demo_mode = true;
        let sync = DashboardSync::with_integrations(settings, IntegrationRegistry::offline());

        let report = sync.sync(now()).unwrap();
        assert_eq!(report.clients_origin, ListOrigin::Demo);
        assert_eq!(report.deals_origin, ListOrigin::Demo);
        assert_eq!(report.snapshot.stats.clients_count, 3);
        assert_eq!(report.snapshot.stats.deals_count, 2);
        assert!(report.snapshot.clients.iter().all(|c| c.id.starts_with("demo-")));
    }

    #[test]
    fn demo_mode_never_overrides_source() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::rooted_at(dir.path());
        settings.demo_mode = true;
        seed_crm(&settings);
        let sync = DashboardSync::with_integrations(settings, IntegrationRegistry::offline());

        let report = sync.collect(now());
        assert_eq!(report.clients_origin, ListOrigin::Source);
        assert_eq!(report.snapshot.stats.clients_count, 2);
    }

    #[test]
    fn demo_records_do_not_outlive_demo_mode() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::rooted_at(dir.path());
        settings.demo_mode = true;
        let demo_run = DashboardSync::with_integrations(settings, IntegrationRegistry::offline());
        demo_run.sync(now()).unwrap();

        let plain_run = offline_sync(dir.path());
        let report = plain_run.sync(now()).unwrap();
        assert_eq!(report.clients_origin, ListOrigin::Empty);
        assert_eq!(report.deals_origin, ListOrigin::Empty);
        assert!(report.snapshot.clients.is_empty());
        assert!(report.snapshot.deals.is_empty());
        assert_eq!(read_output(&plain_run)["clients"], json!([]));
    }

    #[test]
    fn real_records_survive_next_to_demo_leftovers() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        write(
            &sync.settings().output_path(),
            &json!({"clients": [
                {"id": "demo-atlas", "name": "Atlas Digital", "type": "active"},
                {"id": "c9", "name": "Client réel", "type": "active"}
            ]}),
        );

        let report = sync.collect(now());
        assert_eq!(report.clients_origin, ListOrigin::Previous);
        let ids: Vec<&str> = report.snapshot.clients.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c9"]);
    }

    #[test]
    fn collect_does_not_write() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        let report = sync.collect(now());
        assert!(!report.output.exists());
    }

    #[test]
    fn unwritable_output_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        let mut settings = Settings::rooted_at(dir.path());
        settings.output_file = Some(blocker.join("data.json"));
        let sync = DashboardSync::with_integrations(settings, IntegrationRegistry::offline());
        assert!(matches!(sync.sync(now()), Err(SyncError::FileIO(_))));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Other sources
// ═══════════════════════════════════════════════════════════════════

mod sources {
    use super::*;

    #[test]
    fn online_trading_feeds_alerts_and_predictions() {
        let dir = TempDir::new().unwrap();
        let status = TradingStatus {
            status: "online".into(),
            balance: 10_000.0,
            profit_today: -250.0,
            profit_week: 300.0,
            win_rate: 65.0,
            ..TradingStatus::offline()
        };
        let registry = IntegrationRegistry::new(Box::new(FixedTrading(status)), Box::new(UnavailableProcessProbe));
        let sync = DashboardSync::with_integrations(Settings::rooted_at(dir.path()), registry);

        let report = sync.collect(now());
        assert_eq!(report.snapshot.trading.mt5.status, "online");
        assert_eq!(report.snapshot.alerts.len(), 1);
        assert_eq!(report.snapshot.alerts[0].id, "incident_trading_20261016");
        assert_eq!(report.snapshot.predictions.len(), 2);
        assert!(report
            .snapshot
            .trading
            .workers
            .iter()
            .all(|w| w.status == WorkerState::Error));
    }

    #[test]
    fn failing_trading_backend_reads_offline() {
        let dir = TempDir::new().unwrap();
        let registry = IntegrationRegistry::new(Box::new(BrokenTrading), Box::new(UnavailableProcessProbe));
        let sync = DashboardSync::with_integrations(Settings::rooted_at(dir.path()), registry);
        let report = sync.collect(now());
        assert_eq!(report.snapshot.trading.mt5, TradingStatus::offline());
    }

    #[test]
    fn skills_signals_and_subscribers() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        let settings = sync.settings();
        for name in ["crm", "weather"] {
            fs::create_dir_all(settings.skills_dirs[0].join(name)).unwrap();
        }
        write(
            &settings.performance_file(),
            &json!({"signals": [
                {"id": "s1", "symbol": "XAUUSD", "direction": "buy", "status": "win", "pnl": 50, "published_at": "2026-10-10 09:00"},
                {"id": "s2", "symbol": "EURUSD", "direction": "sell", "status": "loss", "pnl": -20, "published_at": "2026-10-12 09:00"}
            ]}),
        );
        write(
            &settings.subscribers_file(),
            &json!({"subscribers": {
                "100": {"name": "Amine", "plan": "vip", "status": "active", "expires_at": "2026-12-31", "price": 49, "access_code": "vip-100"},
                "200": {"name": "Sara", "status": "expired", "expires_at": "2026-09-01", "access_code": "old-200"}
            }}),
        );

        let report = sync.collect(now());
        let snap = &report.snapshot;
        assert_eq!(snap.stats.skills_count, 2);
        assert_eq!(snap.konan_signals.stats.total_signals, 2);
        assert_eq!(snap.konan_signals.stats.win_rate, 50.0);
        assert_eq!(snap.konan_signals.recent_signals[0].id, "s2");
        assert_eq!(snap.konan_signals.subscribers.active, 1);
        assert_eq!(snap.stats.active_subscribers, 1);
        assert_eq!(snap.login_codes.len(), 1);
        assert_eq!(snap.login_codes[0].code, "VIP-100");
    }

    #[test]
    fn stored_alerts_objectives_and_planning() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        let settings = sync.settings();
        write(
            &settings.alerts_file(),
            &json!([
                {"id": "m1", "type": "relance", "priorite": "haute", "message": "Rappeler Atlas"},
                {"id": "m2", "message": "Déjà fait", "traitee": true}
            ]),
        );
        write(
            &settings.objectives_file(),
            &json!({"2026-10": {"ca": {"objectif": 40000, "realise": 10000, "unite": "MAD"}}}),
        );
        write(
            &settings.appointments_file(),
            &json!({"rdv": [
                {"id": "r1", "titre": "Démo", "date": "2026-10-18", "heure": "10:00"},
                {"id": "r0", "titre": "Passé", "date": "2026-10-01"}
            ]}),
        );

        let report = sync.collect(now());
        let snap = &report.snapshot;
        assert_eq!(snap.alerts.len(), 1);
        assert_eq!(snap.alerts[0].id, "m1");
        assert_eq!(snap.stats.high_priority_alerts, 1);
        assert!(snap.kpis.configured);
        assert_eq!(snap.kpis.objectives["ca"].progress, 25.0);
        assert_eq!(snap.planning.len(), 1);
        assert_eq!(snap.planning[0].id, "r1");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Publishing
// ═══════════════════════════════════════════════════════════════════

mod publishing {
    use super::*;

    #[test]
    fn publisher_receives_output_path() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        sync.sync(now()).unwrap();

        let publisher = RecordingPublisher::default();
        let outcome = sync.publish(&publisher, now()).unwrap();
        assert_eq!(outcome, PublishOutcome::Pushed);
        assert_eq!(*publisher.calls.borrow(), vec![sync.settings().output_path()]);
    }

    #[test]
    fn missing_git_program_is_a_publish_error() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        sync.sync(now()).unwrap();

        let publisher = GitPublisher::new(&sync.settings().dashboard_dir)
            .with_program("definitely-not-a-git-binary");
        let err = sync.publish(&publisher, now()).unwrap_err();
        assert!(matches!(err, SyncError::Publish(_)));
    }

    #[cfg(unix)]
    #[test]
    fn failing_git_step_is_a_publish_error() {
        let dir = TempDir::new().unwrap();
        let sync = offline_sync(dir.path());
        sync.sync(now()).unwrap();

        let publisher = GitPublisher::new(&sync.settings().dashboard_dir).with_program("false");
        let err = sync.publish(&publisher, now()).unwrap_err();
        assert!(err.to_string().contains("git add failed"));
    }

    /// Run git in `dir`, returning whether it succeeded.
    fn git(dir: &Path, args: &[&str]) -> bool {
        std::process::Command::new("git")
            .current_dir(dir)
            .args(args)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn git_stdout(dir: &Path, args: &[&str]) -> String {
        let out = std::process::Command::new("git")
            .current_dir(dir)
            .args(args)
            .output()
            .unwrap();
        String::from_utf8_lossy(&out.stdout).to_string()
    }

    /// Dashboard checkout with the snapshot and `notes.txt` committed.
    /// `None` when git is not installed.
    fn committed_checkout(dir: &Path) -> Option<DashboardSync> {
        if !git(dir, &["--version"]) {
            return None;
        }
        let sync = offline_sync(dir);
        sync.sync(now()).unwrap();
        let repo = sync.settings().dashboard_dir.clone();
        fs::write(repo.join("notes.txt"), "v1\n").unwrap();
        assert!(git(&repo, &["init", "-q"]));
        assert!(git(&repo, &["config", "user.name", "Dashboard Bot"]));
        assert!(git(&repo, &["config", "user.email", "bot@dashboard.test"]));
        assert!(git(&repo, &["config", "commit.gpgsign", "false"]));
        assert!(git(&repo, &["add", "-A"]));
        assert!(git(&repo, &["commit", "-q", "-m", "init"]));
        Some(sync)
    }

    #[test]
    fn unchanged_snapshot_with_dirty_checkout_is_nothing_to_commit() {
        let dir = TempDir::new().unwrap();
        let Some(sync) = committed_checkout(dir.path()) else {
            return;
        };
        let repo = sync.settings().dashboard_dir.clone();
        fs::write(repo.join("notes.txt"), "edited, not staged\n").unwrap();

        sync.sync(now()).unwrap();
        let outcome = sync.publish(&GitPublisher::new(&repo), now()).unwrap();
        assert_eq!(outcome, PublishOutcome::NothingToCommit);
        assert_eq!(git_stdout(&repo, &["rev-list", "--count", "HEAD"]).trim(), "1");
    }

    #[test]
    fn commit_holds_only_the_snapshot() {
        let dir = TempDir::new().unwrap();
        let Some(sync) = committed_checkout(dir.path()) else {
            return;
        };
        let repo = sync.settings().dashboard_dir.clone();
        fs::write(repo.join("notes.txt"), "staged elsewhere\n").unwrap();
        assert!(git(&repo, &["add", "notes.txt"]));

        let later = Local.with_ymd_and_hms(2026, 10, 16, 13, 0, 0).unwrap();
        sync.sync(later).unwrap();
        // No remote is configured, so only the push step fails.
        let err = sync.publish(&GitPublisher::new(&repo), later).unwrap_err();
        assert!(err.to_string().contains("git push failed"));

        let committed = git_stdout(&repo, &["show", "--name-only", "--format=", "HEAD"]);
        assert_eq!(committed.trim(), "public/data.json");
        let message = git_stdout(&repo, &["log", "-1", "--format=%s"]);
        assert_eq!(message.trim(), "Update dashboard data - 2026-10-16 13:00");
        let still_staged = git_stdout(&repo, &["diff", "--cached", "--name-only"]);
        assert_eq!(still_staged.trim(), "notes.txt");
    }

    #[test]
    fn commit_message_carries_timestamp() {
        assert_eq!(
            GitPublisher::commit_message(now()),
            "Update dashboard data - 2026-10-16 12:00"
        );
    }
}

use chrono::{DateTime, Local};
use clap::{ArgAction, Parser};
use dashboard_sync_core::models::settings::Settings;
use dashboard_sync_core::services::publish_service::{GitPublisher, PublishOutcome, Publisher};
use dashboard_sync_core::{DashboardSync, SyncReport};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "sync-dashboard")]
#[command(about = "Refresh the dashboard snapshot from local CRM, trading and signal data")]
struct Cli {
    /// Commit and push the snapshot after writing it.
    #[arg(short = 'p', long, default_value_t = false)]
    push: bool,

    /// Only print errors.
    #[arg(short = 'q', long, default_value_t = false)]
    quiet: bool,

    /// JSON settings file; missing keys keep their defaults.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the snapshot here instead of the configured path.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Fill empty CRM lists with demonstration records.
    #[arg(long, default_value_t = false)]
    demo: bool,

    /// More log output (-v info, -vv debug).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    fn settings(&self) -> Result<Settings, dashboard_sync_core::errors::SyncError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(output) = &self.output {
            settings.output_file = Some(output.clone());
        }
        if self.demo {
            settings.demo_mode = true;
        }
        Ok(settings)
    }
}

fn configure_logging(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    // RUST_LOG, when set, refines the level chosen by the flags.
    builder.parse_default_env();
    builder.format_timestamp(None);
    let _ = builder.try_init();
}

fn print_report(report: &SyncReport) {
    let stats = &report.snapshot.stats;
    let file_name = report
        .output
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| report.output.display().to_string());
    println!("[OK] {file_name} mis a jour");
    println!("    - {} clients ({})", stats.clients_count, report.clients_origin);
    println!("    - {} deals ({})", stats.deals_count, report.deals_origin);
    println!("    - {} skills", stats.skills_count);
    println!(
        "    - {} alertes ({} haute priorite)",
        stats.alerts_count, stats.high_priority_alerts
    );
    println!("    - {} predictions", report.snapshot.predictions.len());
    println!("    - MT5 {}", report.snapshot.trading.mt5.status);
    println!(
        "    - {} abonnes actifs, {} codes de connexion",
        stats.active_subscribers,
        report.snapshot.login_codes.len()
    );
}

/// Publish the snapshot written at `now` and report the outcome. A failed
/// push never fails the run.
fn publish_snapshot(
    sync: &DashboardSync,
    publisher: &dyn Publisher,
    now: DateTime<Local>,
    quiet: bool,
) -> Option<PublishOutcome> {
    match sync.publish(publisher, now) {
        Ok(outcome) => {
            if !quiet {
                match outcome {
                    PublishOutcome::Pushed => {
                        println!("[OK] Push vers GitHub reussi");
                        println!("[INFO] Vercel va automatiquement redeployer");
                    }
                    PublishOutcome::NothingToCommit => println!("[INFO] Aucun changement a publier"),
                }
            }
            Some(outcome)
        }
        Err(e) => {
            log::error!("publish failed: {e}");
            if !quiet {
                println!("[ERREUR] Git: {e}");
            }
            None
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    configure_logging(cli.log_level());

    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("[ERREUR] {e}");
            return ExitCode::FAILURE;
        }
    };

    if !cli.quiet {
        println!("=== SYNC DASHBOARD ===");
    }

    let sync = DashboardSync::new(settings);
    let now = Local::now();
    let report = match sync.sync(now) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("[ERREUR] snapshot non ecrit: {e}");
            return ExitCode::FAILURE;
        }
    };
    if !cli.quiet {
        print_report(&report);
    }

    if cli.push {
        if !cli.quiet {
            println!("\n=== GIT PUSH ===");
        }
        let publisher = GitPublisher::new(&sync.settings().dashboard_dir);
        publish_snapshot(&sync, &publisher, now, cli.quiet);
    }

    ExitCode::SUCCESS
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::SyncError;

/// A background process whose presence is reported on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSpec {
    /// Name shown on the dashboard.
    pub name: String,
    /// Substring searched (case-insensitive) in each process command line.
    pub pattern: String,
}

impl WorkerSpec {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// Locations and switches for one sync run.
///
/// Every field has a default, so a settings file only needs the keys it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// CRM store holding clients, pipeline, objectives, alerts and appointments.
    pub crm_dir: PathBuf,

    /// Checkout of the dashboard repository; git commands run here.
    pub dashboard_dir: PathBuf,

    /// Snapshot destination. `None` means `<dashboard_dir>/public/data.json`.
    pub output_file: Option<PathBuf>,

    /// Roots scanned for skill directories, in priority order.
    pub skills_dirs: Vec<PathBuf>,

    /// Signal bot data: `performance.json` and `subscribers.json`.
    pub signals_dir: PathBuf,

    /// Base URL of the trading terminal bridge. `None` means no backend.
    pub trading_bridge_url: Option<String>,

    /// Seconds allowed for the bridge request.
    pub trading_timeout_secs: u64,

    /// Seconds allowed for the process list query.
    pub probe_timeout_secs: u64,

    pub workers: Vec<WorkerSpec>,

    /// Fill empty CRM lists with demonstration records.
    pub demo_mode: bool,
}

impl Settings {
    /// Default settings rooted at an arbitrary home directory.
    pub fn with_home(home: &Path) -> Self {
        let dashboard_dir = home.join("clawd").join("dashboard-vercel");
        Self {
            crm_dir: home.join(".clawdbot").join("crm"),
            output_file: None,
            dashboard_dir,
            skills_dirs: vec![
                home.join("clawd").join("skills"),
                PathBuf::from(r"D:\clawdbot\moltbot\skills"),
            ],
            signals_dir: home.join("clawd").join("konan-signals"),
            trading_bridge_url: None,
            trading_timeout_secs: 3,
            probe_timeout_secs: 5,
            workers: vec![
                WorkerSpec::new("trading-bot", "trading_bot"),
                WorkerSpec::new("konan-signals", "konan_signals"),
            ],
            demo_mode: false,
        }
    }

    /// Settings where every location lives under `root`, for sandboxed runs.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            crm_dir: root.join("crm"),
            dashboard_dir: root.join("dashboard"),
            skills_dirs: vec![root.join("skills")],
            signals_dir: root.join("signals"),
            ..Self::with_home(root)
        }
    }

    /// Load settings from a JSON file. Keys absent from the file keep their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SyncError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| SyncError::Config(format!("{}: {e}", path.display())))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_file
            .clone()
            .unwrap_or_else(|| self.dashboard_dir.join("public").join("data.json"))
    }

    pub fn clients_file(&self) -> PathBuf {
        self.crm_dir.join("clients.json")
    }

    pub fn pipeline_file(&self) -> PathBuf {
        self.crm_dir.join("pipeline.json")
    }

    pub fn objectives_file(&self) -> PathBuf {
        self.crm_dir.join("objectifs.json")
    }

    pub fn alerts_file(&self) -> PathBuf {
        self.crm_dir.join("alertes.json")
    }

    pub fn appointments_file(&self) -> PathBuf {
        self.crm_dir.join("rdv.json")
    }

    pub fn performance_file(&self) -> PathBuf {
        self.signals_dir.join("performance.json")
    }

    pub fn subscribers_file(&self) -> PathBuf {
        self.signals_dir.join("subscribers.json")
    }
}

impl Default for Settings {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_home(&home)
    }
}

use std::io::{Read, Seek, SeekFrom};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::errors::SyncError;
use crate::models::settings::WorkerSpec;
use crate::models::trading::{WorkerState, WorkerStatus};

use super::traits::ProcessProbe;

/// Process probe backed by the platform's process listing command
/// (`ps` on Unix, `tasklist` on Windows).
pub struct SystemProcessProbe {
    timeout: Duration,
}

impl SystemProcessProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn command() -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("tasklist");
            cmd.args(["/fo", "csv", "/nh"]);
            cmd
        } else {
            let mut cmd = Command::new("ps");
            cmd.args(["-eo", "args="]);
            cmd
        }
    }
}

impl Default for SystemProcessProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl ProcessProbe for SystemProcessProbe {
    fn name(&self) -> &str {
        "System"
    }

    fn list_processes(&self) -> Result<Vec<String>, SyncError> {
        // Output goes to an anonymous file so a large listing cannot block
        // the child on a full pipe while we poll it.
        let mut capture = tempfile::tempfile()?;
        let stdout = capture.try_clone()?;

        let mut child = Self::command()
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SyncError::ProcessProbe(format!("cannot list processes: {e}")))?;

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if started.elapsed() > self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(SyncError::ProbeTimeout(self.timeout.as_secs()));
                    }
                    thread::sleep(Duration::from_millis(50));
                }
                Err(e) => {
                    return Err(SyncError::ProcessProbe(format!("wait failed: {e}")));
                }
            }
        };
        if !status.success() {
            return Err(SyncError::ProcessProbe(format!(
                "process listing exited with {status}"
            )));
        }

        let mut bytes = Vec::new();
        capture.seek(SeekFrom::Start(0))?;
        capture.read_to_end(&mut bytes)?;
        Ok(String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Resolve each configured worker against the probe's process list.
///
/// One probe call serves every worker. A timed-out probe reports `unknown`,
/// any other probe failure reports `error`.
pub fn worker_statuses(probe: &dyn ProcessProbe, workers: &[WorkerSpec]) -> Vec<WorkerStatus> {
    let listing = probe.list_processes();
    let fallback = match &listing {
        Ok(_) => None,
        Err(SyncError::ProbeTimeout(secs)) => {
            log::warn!("process probe {} timed out after {secs}s", probe.name());
            Some(WorkerState::Unknown)
        }
        Err(e) => {
            log::warn!("process probe {} unavailable: {e}", probe.name());
            Some(WorkerState::Error)
        }
    };

    let lines: Vec<String> = listing
        .unwrap_or_default()
        .into_iter()
        .map(|l| l.to_lowercase())
        .collect();

    workers
        .iter()
        .map(|worker| {
            let status = fallback.unwrap_or_else(|| {
                let pattern = worker.pattern.to_lowercase();
                if !pattern.is_empty() && lines.iter().any(|l| l.contains(&pattern)) {
                    WorkerState::Running
                } else {
                    WorkerState::Stopped
                }
            });
            WorkerStatus {
                name: worker.name.clone(),
                status,
            }
        })
        .collect()
}

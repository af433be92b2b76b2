use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::SyncError;

/// Result of a successful publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A commit was created and pushed.
    Pushed,
    /// The snapshot was identical to the committed one; nothing was pushed.
    NothingToCommit,
}

/// Sends a written snapshot to wherever the dashboard is deployed from.
pub trait Publisher {
    fn name(&self) -> &str;

    fn publish(&self, file: &Path, at: DateTime<Local>) -> Result<PublishOutcome, SyncError>;
}

/// Commits the snapshot in the dashboard checkout and pushes it; the
/// hosting side redeploys on push.
pub struct GitPublisher {
    work_dir: PathBuf,
    program: String,
}

impl GitPublisher {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            program: "git".to_string(),
        }
    }

    /// Use another git executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn commit_message(at: DateTime<Local>) -> String {
        format!("Update dashboard data - {}", at.format("%Y-%m-%d %H:%M"))
    }

    fn git(&self, args: &[&str]) -> Result<std::process::Output, SyncError> {
        log::debug!("{} {}", self.program, args.join(" "));
        Command::new(&self.program)
            .current_dir(&self.work_dir)
            .args(args)
            .output()
            .map_err(|e| SyncError::Publish(format!("cannot run {}: {e}", self.program)))
    }

    fn check(step: &str, output: &std::process::Output) -> Result<(), SyncError> {
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() };
        Err(SyncError::Publish(format!("git {step} failed ({}): {detail}", output.status)))
    }
}

impl Publisher for GitPublisher {
    fn name(&self) -> &str {
        "git"
    }

    fn publish(&self, file: &Path, at: DateTime<Local>) -> Result<PublishOutcome, SyncError> {
        let relative = file.strip_prefix(&self.work_dir).unwrap_or(file);
        let path_arg = relative.to_string_lossy();

        let add = self.git(&["add", "--", path_arg.as_ref()])?;
        Self::check("add", &add)?;

        // Exit 0: the index holds no change for the snapshot. Exit 1: it does.
        let diff = self.git(&["diff", "--cached", "--quiet", "--", path_arg.as_ref()])?;
        match diff.status.code() {
            Some(0) => {
                log::info!("snapshot unchanged, nothing to push");
                return Ok(PublishOutcome::NothingToCommit);
            }
            Some(1) => {}
            _ => Self::check("diff", &diff)?,
        }

        // The pathspec keeps unrelated staged files out of the commit.
        let message = Self::commit_message(at);
        let commit = self.git(&["commit", "-m", &message, "--", path_arg.as_ref()])?;
        Self::check("commit", &commit)?;

        let push = self.git(&["push"])?;
        Self::check("push", &push)?;
        Ok(PublishOutcome::Pushed)
    }
}

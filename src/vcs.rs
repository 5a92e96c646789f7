//! Version control for the dotfiles working copy.
//!
//! [`VersionControl`] is the seam the sync engine and `init` talk to;
//! [`GitCli`] implements it by shelling out to `git` through an
//! [`Executor`].
use std::path::PathBuf;

use crate::error::VcsError;
use crate::exec::{ExecResult, Executor};

/// Message attached to stash entries created by `dot sync`.
pub const STASH_MESSAGE: &str = "dot sync: local changes";

/// Operations `dot` needs from a version-control system.
pub trait VersionControl: std::fmt::Debug {
    /// Returns `true` if the working copy is a repository.
    fn is_repository(&self) -> bool;

    /// Create a new, empty repository in the working copy.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::Command`] if initialisation fails.
    fn init(&self) -> Result<(), VcsError>;

    /// Returns `true` if tracked files have uncommitted modifications.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::Command`] if the status cannot be read.
    fn has_local_changes(&self) -> Result<bool, VcsError>;

    /// Stash tracked modifications with `message`.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::Command`] if the stash cannot be created.
    fn stash_push(&self, message: &str) -> Result<(), VcsError>;

    /// Fast-forward from `remote` (optionally a specific `branch`).
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::Command`] on any pull failure.
    fn pull(&self, remote: &str, branch: Option<&str>) -> Result<(), VcsError>;

    /// Re-apply and drop the most recent stash entry.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::StashConflict`] if the changes conflict (the
    /// entry is kept), or [`VcsError::Command`] for other failures.
    fn stash_pop(&self) -> Result<(), VcsError>;
}

/// [`VersionControl`] backed by the `git` command-line client.
#[derive(Debug)]
pub struct GitCli<'a> {
    executor: &'a dyn Executor,
    dir: PathBuf,
}

impl<'a> GitCli<'a> {
    /// Operate on the working copy at `dir`.
    #[must_use]
    pub fn new(executor: &'a dyn Executor, dir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            dir: dir.into(),
        }
    }

    fn git(&self, operation: &str, args: &[&str]) -> Result<ExecResult, VcsError> {
        self.executor
            .run_in_unchecked(&self.dir, "git", args)
            .map_err(|e| command_error(operation, &format!("{e:#}")))
    }

    fn git_checked(&self, operation: &str, args: &[&str]) -> Result<ExecResult, VcsError> {
        let result = self.git(operation, args)?;
        if result.success {
            Ok(result)
        } else {
            Err(command_error(operation, failure_message(&result)))
        }
    }
}

fn command_error(operation: &str, message: &str) -> VcsError {
    VcsError::Command {
        operation: operation.to_string(),
        message: message.to_string(),
    }
}

/// Trimmed stderr, falling back to stdout when git wrote nothing to stderr.
fn failure_message(result: &ExecResult) -> &str {
    let stderr = result.stderr.trim();
    if stderr.is_empty() {
        result.stdout.trim()
    } else {
        stderr
    }
}

impl VersionControl for GitCli<'_> {
    fn is_repository(&self) -> bool {
        self.dir.join(".git").exists()
    }

    fn init(&self) -> Result<(), VcsError> {
        self.git_checked("init", &["init"]).map(|_| ())
    }

    fn has_local_changes(&self) -> Result<bool, VcsError> {
        let result =
            self.git_checked("status", &["status", "--porcelain", "--untracked-files=no"])?;
        Ok(!result.stdout.trim().is_empty())
    }

    fn stash_push(&self, message: &str) -> Result<(), VcsError> {
        self.git_checked("stash push", &["stash", "push", "-m", message])
            .map(|_| ())
    }

    fn pull(&self, remote: &str, branch: Option<&str>) -> Result<(), VcsError> {
        let mut args = vec!["pull", "--ff-only", remote];
        args.extend(branch);
        self.git_checked("pull", &args).map(|_| ())
    }

    fn stash_pop(&self) -> Result<(), VcsError> {
        let result = self.git("stash pop", &["stash", "pop"])?;
        if result.success {
            return Ok(());
        }
        if result.stdout.contains("CONFLICT") || result.stderr.contains("CONFLICT") {
            return Err(VcsError::StashConflict {
                message: failure_message(&result).to_string(),
            });
        }
        Err(command_error("stash pop", failure_message(&result)))
    }
}

/// Scripted [`VersionControl`] for unit tests.
///
/// Records each operation by name and fails the ones configured with
/// [`fail`](Self::fail).
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FakeVcs {
    /// Whether the working copy counts as a repository.
    pub repository: bool,
    /// Whether tracked files are modified.
    pub dirty: bool,
    failures: std::collections::HashMap<&'static str, VcsError>,
    calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FakeVcs {
    /// A clean repository on which every operation succeeds.
    #[must_use]
    pub fn clean() -> Self {
        Self {
            repository: true,
            ..Self::default()
        }
    }

    /// A repository with uncommitted tracked changes.
    #[must_use]
    pub fn dirty() -> Self {
        Self {
            repository: true,
            dirty: true,
            ..Self::default()
        }
    }

    /// Make `operation` (`init`, `status`, `stash push`, `pull`,
    /// `stash pop`) fail with `error`.
    #[must_use]
    pub fn fail(mut self, operation: &'static str, error: VcsError) -> Self {
        self.failures.insert(operation, error);
        self
    }

    /// Operations performed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("fake vcs log poisoned").clone()
    }

    fn record(&self, operation: &'static str, detail: String) -> Result<(), VcsError> {
        self.calls
            .lock()
            .expect("fake vcs log poisoned")
            .push(detail);
        self.failures
            .get(operation)
            .map_or(Ok(()), |e| Err(e.clone()))
    }
}

#[cfg(test)]
impl VersionControl for FakeVcs {
    fn is_repository(&self) -> bool {
        self.repository
    }

    fn init(&self) -> Result<(), VcsError> {
        self.record("init", "init".to_string())
    }

    fn has_local_changes(&self) -> Result<bool, VcsError> {
        self.record("status", "status".to_string())
            .map(|()| self.dirty)
    }

    fn stash_push(&self, message: &str) -> Result<(), VcsError> {
        self.record("stash push", format!("stash push {message}"))
    }

    fn pull(&self, remote: &str, branch: Option<&str>) -> Result<(), VcsError> {
        let detail = branch.map_or_else(
            || format!("pull {remote}"),
            |b| format!("pull {remote} {b}"),
        );
        self.record("pull", detail)
    }

    fn stash_pop(&self) -> Result<(), VcsError> {
        self.record("stash pop", "stash pop".to_string())
    }
}

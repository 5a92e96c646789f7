//! Domain-specific error types for `dot`.
//!
//! Internal modules return typed errors while command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DotError
//! ├── Install(InstallError)   backup, mkdir and copy failures
//! └── Vcs(VcsError)           git failures and stash conflicts
//!
//! SyncError: wraps a DotError with the sync state that was reached
//! DependencyError: required tools missing from PATH
//! ```
//!
//! Invalid commands and arguments never reach this layer; they are rejected
//! by `clap` before dispatch.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::sync::SyncState;

/// Failures of the steps a sync runs: pulling and reinstalling.
#[derive(Error, Debug)]
pub enum DotError {
    /// Installing a configuration directory failed.
    #[error(transparent)]
    Install(#[from] InstallError),

    /// A version-control operation failed.
    #[error(transparent)]
    Vcs(#[from] VcsError),
}

/// Errors reported by the dependency checker.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DependencyError {
    /// Every tool in `tools` could not be resolved on `PATH`.
    #[error("missing required tools: {}", .tools.join(", "))]
    Missing {
        /// Names of all missing executables, in check order.
        tools: Vec<String>,
    },
}

/// Errors that arise while installing a configuration directory.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The bundled configuration source does not exist.
    #[error("configuration source not found: {}", .path.display())]
    SourceMissing {
        /// Expected source directory.
        path: PathBuf,
    },

    /// Renaming the existing configuration out of the way failed.
    #[error("cannot back up {} to {}", .target.display(), .backup.display())]
    Backup {
        /// Installed directory that should have been moved.
        target: PathBuf,
        /// Backup path that was attempted.
        backup: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Creating the fresh target directory failed.
    #[error("cannot create {}", .path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Copying the source tree failed partway; the target may be incomplete.
    #[error("copying into {} failed{}", .target.display(), backup_hint(.backup.as_deref()))]
    Copy {
        /// Partially populated target directory.
        target: PathBuf,
        /// Backup of the previous configuration, if one was made.
        backup: Option<PathBuf>,
        /// Underlying I/O error.
        source: io::Error,
    },
}

fn backup_hint(backup: Option<&Path>) -> String {
    backup.map_or_else(String::new, |b| {
        format!(" (previous configuration kept at {})", b.display())
    })
}

/// Errors that arise from version-control operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VcsError {
    /// The working copy is not a git repository.
    #[error("{} is not a git repository", .path.display())]
    NotARepository {
        /// Directory that was expected to be a working copy.
        path: PathBuf,
    },

    /// A git subcommand failed or could not be started.
    #[error("git {operation} failed: {message}")]
    Command {
        /// The git operation, e.g. `pull`.
        operation: String,
        /// Trimmed stderr or spawn error.
        message: String,
    },

    /// `git stash pop` conflicted with freshly pulled content.
    #[error(
        "restoring stashed changes conflicted; the stash entry was kept for manual recovery: {message}"
    )]
    StashConflict {
        /// Trimmed stderr from git.
        message: String,
    },
}

/// A sync run that halted before completion.
#[derive(Error, Debug)]
#[error("sync stopped after reaching '{state}'")]
pub struct SyncError {
    /// Last state the sync sequence reached successfully.
    pub state: SyncState,
    /// The failure that halted the sequence.
    #[source]
    pub source: DotError,
}

impl SyncError {
    /// Wrap `source` as a failure after `state`.
    pub fn at(state: SyncState, source: impl Into<DotError>) -> Self {
        Self {
            state,
            source: source.into(),
        }
    }
}

//! Sync engine: stash, pull, restore, reinstall.
use std::fmt;

use crate::config::Layout;
use crate::config::settings::SyncSettings;
use crate::error::{SyncError, VcsError};
use crate::installer::{ConfigInstaller, InstallOutcome};
use crate::logging::Log;
use crate::target::Target;
use crate::vcs::{STASH_MESSAGE, VersionControl};

/// Progress of one sync run.
///
/// ```text
/// NotStarted → RepoChecked → [Stashed] → Pulled → [Unstashed] → Installed
/// ```
///
/// `Stashed` and `Unstashed` are only visited when tracked files had
/// uncommitted changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Nothing has happened yet.
    NotStarted,
    /// The working copy is a repository.
    RepoChecked,
    /// Local changes were stashed.
    Stashed,
    /// Remote changes were pulled.
    Pulled,
    /// Stashed changes were restored.
    Unstashed,
    /// Every requested target was installed.
    Installed,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "not started",
            Self::RepoChecked => "repo checked",
            Self::Stashed => "stashed",
            Self::Pulled => "pulled",
            Self::Unstashed => "unstashed",
            Self::Installed => "installed",
        };
        f.write_str(s)
    }
}

/// What a completed sync did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Whether local changes were stashed (and restored).
    pub stashed: bool,
    /// One outcome per installed target.
    pub installs: Vec<InstallOutcome>,
    /// Every state visited, in order.
    pub trail: Vec<SyncState>,
}

/// Drives a sync run over the dotfiles working copy.
#[derive(Debug)]
pub struct SyncEngine<'a> {
    vcs: &'a dyn VersionControl,
    installer: &'a ConfigInstaller<'a>,
    layout: &'a Layout,
    settings: &'a SyncSettings,
    log: &'a dyn Log,
}

impl<'a> SyncEngine<'a> {
    /// Wire the engine to its collaborators.
    #[must_use]
    pub fn new(
        vcs: &'a dyn VersionControl,
        installer: &'a ConfigInstaller<'a>,
        layout: &'a Layout,
        settings: &'a SyncSettings,
        log: &'a dyn Log,
    ) -> Self {
        Self {
            vcs,
            installer,
            layout,
            settings,
            log,
        }
    }

    /// Sync the working copy and install `targets`.
    ///
    /// No compensation is attempted: a failure leaves the working copy and
    /// installed directories wherever the sequence stopped.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] carrying the last state reached.
    pub fn run(&self, targets: &[Target]) -> Result<SyncReport, SyncError> {
        let mut state = SyncState::NotStarted;
        let mut trail = vec![state];

        if !self.vcs.is_repository() {
            return Err(SyncError::at(
                state,
                VcsError::NotARepository {
                    path: self.layout.root.clone(),
                },
            ));
        }
        state = SyncState::RepoChecked;
        trail.push(state);

        let dirty = self
            .vcs
            .has_local_changes()
            .map_err(|e| SyncError::at(state, e))?;
        if dirty {
            self.log.info("stashing local changes");
            self.vcs
                .stash_push(STASH_MESSAGE)
                .map_err(|e| SyncError::at(state, e))?;
            state = SyncState::Stashed;
            trail.push(state);
        }

        let remote = self.settings.remote.as_str();
        let branch = self.settings.branch.as_deref();
        self.log.info(&format!(
            "pulling from {remote}{}",
            branch.map_or_else(String::new, |b| format!(" ({b})"))
        ));
        if let Err(e) = self.vcs.pull(remote, branch) {
            if dirty {
                self.log.warn(&format!(
                    "local changes remain stashed; run `git stash pop` in {} to restore them",
                    self.layout.root.display()
                ));
            }
            return Err(SyncError::at(state, e));
        }
        state = SyncState::Pulled;
        trail.push(state);

        if dirty {
            self.vcs
                .stash_pop()
                .map_err(|e| SyncError::at(state, e))?;
            self.log.info("restored local changes");
            state = SyncState::Unstashed;
            trail.push(state);
        }

        let mut installs = Vec::with_capacity(targets.len());
        for &target in targets {
            let outcome = self
                .installer
                .install(
                    &self.layout.source_dir(target),
                    &self.layout.install_dir(target),
                )
                .map_err(|e| SyncError::at(state, e))?;
            installs.push(outcome);
        }
        state = SyncState::Installed;
        trail.push(state);

        Ok(SyncReport {
            stashed: dirty,
            installs,
            trail,
        })
    }
}

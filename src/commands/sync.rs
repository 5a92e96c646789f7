//! `dot sync`: pull the dotfiles repository and reinstall.
use anyhow::Result;

use super::Context;
use crate::installer::ConfigInstaller;
use crate::sync::{SyncEngine, SyncReport};
use crate::target::Target;
use crate::vcs::{GitCli, VersionControl};

/// Run the sync command against the git working copy at the dotfiles root.
///
/// # Errors
///
/// Returns the [`SyncError`](crate::error::SyncError) describing where the
/// sequence stopped.
pub fn run(ctx: &Context<'_>, target: Option<Target>) -> Result<()> {
    let git = GitCli::new(ctx.executor, &ctx.config.layout.root);
    run_with(ctx, &git, target).map(|_| ())
}

/// Run a sync with an explicit version-control backend.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(
    ctx: &Context<'_>,
    vcs: &dyn VersionControl,
    target: Option<Target>,
) -> Result<SyncReport> {
    let targets = target.map_or_else(|| Target::ALL.to_vec(), |t| vec![t]);
    let names: Vec<&str> = targets.iter().map(|t| t.name()).collect();
    ctx.log.stage(&format!("Syncing {}", names.join(", ")));

    let installer = ConfigInstaller::new(ctx.fs, ctx.log);
    let engine = SyncEngine::new(
        vcs,
        &installer,
        &ctx.config.layout,
        &ctx.config.settings.sync,
        ctx.log,
    );
    let report = engine.run(&targets)?;

    ctx.log.debug(&format!(
        "states: {}",
        report
            .trail
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    ));
    ctx.log
        .info(&format!("synced {} target(s)", report.installs.len()));
    Ok(report)
}

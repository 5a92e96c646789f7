//! `dot install` and `dot update`.
use anyhow::{Context as _, Result};

use super::Context;
use crate::installer::{ConfigInstaller, InstallOutcome};
use crate::target::Target;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the source is missing or any backup/copy step fails.
pub fn run(ctx: &Context<'_>, target: Target) -> Result<()> {
    ctx.log.stage(&format!("Installing {target}"));
    install_target(ctx, target).map(|_| ())
}

/// Run the update command: reinstall from the current checkout.
///
/// # Errors
///
/// Same as [`run`].
pub fn update(ctx: &Context<'_>, target: Target) -> Result<()> {
    ctx.log.stage(&format!("Updating {target}"));
    install_target(ctx, target).map(|_| ())
}

fn install_target(ctx: &Context<'_>, target: Target) -> Result<InstallOutcome> {
    let layout = &ctx.config.layout;
    let outcome = ConfigInstaller::new(ctx.fs, ctx.log)
        .install(&layout.source_dir(target), &layout.install_dir(target))
        .with_context(|| format!("installing {target}"))?;
    if outcome.backup.is_none() {
        ctx.log.debug("no previous configuration to back up");
    }
    Ok(outcome)
}

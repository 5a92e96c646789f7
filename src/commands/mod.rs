//! Top-level subcommand orchestration.
//!
//! Each submodule exposes a `run` function taking a [`Context`]; [`dispatch`]
//! routes a parsed [`Command`] to it.
pub mod config;
pub mod doctor;
pub mod init;
pub mod install;
pub mod sync;

use anyhow::Result;
use std::io::Write;

use crate::cli::{Command, ConfigCommand};
use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Log;
use crate::operations::FileSystemOps;
use crate::platform::Platform;

/// Shared state handed to every command.
///
/// Holds the loaded configuration, the detected platform and the
/// capabilities commands use for side effects, so tests can substitute
/// fakes for any of them.
#[derive(Debug)]
pub struct Context<'a> {
    /// Layout and settings.
    pub config: &'a Config,
    /// Detected operating system and package manager.
    pub platform: &'a Platform,
    /// Log sink.
    pub log: &'a dyn Log,
    /// Process runner.
    pub executor: &'a dyn Executor,
    /// Filesystem primitives.
    pub fs: &'a dyn FileSystemOps,
}

/// Run `command`, writing any command output (as opposed to log messages)
/// to `out`.
///
/// # Errors
///
/// Returns the command's error; `doctor` never fails.
pub fn dispatch(command: &Command, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Init { minimal } => init::run(ctx, *minimal),
        Command::Install(opts) => install::run(ctx, opts.target),
        Command::Update(opts) => install::update(ctx, opts.target),
        Command::Config(ConfigCommand::Edit(opts)) => config::edit(ctx, opts.target),
        Command::Config(ConfigCommand::Show(opts)) => config::show(ctx, opts.target, out),
        Command::Sync { target } => sync::run(ctx, *target),
        Command::Doctor => doctor::run(ctx, out),
    }
}

//! Command-line interface definition.
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::target::Target;

/// Version reported by `dot --version` and written to log headers.
///
/// The build script embeds `git describe` output as `DOT_VERSION`; builds
/// outside a checkout fall back to the crate version.
pub const VERSION: &str = match option_env!("DOT_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Top-level CLI entry point for `dot`.
#[derive(Parser, Debug)]
#[command(
    name = "dot",
    about = "Install, sync and check a personal Neovim configuration",
    version = VERSION,
    disable_version_flag = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Options accepted before or after any subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Show debug output
    #[arg(
        long,
        global = true,
        env = "DOT_DEBUG",
        hide_env_values = true,
        value_parser = FalseyValueParser::new()
    )]
    pub debug: bool,

    /// Disable coloured output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        hide_env_values = true,
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Override dotfiles root directory
    #[arg(
        long,
        global = true,
        env = "DOTFILES_DIR",
        hide_env_values = true,
        value_name = "DIR"
    )]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the dotfiles skeleton and initialise a git repository
    Init {
        /// Only create directories; write no starter files
        #[arg(long)]
        minimal: bool,
    },
    /// Install a configuration, backing up the current one
    Install(TargetOpts),
    /// Edit or show a configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Reinstall a configuration from the dotfiles checkout
    Update(TargetOpts),
    /// Pull the dotfiles repository and reinstall
    Sync {
        /// Target to reinstall after pulling (default: all)
        #[arg(value_enum)]
        target: Option<Target>,
    },
    /// Check dependencies and configuration health
    Doctor,
}

impl Command {
    /// Short name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Install(_) => "install",
            Self::Config(_) => "config",
            Self::Update(_) => "update",
            Self::Sync { .. } => "sync",
            Self::Doctor => "doctor",
        }
    }
}

/// `dot config` actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Open the tracked entry file in $EDITOR
    Edit(TargetOpts),
    /// Print the installed entry file
    Show(TargetOpts),
}

/// A single required target argument.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct TargetOpts {
    /// Configuration target
    #[arg(value_enum)]
    pub target: Target,
}

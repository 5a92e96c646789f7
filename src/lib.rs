//! Personal dotfiles manager.
//!
//! `dot` copies a bundled Neovim configuration into place, backs up whatever
//! was installed before, and shells out to `git` to keep the dotfiles
//! checkout in sync across machines.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: directory layout and the optional `dot.toml` settings
//! - **[`exec`]**, **[`operations`]**, **[`vcs`]**: capability traits for
//!   processes, the filesystem and version control
//! - **[`deps`]**, **[`installer`]**, **[`sync`]**: the core operations
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod deps;
pub mod error;
pub mod exec;
pub mod installer;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod sync;
pub mod target;
pub mod vcs;

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for installing a configuration on the real filesystem.
//!
//! These cover the installer's observable contract: the installed tree
//! mirrors the source, previous configurations survive as timestamped
//! backups, and a missing source changes nothing.

mod common;

use common::*;
use dot_cli::error::InstallError;
use dot_cli::installer::ConfigInstaller;
use dot_cli::logging::{Level, MemoryLog};
use dot_cli::operations::SystemFileSystemOps;
use dot_cli::target::Target;

const SOURCE_FILES: &[(&str, &str)] = &[
    ("init.lua", "require('core')\n"),
    ("lua/core.lua", "vim.opt.number = true\n"),
    ("lua/plugins/init.lua", "return {}\n"),
];

#[test]
fn installed_tree_matches_source() {
    let ctx = IntegrationTestContext::new();
    let source = ctx.seed_source(Target::Nvim, SOURCE_FILES);
    let target = ctx.layout().install_dir(Target::Nvim);
    let log = MemoryLog::new();

    let outcome = ConfigInstaller::new(&SystemFileSystemOps, &log)
        .install(&source, &target)
        .unwrap();

    assert_eq!(outcome.target, target);
    assert_eq!(outcome.backup, None);
    assert_eq!(read_tree(&target), read_tree(&source));
    assert!(log.contains(Level::Info, "installed"));
}

#[test]
fn previous_configuration_is_preserved_byte_for_byte() {
    let ctx = IntegrationTestContext::new();
    let source = ctx.seed_source(Target::Nvim, SOURCE_FILES);
    let previous = ctx.seed_installed(
        Target::Nvim,
        &[("init.lua", "-- hand written\n"), ("after/ftplugin/lua.lua", "x\n")],
    );
    let before = read_tree(&previous);
    let log = MemoryLog::new();

    let outcome = ConfigInstaller::new(&SystemFileSystemOps, &log)
        .install(&source, &previous)
        .unwrap();

    let backup = outcome.backup.expect("backup created");
    assert_eq!(read_tree(&backup), before);
    assert_eq!(read_tree(&previous), read_tree(&source));
    let name = backup.file_name().unwrap().to_string_lossy().to_string();
    let stamp = name.strip_prefix("nvim.backup.").expect("backup prefix");
    assert_eq!(stamp.len(), "YYYYMMDD_HHMMSS".len());
    assert_eq!(stamp.as_bytes()[8], b'_');
}

#[test]
fn repeated_installs_converge_and_keep_every_backup() {
    let ctx = IntegrationTestContext::new();
    let source = ctx.seed_source(Target::Nvim, SOURCE_FILES);
    let target = ctx.layout().install_dir(Target::Nvim);
    ctx.seed_installed(Target::Nvim, &[("init.lua", "old\n")]);
    let log = MemoryLog::new();
    let installer = ConfigInstaller::new(&SystemFileSystemOps, &log);

    let first = installer.install(&source, &target).unwrap();
    let second = installer.install(&source, &target).unwrap();

    assert_ne!(first.backup, second.backup);
    assert_eq!(ctx.backups(Target::Nvim).len(), 2);
    assert_eq!(read_tree(&target), read_tree(&source));
    let second_backup = second.backup.expect("second backup");
    assert_eq!(read_tree(&second_backup), read_tree(&source));
}

#[test]
fn missing_source_leaves_installed_configuration_alone() {
    let ctx = IntegrationTestContext::new();
    let installed = ctx.seed_installed(Target::Nvim, &[("init.lua", "keep me\n")]);
    let before = read_tree(&installed);
    let log = MemoryLog::new();

    let err = ConfigInstaller::new(&SystemFileSystemOps, &log)
        .install(&ctx.layout().source_dir(Target::Nvim), &installed)
        .unwrap_err();

    assert!(matches!(err, InstallError::SourceMissing { .. }));
    assert_eq!(read_tree(&installed), before);
    assert!(ctx.backups(Target::Nvim).is_empty());
}

#[test]
fn git_metadata_is_not_installed() {
    let ctx = IntegrationTestContext::new();
    let source = ctx.seed_source(
        Target::Nvim,
        &[("init.lua", "x\n"), (".git/HEAD", "ref: refs/heads/main\n")],
    );
    let target = ctx.layout().install_dir(Target::Nvim);
    let log = MemoryLog::new();

    ConfigInstaller::new(&SystemFileSystemOps, &log)
        .install(&source, &target)
        .unwrap();

    assert!(target.join("init.lua").is_file());
    assert!(!target.join(".git").exists());
}

#[cfg(unix)]
#[test]
fn dangling_symlink_at_target_is_moved_aside() {
    let ctx = IntegrationTestContext::new();
    let source = ctx.seed_source(Target::Nvim, SOURCE_FILES);
    let target = ctx.layout().install_dir(Target::Nvim);
    std::fs::create_dir_all(target.parent().unwrap()).unwrap();
    let stale = ctx.dir.path().join("old-dotfiles/config/nvim");
    std::os::unix::fs::symlink(&stale, &target).unwrap();
    let log = MemoryLog::new();

    let outcome = ConfigInstaller::new(&SystemFileSystemOps, &log)
        .install(&source, &target)
        .unwrap();

    let backup = outcome.backup.expect("link moved to a backup");
    assert_eq!(std::fs::read_link(&backup).unwrap(), stale);
    assert!(!target.symlink_metadata().unwrap().file_type().is_symlink());
    assert_eq!(read_tree(&target), read_tree(&source));
}

#[cfg(unix)]
#[test]
fn symlinks_in_source_are_installed_as_links() {
    let ctx = IntegrationTestContext::new();
    let source = ctx.seed_source(Target::Nvim, &[("init.lua", "x\n")]);
    std::os::unix::fs::symlink("missing.lua", source.join("stale.lua")).unwrap();
    std::os::unix::fs::symlink(&source, source.join("self")).unwrap();
    let target = ctx.layout().install_dir(Target::Nvim);
    let log = MemoryLog::new();

    ConfigInstaller::new(&SystemFileSystemOps, &log)
        .install(&source, &target)
        .unwrap();

    assert_eq!(
        std::fs::read_link(target.join("stale.lua")).unwrap(),
        std::path::PathBuf::from("missing.lua")
    );
    assert_eq!(std::fs::read_link(target.join("self")).unwrap(), source);
    assert!(target.join("init.lua").is_file());
}

// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed dotfiles checkout and config home so
// each integration test can set up an isolated environment without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use dot_cli::config::Layout;
use dot_cli::target::Target;

/// An isolated dotfiles root and config home backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory holding `dotfiles/` and `home/.config/`.
    pub dir: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create an empty context; nothing exists under the root yet.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Dotfiles root.
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("dotfiles")
    }

    /// Layout pointing at this context's root and config home.
    pub fn layout(&self) -> Layout {
        Layout::new(self.root(), self.dir.path().join("home/.config"))
    }

    /// Write `files` (relative path, contents) under the source dir of `target`.
    pub fn seed_source(&self, target: Target, files: &[(&str, &str)]) -> PathBuf {
        let source = self.layout().source_dir(target);
        write_files(&source, files);
        source
    }

    /// Write `files` under the installed dir of `target`.
    pub fn seed_installed(&self, target: Target, files: &[(&str, &str)]) -> PathBuf {
        let installed = self.layout().install_dir(target);
        write_files(&installed, files);
        installed
    }

    /// Names of `<target>.backup.*` siblings of the installed directory.
    pub fn backups(&self, target: Target) -> Vec<PathBuf> {
        let installed = self.layout().install_dir(target);
        let Some(parent) = installed.parent() else {
            return Vec::new();
        };
        let prefix = format!("{}.backup.", target.name());
        let mut found: Vec<PathBuf> = std::fs::read_dir(parent)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
                    .map(|e| e.path())
                    .collect()
            })
            .unwrap_or_default();
        found.sort();
        found
    }
}

/// Create each file (and its parent directories) under `dir`.
pub fn write_files(dir: &Path, files: &[(&str, &str)]) {
    std::fs::create_dir_all(dir).expect("create dir");
    for (rel, contents) in files {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, contents).expect("write file");
    }
}

/// Every regular file under `dir` keyed by relative path, skipping `.git`.
pub fn read_tree(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in std::fs::read_dir(dir).expect("read dir") {
            let path = entry.expect("dir entry").path();
            if path.file_name().is_some_and(|n| n == ".git") {
                continue;
            }
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).expect("under root").to_path_buf();
                out.insert(rel, std::fs::read(&path).expect("read file"));
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(dir, dir, &mut out);
    out
}

/// Returns `true` if a `git` binary is on `PATH`.
pub fn git_available() -> bool {
    which::which("git").is_ok()
}

/// Run git in `dir` with a fixed identity, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=dot tests",
            "-c",
            "user.email=dot@example.invalid",
            "-c",
            "init.defaultBranch=main",
            "-c",
            "advice.detachedHead=false",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("spawn git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

//! Filesystem layout: where sources live and where they are installed.
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::target::Target;

/// Directory under the dotfiles root holding the per-target sources.
const SOURCE_DIR: &str = "config";

/// Resolved directories for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Dotfiles repository root (the git working copy).
    pub root: PathBuf,
    /// Base directory configurations are installed into.
    pub config_home: PathBuf,
}

impl Layout {
    /// Create a layout with explicit directories.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config_home: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_home: config_home.into(),
        }
    }

    /// Resolve the layout from the `--root` override and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn resolve(root_override: Option<&Path>) -> Result<Self> {
        let home = dirs::home_dir();
        let root = match root_override {
            Some(root) => root.to_path_buf(),
            None => match root_near_executable() {
                Some(root) => root,
                None => home.as_ref().map(|h| h.join(".dotfiles")).context(
                    "cannot determine dotfiles root: no home directory. \
                     Use --root or set DOTFILES_DIR",
                )?,
            },
        };
        let config_home = config_home_from(std::env::var_os("XDG_CONFIG_HOME"), home)
            .context("cannot determine config directory: set XDG_CONFIG_HOME or HOME")?;
        Ok(Self { root, config_home })
    }

    /// Directory holding the bundled sources for `target`.
    #[must_use]
    pub fn source_dir(&self, target: Target) -> PathBuf {
        self.root.join(SOURCE_DIR).join(target.name())
    }

    /// Live installed directory for `target`.
    #[must_use]
    pub fn install_dir(&self, target: Target) -> PathBuf {
        self.config_home.join(target.name())
    }

    /// Path of the settings file.
    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.root.join("dot.toml")
    }
}

/// `$XDG_CONFIG_HOME` when set and non-empty, else `<home>/.config`.
fn config_home_from(xdg: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    match xdg {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => home.map(|h| h.join(".config")),
    }
}

/// Look for a checkout that contains the running binary.
fn root_near_executable() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let parent = exe.parent()?;
    find_root_from(parent)
}

fn find_root_from(bin_dir: &Path) -> Option<PathBuf> {
    let candidates = [
        bin_dir.join("../.."), // target/release/ → repo root
        bin_dir.join(".."),    // bin/ → repo root
    ];
    candidates
        .iter()
        .find(|c| c.join(SOURCE_DIR).is_dir())
        .and_then(|c| dunce::canonicalize(c).ok())
}

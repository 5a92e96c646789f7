//! Configuration targets managed by `dot`.
use std::fmt;

/// A bundled configuration that can be installed, shown, edited and synced.
///
/// Closed set: adding a target means adding a variant, and every `match`
/// over targets must handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Target {
    /// Neovim editor configuration (`config/nvim` → `~/.config/nvim`).
    Nvim,
}

impl Target {
    /// Every known target, in install order.
    pub const ALL: &'static [Self] = &[Self::Nvim];

    /// Directory name under both the source tree and the config home.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nvim => "nvim",
        }
    }

    /// Entry-point file shown and edited by `dot config`.
    #[must_use]
    pub const fn config_file(self) -> &'static str {
        match self {
            Self::Nvim => "init.lua",
        }
    }

    /// Untracked, machine-local override file loaded by the configuration.
    #[must_use]
    pub const fn local_override(self) -> &'static str {
        match self {
            Self::Nvim => "local.lua",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

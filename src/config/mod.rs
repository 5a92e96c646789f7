//! Configuration: directory layout and the optional `dot.toml` settings file.
pub mod layout;
pub mod settings;
pub mod toml_loader;

use anyhow::Result;
use std::path::Path;

pub use layout::Layout;
pub use settings::Settings;

/// Everything a command needs to know about where things live and how the
/// user wants them handled.
#[derive(Debug, Clone)]
pub struct Config {
    /// Resolved directories.
    pub layout: Layout,
    /// Parsed `dot.toml` (defaults when absent).
    pub settings: Settings,
}

impl Config {
    /// Resolve the layout and load `dot.toml` from the dotfiles root.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout cannot be resolved or the settings file
    /// exists but is malformed.
    pub fn load(root_override: Option<&Path>) -> Result<Self> {
        let layout = Layout::resolve(root_override)?;
        Self::load_from(layout)
    }

    /// Load settings for an already-resolved layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but is malformed.
    pub fn load_from(layout: Layout) -> Result<Self> {
        let settings = toml_loader::load_config(&layout.settings_file())?;
        Ok(Self { layout, settings })
    }
}

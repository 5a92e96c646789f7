//! User settings read from `dot.toml` at the dotfiles root.
use serde::Deserialize;

/// Editor binary used when neither `dot.toml` nor `$EDITOR` name one.
pub const DEFAULT_EDITOR: &str = "nvim";

/// Contents of `dot.toml`. Every field is optional.
///
/// ```toml
/// editor = "nvim"
///
/// [sync]
/// remote = "origin"
/// branch = "main"
///
/// [doctor]
/// required = ["git", "curl"]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Editor binary checked by `doctor` and used for `config edit` when
    /// `$EDITOR` is unset.
    pub editor: String,
    /// Options for `dot sync`.
    pub sync: SyncSettings,
    /// Options for `dot doctor` and the init-time dependency check.
    pub doctor: DoctorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: DEFAULT_EDITOR.to_string(),
            sync: SyncSettings::default(),
            doctor: DoctorSettings::default(),
        }
    }
}

impl Settings {
    /// Every executable that must be on `PATH`: the configured list plus the
    /// editor, without duplicates.
    #[must_use]
    pub fn required_tools(&self) -> Vec<String> {
        let mut tools = self.doctor.required.clone();
        if !tools.iter().any(|t| *t == self.editor) {
            tools.push(self.editor.clone());
        }
        tools
    }
}

/// `[sync]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSettings {
    /// Remote to pull from.
    pub remote: String,
    /// Branch to pull; `None` pulls the current branch's upstream.
    pub branch: Option<String>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: None,
        }
    }
}

/// `[doctor]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DoctorSettings {
    /// Executables that must be resolvable on `PATH` (the editor is implied).
    pub required: Vec<String>,
}

impl Default for DoctorSettings {
    fn default() -> Self {
        Self {
            required: vec!["git".to_string(), "curl".to_string()],
        }
    }
}

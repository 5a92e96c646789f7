//! Operating system detection and package-manager hints.
use std::fmt;
use std::path::Path;

/// Detected operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux (any distribution).
    Linux,
    /// macOS.
    MacOs,
    /// Windows.
    Windows,
    /// Anything else (BSDs, etc.).
    Other,
}

impl Os {
    /// Map a `std::env::consts::OS` style identifier to an [`Os`].
    #[must_use]
    pub fn from_identifier(id: &str) -> Self {
        match id {
            "linux" => Self::Linux,
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// System package manager used for install hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Homebrew (`brew`).
    Brew,
    /// Debian/Ubuntu (`apt-get`).
    Apt,
    /// Arch Linux (`pacman`).
    Pacman,
}

impl PackageManager {
    /// Package name for `tool` under this manager.
    fn package_for(tool: &str) -> &str {
        // Every supported manager ships Neovim as `neovim`.
        if tool == "nvim" { "neovim" } else { tool }
    }

    /// Shell command that installs `tool`.
    #[must_use]
    pub fn install_command(self, tool: &str) -> String {
        let package = Self::package_for(tool);
        match self {
            Self::Brew => format!("brew install {package}"),
            Self::Apt => format!("sudo apt-get install -y {package}"),
            Self::Pacman => format!("sudo pacman -S {package}"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// Package manager to suggest, if one could be identified.
    pub package_manager: Option<PackageManager>,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        let os = Os::from_identifier(std::env::consts::OS);
        Self {
            os,
            package_manager: Self::detect_package_manager(os, Path::new("/etc")),
        }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(os: Os, package_manager: Option<PackageManager>) -> Self {
        Self {
            os,
            package_manager,
        }
    }

    /// Suggest a command that installs `tool`, if a package manager is known.
    #[must_use]
    pub fn install_hint(&self, tool: &str) -> Option<String> {
        self.package_manager.map(|pm| pm.install_command(tool))
    }

    fn detect_package_manager(os: Os, etc: &Path) -> Option<PackageManager> {
        match os {
            Os::MacOs => Some(PackageManager::Brew),
            Os::Linux if etc.join("arch-release").exists() => Some(PackageManager::Pacman),
            Os::Linux if etc.join("debian_version").exists() => Some(PackageManager::Apt),
            _ => None,
        }
    }
}

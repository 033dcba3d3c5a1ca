use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::profile::{DEFAULT_GAME, DEFAULT_PROFILE_VERSION};

/// Launcher configuration loaded from `~/.modorder/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Directory settings from `[paths]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_mods_dir", rename = "mods-dir")]
    pub mods_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            mods_dir: default_mods_dir(),
        }
    }
}

fn default_mods_dir() -> PathBuf {
    PathBuf::from("Mods")
}

/// Profile settings from `[profile]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_profile_file")]
    pub file: String,
    #[serde(default = "default_profile_version")]
    pub version: String,
    #[serde(default = "default_game")]
    pub game: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            file: default_profile_file(),
            version: default_profile_version(),
            game: default_game(),
        }
    }
}

fn default_profile_file() -> String {
    "current.me3".to_string()
}

fn default_profile_version() -> String {
    DEFAULT_PROFILE_VERSION.to_string()
}

fn default_game() -> String {
    DEFAULT_GAME.to_string()
}

/// External registry settings from `[registry]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_file")]
    pub file: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            file: default_registry_file(),
        }
    }
}

fn default_registry_file() -> String {
    "external_mods.json".to_string()
}

impl LauncherConfig {
    /// Load the configuration from `~/.modorder/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        let path = Self::default_path();
        if path.is_file() {
            Self::from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and parse a configuration file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            modorder_util::errors::ModorderError::Config {
                message: format!("Failed to read {}: {e}", path.display()),
            }
        })?;
        toml::from_str(&content).map_err(|e| {
            modorder_util::errors::ModorderError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Override the managed Mods directory.
    pub fn with_mods_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.paths.mods_dir = dir.into();
        self
    }

    pub fn mods_dir(&self) -> &Path {
        &self.paths.mods_dir
    }

    /// Path of the profile file inside the Mods directory.
    pub fn profile_path(&self) -> PathBuf {
        self.paths.mods_dir.join(&self.profile.file)
    }

    /// Path of the external registry inside the Mods directory.
    pub fn registry_path(&self) -> PathBuf {
        self.paths.mods_dir.join(&self.registry.file)
    }
}

/// Returns the path to the modorder data directory (`~/.modorder/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".modorder")
}

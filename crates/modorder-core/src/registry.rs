//! Registry of mods that live outside the managed Mods directory.
//!
//! Persisted as JSON next to the profile. Besides the name → absolute path
//! mappings it also carries the free-text comments for every mod, internal
//! or external.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use modorder_util::errors::ModorderError;

use crate::entity::EntityKind;
use crate::key::file_name;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRegistry {
    /// External package name → absolute folder path.
    #[serde(default)]
    pub packages: BTreeMap<String, String>,
    /// External native file name → absolute file path.
    #[serde(default)]
    pub natives: BTreeMap<String, String>,
    #[serde(default)]
    pub mod_comments: BTreeMap<String, String>,
    #[serde(default)]
    pub native_comments: BTreeMap<String, String>,
}

/// Per-entry existence, as reported by [`ExternalRegistry::check_existence`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistenceReport {
    pub packages: BTreeMap<String, bool>,
    pub natives: BTreeMap<String, bool>,
}

/// Registry entry names grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryEntries {
    pub packages: Vec<String>,
    pub natives: Vec<String>,
}

impl RegistryEntries {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.natives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packages.len() + self.natives.len()
    }
}

impl ExternalRegistry {
    /// Parse a registry document.
    pub fn from_json(content: &str) -> miette::Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            ModorderError::Registry {
                message: format!("Failed to parse external registry: {e}"),
            }
            .into()
        })
    }

    /// Load the registry from `path`.
    ///
    /// A missing file yields an empty registry. An unreadable or malformed
    /// file is logged and also yields an empty registry.
    pub fn load(path: &Path) -> Self {
        if !path.is_file() {
            return Self::default();
        }
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("failed to read {}: {e}", path.display());
                return Self::default();
            }
        };
        match Self::from_json(&content) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!("{e}; starting with an empty registry");
                Self::default()
            }
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> miette::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ModorderError::Registry {
                message: format!("Failed to serialize external registry: {e}"),
            }
            .into()
        })
    }

    /// Write the registry to `path` atomically.
    pub fn save(&self, path: &Path) -> miette::Result<()> {
        let json = self.to_json_pretty()?;
        modorder_util::fs::write_atomic(path, json.as_bytes())
            .map_err(|e| ModorderError::Io(e).into())
    }

    pub fn package_path(&self, name: &str) -> Option<&str> {
        self.packages.get(name).map(String::as_str)
    }

    pub fn native_path(&self, name: &str) -> Option<&str> {
        self.natives.get(name).map(String::as_str)
    }

    pub fn is_external_package(&self, id: &str) -> bool {
        self.packages.contains_key(id)
    }

    /// A native is external if its stored path is a registry value or its
    /// file name is a registry key.
    pub fn is_external_native(&self, path: &str) -> bool {
        self.natives.values().any(|p| p == path) || self.natives.contains_key(file_name(path))
    }

    /// Remove an external package and its comment.
    pub fn remove_package(&mut self, name: &str) -> bool {
        if self.packages.remove(name).is_some() {
            self.mod_comments.remove(name);
            true
        } else {
            false
        }
    }

    /// Remove an external native and its comment.
    pub fn remove_native(&mut self, name: &str) -> bool {
        if self.natives.remove(name).is_some() {
            self.native_comments.remove(name);
            true
        } else {
            false
        }
    }

    /// Comment for an entity; empty if none is set.
    pub fn comment(&self, kind: EntityKind, name: &str) -> &str {
        let map = match kind {
            EntityKind::Package => &self.mod_comments,
            EntityKind::Native => &self.native_comments,
        };
        map.get(name).map(String::as_str).unwrap_or("")
    }

    /// Set a comment. Whitespace is trimmed; an empty comment removes the entry.
    pub fn set_comment(&mut self, kind: EntityKind, name: &str, comment: &str) {
        let map = match kind {
            EntityKind::Package => &mut self.mod_comments,
            EntityKind::Native => &mut self.native_comments,
        };
        let comment = comment.trim();
        if comment.is_empty() {
            map.remove(name);
        } else {
            map.insert(name.to_string(), comment.to_string());
        }
    }

    /// Check every registered path with `exists`.
    pub fn check_existence(&self, exists: impl Fn(&Path) -> bool) -> ExistenceReport {
        ExistenceReport {
            packages: self
                .packages
                .iter()
                .map(|(name, path)| (name.clone(), exists(Path::new(path))))
                .collect(),
            natives: self
                .natives
                .iter()
                .map(|(name, path)| (name.clone(), exists(Path::new(path))))
                .collect(),
        }
    }

    /// Names whose registered path does not exist.
    pub fn get_missing(&self, exists: impl Fn(&Path) -> bool) -> RegistryEntries {
        let report = self.check_existence(exists);
        RegistryEntries {
            packages: missing_names(&report.packages),
            natives: missing_names(&report.natives),
        }
    }

    /// Remove every entry whose path does not exist. Returns what was removed.
    pub fn cleanup_missing(&mut self, exists: impl Fn(&Path) -> bool) -> RegistryEntries {
        let missing = self.get_missing(exists);
        self.remove_entries(missing)
    }

    /// Remove entries that actually point inside the managed `mods_dir`.
    /// Such entries are internal mods that were registered by mistake.
    pub fn cleanup_internal(&mut self, mods_dir: &Path) -> RegistryEntries {
        let inside = |path: &str| {
            let path = Path::new(path);
            match modorder_util::fs::is_within(path, mods_dir) {
                Ok(within) => within,
                Err(_) => path.starts_with(mods_dir),
            }
        };
        let found = RegistryEntries {
            packages: self
                .packages
                .iter()
                .filter(|(_, path)| inside(path))
                .map(|(name, _)| name.clone())
                .collect(),
            natives: self
                .natives
                .iter()
                .filter(|(_, path)| inside(path))
                .map(|(name, _)| name.clone())
                .collect(),
        };
        self.remove_entries(found)
    }

    fn remove_entries(&mut self, entries: RegistryEntries) -> RegistryEntries {
        let mut removed = RegistryEntries::default();
        for name in entries.packages {
            if self.remove_package(&name) {
                tracing::debug!("removed external package {name}");
                removed.packages.push(name);
            }
        }
        for name in entries.natives {
            if self.remove_native(&name) {
                tracing::debug!("removed external native {name}");
                removed.natives.push(name);
            }
        }
        removed
    }
}

fn missing_names(report: &BTreeMap<String, bool>) -> Vec<String> {
    report
        .iter()
        .filter(|(_, exists)| !**exists)
        .map(|(name, _)| name.clone())
        .collect()
}

//! Result of scanning the Mods directory.

use std::fmt;

use crate::key::{decorate_external, EntityKey};

/// Classification of a top-level folder in the Mods directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModType {
    /// Game data only (regulation.bin, typical game folders, archives).
    Folder,
    /// DLLs only.
    Dll,
    /// Game data and DLLs; contributes a package and natives.
    Mixed,
    Unknown,
}

impl ModType {
    pub fn is_package(self) -> bool {
        matches!(self, Self::Folder | Self::Mixed)
    }

    pub fn has_natives(self) -> bool {
        matches!(self, Self::Dll | Self::Mixed)
    }
}

impl fmt::Display for ModType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Folder => "folder",
            Self::Dll => "dll",
            Self::Mixed => "mixed",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Everything a scan discovered. External entries carry the decoration
/// suffix so callers can round-trip them through [`EntityKey::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Package ids (folder names).
    pub packages: Vec<String>,
    /// Native paths relative to the Mods directory, `/`-separated.
    pub natives: Vec<String>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.natives.is_empty()
    }

    /// Add an external package unless a package with that name is listed.
    pub fn push_external_package(&mut self, name: &str) {
        if !self.contains_package(name) {
            self.packages.push(decorate_external(name));
        }
    }

    /// Add an external native unless a native with that name is listed.
    pub fn push_external_native(&mut self, name: &str) {
        if !self.contains_native(name) {
            self.natives.push(decorate_external(name));
        }
    }

    pub fn contains_package(&self, name: &str) -> bool {
        self.packages
            .iter()
            .any(|p| EntityKey::parse(p).as_str() == name)
    }

    pub fn contains_native(&self, name: &str) -> bool {
        self.natives
            .iter()
            .any(|n| EntityKey::parse(n).as_str() == name)
    }
}

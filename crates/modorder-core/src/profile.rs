//! The load-order profile document (`current.me3`).
//!
//! Read with `toml` + serde, written with `toml_edit` so the layout stays the
//! one the loader expects: `[[supports]]`, `[[packages]]` and `[[natives]]`
//! arrays of tables with constraint lists as arrays of inline tables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use toml_edit::{value, Array, ArrayOfTables, DocumentMut, InlineTable, Item, Table, Value};

use modorder_util::errors::ModorderError;

use crate::entity::{collapse, Constraint, ConstraintList, EntityKind, Native, Package};
use crate::registry::ExternalRegistry;

/// Profile schema version written by default.
pub const DEFAULT_PROFILE_VERSION: &str = "v1";

/// Game the profile declares support for by default.
pub const DEFAULT_GAME: &str = "nightreign";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(rename = "profileVersion", default = "default_profile_version")]
    pub profile_version: String,
    #[serde(default)]
    pub supports: Vec<Supports>,
    #[serde(default)]
    pub packages: Vec<PackageEntry>,
    #[serde(default)]
    pub natives: Vec<NativeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supports {
    pub game: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub id: String,
    #[serde(default, alias = "path")]
    pub source: String,
    #[serde(default)]
    pub load_after: ConstraintList,
    #[serde(default)]
    pub load_before: ConstraintList,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeEntry {
    pub path: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub initializer: Option<String>,
    #[serde(default)]
    pub finalizer: Option<String>,
    #[serde(default)]
    pub load_after: ConstraintList,
    #[serde(default)]
    pub load_before: ConstraintList,
    #[serde(default)]
    pub load_early: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_profile_version() -> String {
    DEFAULT_PROFILE_VERSION.to_string()
}

fn default_enabled() -> bool {
    true
}

impl Default for ProfileDocument {
    fn default() -> Self {
        Self::new(DEFAULT_GAME, DEFAULT_PROFILE_VERSION)
    }
}

impl ProfileDocument {
    /// An empty profile for `game`.
    pub fn new(game: &str, version: &str) -> Self {
        Self {
            profile_version: version.to_string(),
            supports: vec![Supports {
                game: game.to_string(),
            }],
            packages: Vec::new(),
            natives: Vec::new(),
        }
    }

    /// Parse a profile from TOML text.
    pub fn from_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            ModorderError::Profile {
                message: format!("Failed to parse profile: {e}"),
            }
            .into()
        })
    }

    /// Load and parse a profile from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ModorderError::Profile {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_toml(&content)
    }

    /// Build a profile from entity collections. Only enabled entities are
    /// emitted, and empty constraint lists are dropped.
    pub fn from_entities(
        packages: &[Package],
        natives: &[Native],
        game: &str,
        version: &str,
    ) -> Self {
        let mut doc = Self::new(game, version);
        doc.packages = packages
            .iter()
            .filter(|p| p.enabled)
            .map(|p| PackageEntry {
                id: p.id.clone(),
                source: p.source.clone(),
                load_after: collapse(p.load_after.clone().unwrap_or_default()),
                load_before: collapse(p.load_before.clone().unwrap_or_default()),
                enabled: true,
            })
            .collect();
        doc.natives = natives
            .iter()
            .filter(|n| n.enabled)
            .map(|n| NativeEntry {
                path: n.path.clone(),
                optional: n.optional,
                initializer: n.initializer.clone(),
                finalizer: n.finalizer.clone(),
                load_after: collapse(n.load_after.clone().unwrap_or_default()),
                load_before: collapse(n.load_before.clone().unwrap_or_default()),
                load_early: n.load_early,
                enabled: true,
            })
            .collect();
        doc
    }

    /// Convert into entity collections. The external flag and comments are
    /// taken from `registry`; they are not stored in the profile itself.
    pub fn into_entities(self, registry: &ExternalRegistry) -> (Vec<Package>, Vec<Native>) {
        let packages = self
            .packages
            .into_iter()
            .map(|entry| {
                let comment = registry.comment(EntityKind::Package, &entry.id).to_string();
                Package {
                    external: registry.is_external_package(&entry.id),
                    comment,
                    id: entry.id,
                    source: entry.source,
                    load_after: collapse(entry.load_after.unwrap_or_default()),
                    load_before: collapse(entry.load_before.unwrap_or_default()),
                    enabled: entry.enabled,
                }
            })
            .collect();
        let natives = self
            .natives
            .into_iter()
            .map(|entry| {
                let mut native = Native::new(entry.path);
                native.external = registry.is_external_native(&native.path);
                native.comment = registry
                    .comment(EntityKind::Native, native.name())
                    .to_string();
                native.optional = entry.optional;
                native.enabled = entry.enabled;
                native.initializer = entry.initializer;
                native.finalizer = entry.finalizer;
                native.load_after = collapse(entry.load_after.unwrap_or_default());
                native.load_before = collapse(entry.load_before.unwrap_or_default());
                native.load_early = entry.load_early;
                native
            })
            .collect();
        (packages, natives)
    }

    /// Render the profile as TOML.
    pub fn to_toml_string(&self) -> String {
        let mut doc = DocumentMut::new();
        doc["profileVersion"] = value(self.profile_version.as_str());

        let mut supports = ArrayOfTables::new();
        for s in &self.supports {
            let mut table = Table::new();
            table["game"] = value(s.game.as_str());
            supports.push(table);
        }
        doc["supports"] = Item::ArrayOfTables(supports);

        if !self.packages.is_empty() {
            let mut packages = ArrayOfTables::new();
            for p in &self.packages {
                let mut table = Table::new();
                table["id"] = value(p.id.as_str());
                table["source"] = value(p.source.as_str());
                insert_constraints(&mut table, "load_after", &p.load_after);
                insert_constraints(&mut table, "load_before", &p.load_before);
                packages.push(table);
            }
            doc["packages"] = Item::ArrayOfTables(packages);
        }

        if !self.natives.is_empty() {
            let mut natives = ArrayOfTables::new();
            for n in &self.natives {
                let mut table = Table::new();
                table["path"] = value(n.path.as_str());
                if n.optional {
                    table["optional"] = value(true);
                }
                if let Some(ref init) = n.initializer {
                    table["initializer"] = value(init.as_str());
                }
                if let Some(ref fini) = n.finalizer {
                    table["finalizer"] = value(fini.as_str());
                }
                insert_constraints(&mut table, "load_after", &n.load_after);
                insert_constraints(&mut table, "load_before", &n.load_before);
                if n.load_early {
                    table["load_early"] = value(true);
                }
                natives.push(table);
            }
            doc["natives"] = Item::ArrayOfTables(natives);
        }

        doc.to_string()
    }

    /// Write the profile to `path` atomically.
    pub fn write_to(&self, path: &Path) -> miette::Result<()> {
        modorder_util::fs::write_atomic(path, self.to_toml_string().as_bytes())
            .map_err(|e| ModorderError::Io(e).into())
    }
}

fn insert_constraints(table: &mut Table, key: &str, list: &ConstraintList) {
    let Some(items) = list.as_ref().filter(|l| !l.is_empty()) else {
        return;
    };
    let mut array = Array::new();
    for c in items {
        array.push(constraint_table(c));
    }
    table[key] = Item::Value(Value::Array(array));
}

fn constraint_table(c: &Constraint) -> InlineTable {
    let mut t = InlineTable::new();
    t.insert("id", Value::from(c.id.as_str()));
    t.insert("optional", Value::from(c.optional));
    t
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::key::{file_name, path_matches, EntityKey};

/// Which collection an entity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Package,
    Native,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package => f.write_str("package"),
            Self::Native => f.write_str("native"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "package" | "packages" | "pkg" => Ok(Self::Package),
            "native" | "natives" | "dll" => Ok(Self::Native),
            other => Err(format!(
                "unknown entity kind '{other}', expected 'package' or 'native'"
            )),
        }
    }
}

/// A single ordering constraint: the owning entity loads before/after `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub id: String,
    #[serde(default)]
    pub optional: bool,
}

impl Constraint {
    /// An advisory constraint; the loader ignores it if the target is absent.
    pub fn optional(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            optional: true,
        }
    }

    /// A mandatory constraint.
    pub fn required(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            optional: false,
        }
    }
}

/// An ordered constraint list. `None` and `Some(vec![])` mean the same thing;
/// mutation helpers always collapse to `None`.
pub type ConstraintList = Option<Vec<Constraint>>;

/// Iterate the target ids of a constraint list.
pub fn targets(list: &ConstraintList) -> impl Iterator<Item = &str> {
    list.iter().flatten().map(|c| c.id.as_str())
}

/// Whether a constraint list names `id`.
pub fn has_target(list: &ConstraintList, id: &str) -> bool {
    targets(list).any(|t| t == id)
}

/// Turn a possibly-empty vector into a [`ConstraintList`].
pub fn collapse(list: Vec<Constraint>) -> ConstraintList {
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

/// Keep only constraints for which `keep` returns `true`, collapsing an
/// emptied list to `None`.
pub fn retain(list: &mut ConstraintList, mut keep: impl FnMut(&Constraint) -> bool) {
    if let Some(items) = list.take() {
        *list = collapse(items.into_iter().filter(|c| keep(c)).collect());
    }
}

/// A folder-based content mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub id: String,
    pub source: String,
    pub load_after: ConstraintList,
    pub load_before: ConstraintList,
    pub enabled: bool,
    pub external: bool,
    pub comment: String,
}

impl Package {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            load_after: None,
            load_before: None,
            enabled: true,
            external: false,
            comment: String::new(),
        }
    }

    /// The name other packages use to refer to this one.
    pub fn name(&self) -> &str {
        &self.id
    }

    pub fn matches(&self, key: &EntityKey) -> bool {
        self.id == key.as_str()
    }
}

/// Per-native attributes accepted when enabling a native.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeAttrs {
    /// Path to store instead of the identifier (external natives are
    /// identified by file name but stored by absolute path).
    pub source: Option<String>,
    pub optional: bool,
    pub initializer: Option<String>,
    pub finalizer: Option<String>,
    pub load_early: bool,
}

/// A loadable binary plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Native {
    pub path: String,
    pub optional: bool,
    pub enabled: bool,
    pub initializer: Option<String>,
    pub finalizer: Option<String>,
    pub load_after: ConstraintList,
    pub load_before: ConstraintList,
    pub load_early: bool,
    pub external: bool,
    pub comment: String,
}

impl Native {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            optional: false,
            enabled: true,
            initializer: None,
            finalizer: None,
            load_after: None,
            load_before: None,
            load_early: false,
            external: false,
            comment: String::new(),
        }
    }

    /// File name of the native; this is the id used in constraints.
    pub fn name(&self) -> &str {
        file_name(&self.path)
    }

    /// Whether `key` names this native (exact path, file name, or trailing
    /// path segments).
    pub fn matches(&self, key: &EntityKey) -> bool {
        path_matches(&self.path, key.as_str())
    }
}

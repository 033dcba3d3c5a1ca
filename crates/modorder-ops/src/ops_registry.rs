//! Operation: maintain the external mod registry.

use std::path::{Path, PathBuf};

use modorder_core::entity::EntityKind;
use modorder_core::registry::{ExistenceReport, ExternalRegistry, RegistryEntries};
use modorder_util::errors::ModorderError;

use crate::ops_scan;

fn rejected(message: impl Into<String>) -> miette::Report {
    ModorderError::Registry {
        message: message.into(),
    }
    .into()
}

/// Canonicalize `path` and make sure it is not inside `mods_dir`.
fn resolve_outside(path: &Path, mods_dir: &Path, what: &str) -> miette::Result<PathBuf> {
    let resolved = path
        .canonicalize()
        .map_err(|e| rejected(format!("Failed to resolve {}: {e}", path.display())))?;
    if let Ok(mods) = mods_dir.canonicalize() {
        if resolved.starts_with(&mods) {
            return Err(rejected(format!(
                "{what} {} is inside the Mods directory",
                path.display()
            )));
        }
    }
    Ok(resolved)
}

/// Registry entry whose path resolves to `resolved`, if any.
fn entry_with_path<'a>(
    entries: &'a std::collections::BTreeMap<String, String>,
    resolved: &Path,
) -> Option<&'a str> {
    entries
        .iter()
        .find(|(_, existing)| {
            Path::new(existing)
                .canonicalize()
                .is_ok_and(|p| p == resolved)
        })
        .map(|(name, _)| name.as_str())
}

fn file_name_of(path: &Path) -> miette::Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| rejected(format!("{} has no file name", path.display())))
}

/// Register a package folder living outside `mods_dir`. Returns its name.
pub fn add_external_package(
    registry: &mut ExternalRegistry,
    mods_dir: &Path,
    path: &Path,
) -> miette::Result<String> {
    if !path.is_dir() {
        return Err(rejected(format!("{} is not a directory", path.display())));
    }
    let resolved = resolve_outside(path, mods_dir, "Folder")?;
    if let Some(existing) = entry_with_path(&registry.packages, &resolved) {
        return Err(rejected(format!(
            "{} is already registered as external package '{existing}'",
            resolved.display()
        )));
    }

    let name = file_name_of(&resolved)?;
    let resolved_str = resolved.to_string_lossy().into_owned();
    if let Some(existing) = registry.package_path(&name) {
        if existing != resolved_str {
            return Err(rejected(format!(
                "An external package named '{name}' already points at {existing}"
            )));
        }
    }

    tracing::debug!("registering external package {name} -> {resolved_str}");
    registry.packages.insert(name.clone(), resolved_str);
    Ok(name)
}

/// Register a native DLL living outside `mods_dir`. Returns its file name.
///
/// The file name must not collide with any internal or external native,
/// since natives are referenced by file name in ordering constraints.
pub fn add_external_native(
    registry: &mut ExternalRegistry,
    mods_dir: &Path,
    path: &Path,
) -> miette::Result<String> {
    if !path.is_file() {
        return Err(rejected(format!("{} is not a file", path.display())));
    }
    let is_dll = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dll"));
    if !is_dll {
        return Err(rejected(format!("{} is not a DLL", path.display())));
    }
    let resolved = resolve_outside(path, mods_dir, "DLL")?;
    if let Some(existing) = entry_with_path(&registry.natives, &resolved) {
        return Err(rejected(format!(
            "{} is already registered as external native '{existing}'",
            resolved.display()
        )));
    }

    let name = file_name_of(&resolved)?;
    if registry.native_path(&name).is_some() {
        return Err(rejected(format!(
            "An external native named '{name}' is already registered"
        )));
    }
    let internal = ops_scan::internal_native_names(mods_dir)?;
    if internal.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
        return Err(rejected(format!(
            "A native named '{name}' already exists in the Mods directory"
        )));
    }

    let resolved_str = resolved.to_string_lossy().into_owned();
    tracing::debug!("registering external native {name} -> {resolved_str}");
    registry.natives.insert(name.clone(), resolved_str);
    Ok(name)
}

/// Remove an external entry and its comment.
pub fn remove_external(registry: &mut ExternalRegistry, kind: EntityKind, name: &str) -> bool {
    match kind {
        EntityKind::Package => registry.remove_package(name),
        EntityKind::Native => registry.remove_native(name),
    }
}

/// Existence of every registered path on disk.
pub fn check_external(registry: &ExternalRegistry) -> ExistenceReport {
    registry.check_existence(Path::exists)
}

/// Result of [`cleanup_external`].
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Entries whose path no longer exists.
    pub missing: RegistryEntries,
    /// Entries that point inside the Mods directory.
    pub internal: RegistryEntries,
}

impl CleanupResult {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.internal.is_empty()
    }
}

/// Drop entries whose path is gone or lies inside `mods_dir`.
pub fn cleanup_external(registry: &mut ExternalRegistry, mods_dir: &Path) -> CleanupResult {
    let missing = registry.cleanup_missing(Path::exists);
    let internal = registry.cleanup_internal(mods_dir);
    CleanupResult { missing, internal }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct Fixture {
        _tmp: tempfile::TempDir,
        mods: PathBuf,
        outside: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let mods = tmp.path().join("Mods");
        let outside = tmp.path().join("elsewhere");
        fs::create_dir_all(&mods).unwrap();
        fs::create_dir_all(&outside).unwrap();
        Fixture {
            _tmp: tmp,
            mods,
            outside,
        }
    }

    #[test]
    fn add_package_and_reject_duplicates() {
        let f = fixture();
        let pkg = f.outside.join("BigMod");
        fs::create_dir_all(&pkg).unwrap();
        let mut registry = ExternalRegistry::default();

        let name = add_external_package(&mut registry, &f.mods, &pkg).unwrap();
        assert_eq!(name, "BigMod");
        assert!(registry.is_external_package("BigMod"));

        let err = add_external_package(&mut registry, &f.mods, &pkg).unwrap_err();
        assert!(err.to_string().contains("already registered"));

        let other = f.outside.join("nested").join("BigMod");
        fs::create_dir_all(&other).unwrap();
        let err = add_external_package(&mut registry, &f.mods, &other).unwrap_err();
        assert!(err.to_string().contains("already points at"));
    }

    #[test]
    fn package_inside_mods_rejected() {
        let f = fixture();
        let inner = f.mods.join("Inner");
        fs::create_dir_all(&inner).unwrap();
        let mut registry = ExternalRegistry::default();
        let err = add_external_package(&mut registry, &f.mods, &inner).unwrap_err();
        assert!(err.to_string().contains("inside the Mods directory"));
        assert!(registry.packages.is_empty());
    }

    #[test]
    fn native_must_be_dll() {
        let f = fixture();
        let txt = f.outside.join("notes.txt");
        fs::write(&txt, b"").unwrap();
        let mut registry = ExternalRegistry::default();
        let err = add_external_native(&mut registry, &f.mods, &txt).unwrap_err();
        assert!(err.to_string().contains("is not a DLL"));
    }

    #[test]
    fn native_name_collision_with_internal() {
        let f = fixture();
        fs::create_dir_all(f.mods.join("Coop")).unwrap();
        fs::write(f.mods.join("Coop").join("nrsc.dll"), b"").unwrap();
        let dll = f.outside.join("nrsc.dll");
        fs::write(&dll, b"").unwrap();
        let mut registry = ExternalRegistry::default();
        let err = add_external_native(&mut registry, &f.mods, &dll).unwrap_err();
        assert!(err.to_string().contains("already exists in the Mods directory"));
    }

    #[test]
    fn add_native_then_cleanup_missing() {
        let f = fixture();
        let dll = f.outside.join("tool.dll");
        fs::write(&dll, b"").unwrap();
        let mut registry = ExternalRegistry::default();
        assert_eq!(
            add_external_native(&mut registry, &f.mods, &dll).unwrap(),
            "tool.dll"
        );
        registry.set_comment(EntityKind::Native, "tool.dll", "helper");
        assert_eq!(check_external(&registry).natives.get("tool.dll"), Some(&true));

        fs::remove_file(&dll).unwrap();
        let result = cleanup_external(&mut registry, &f.mods);
        assert_eq!(result.missing.natives, vec!["tool.dll"]);
        assert!(registry.natives.is_empty());
        assert_eq!(registry.comment(EntityKind::Native, "tool.dll"), "");
    }
}

//! Operation: scan the Mods directory for packages and natives.

use std::path::Path;

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

use modorder_core::registry::ExternalRegistry;
use modorder_core::scan::{ModType, ScanResult};
use modorder_util::errors::ModorderError;

/// DLLs shipped alongside mods that are runtime dependencies, not plugins.
pub const IGNORED_DLLS: &[&str] = &["libzstd.dll", "oo2core_9_win64.dll", "steam_api64.dll"];

/// Sub-folders that mark a directory as game content.
const GAME_FOLDERS: &[&str] = &[
    "msg", "param", "chr", "script", "sfx", "map", "parts", "menu", "movie", "sd",
];

/// Files that mark a directory as game content.
const MOD_FILE_PATTERNS: &[&str] = &[
    "mod.ini",
    "config.ini",
    "settings.ini",
    "*.pak",
    "*.bnd",
    "*.bhd",
    "*.bdt",
];

/// Top-level directories that are never mods.
const SKIPPED_DIRS: &[&str] = &["__pycache__", ".git"];

/// Compiled matchers used while scanning.
pub struct ScanMatchers {
    mod_files: GlobSet,
    dll: GlobMatcher,
}

impl ScanMatchers {
    pub fn new() -> miette::Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in MOD_FILE_PATTERNS {
            builder.add(Glob::new(pattern).map_err(glob_error)?);
        }
        let mod_files = builder.build().map_err(glob_error)?;
        let dll = GlobBuilder::new("*.dll")
            .case_insensitive(true)
            .build()
            .map_err(glob_error)?
            .compile_matcher();
        Ok(Self { mod_files, dll })
    }

    /// Whether `file_name` is a plugin DLL (and not an ignored runtime DLL).
    pub fn is_plugin_dll(&self, file_name: &str) -> bool {
        self.dll.is_match(file_name) && !is_ignored_dll(file_name)
    }

    fn is_mod_file(&self, file_name: &str) -> bool {
        self.mod_files.is_match(file_name)
    }
}

fn glob_error(e: globset::Error) -> ModorderError {
    ModorderError::Scan {
        message: format!("Invalid scan pattern: {e}"),
    }
}

fn is_ignored_dll(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    IGNORED_DLLS.contains(&lower.as_str())
}

/// Scan `mods_dir` and append existing external registry entries.
///
/// A missing Mods directory yields only the external entries.
pub fn scan_mods_directory(
    mods_dir: &Path,
    registry: &ExternalRegistry,
) -> miette::Result<ScanResult> {
    let matchers = ScanMatchers::new()?;
    let mut result = ScanResult::default();

    if mods_dir.is_dir() {
        let mut entries: Vec<_> = std::fs::read_dir(mods_dir)
            .map_err(|e| ModorderError::Scan {
                message: format!("Failed to read {}: {e}", mods_dir.display()),
            })?
            .filter_map(Result::ok)
            .collect();
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if path.is_dir() {
                if SKIPPED_DIRS.contains(&name.as_str()) {
                    continue;
                }
                let mod_type = detect_mod_type(&path, &matchers);
                tracing::debug!("{name}: {mod_type}");
                if mod_type.is_package() {
                    result.packages.push(name.clone());
                }
                if mod_type.has_natives() {
                    result.natives.extend(scan_dll_files(&path, &matchers));
                }
            } else if path.is_file() && matchers.is_plugin_dll(&name) {
                result.natives.push(name);
            }
        }
    } else {
        tracing::warn!("Mods directory {} does not exist", mods_dir.display());
    }

    for (name, path) in &registry.packages {
        if Path::new(path).exists() {
            result.push_external_package(name);
        }
    }
    for (name, path) in &registry.natives {
        if Path::new(path).exists() {
            result.push_external_native(name);
        }
    }

    Ok(result)
}

/// Classify a mod folder. Unreadable folders are [`ModType::Unknown`].
pub fn detect_mod_type(mod_dir: &Path, matchers: &ScanMatchers) -> ModType {
    let Ok(entries) = std::fs::read_dir(mod_dir) else {
        return ModType::Unknown;
    };

    let mut has_content = mod_dir.join("regulation.bin").exists()
        || GAME_FOLDERS.iter().any(|f| mod_dir.join(f).exists());
    let mut has_dll = false;
    let mut subdirs = Vec::new();

    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if path.is_dir() {
            subdirs.push(path);
        } else {
            has_content |= matchers.is_mod_file(&name);
            has_dll |= matchers.is_plugin_dll(&name);
        }
    }
    if !has_dll {
        has_dll = subdirs.iter().any(|d| !dll_names(d, matchers).is_empty());
    }

    match (has_content, has_dll) {
        (true, true) => ModType::Mixed,
        (true, false) => ModType::Folder,
        (false, true) => ModType::Dll,
        (false, false) => ModType::Unknown,
    }
}

/// Plugin DLLs in `mod_dir` and its immediate sub-folders, as `/`-separated
/// paths relative to the Mods directory (`Folder/x.dll`, `Folder/sub/y.dll`).
pub fn scan_dll_files(mod_dir: &Path, matchers: &ScanMatchers) -> Vec<String> {
    let Some(folder) = mod_dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return Vec::new();
    };

    let mut found: Vec<String> = dll_names(mod_dir, matchers)
        .into_iter()
        .map(|dll| format!("{folder}/{dll}"))
        .collect();

    let Ok(entries) = std::fs::read_dir(mod_dir) else {
        return found;
    };
    let mut subdirs: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    subdirs.sort();
    for sub in subdirs {
        let sub_name = match sub.file_name() {
            Some(n) => n.to_string_lossy().into_owned(),
            None => continue,
        };
        for dll in dll_names(&sub, matchers) {
            found.push(format!("{folder}/{sub_name}/{dll}"));
        }
    }
    found
}

fn dll_names(dir: &Path, matchers: &ScanMatchers) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| matchers.is_plugin_dll(name))
        .collect();
    names.sort();
    names
}

/// File names of every native found inside `mods_dir`.
pub fn internal_native_names(mods_dir: &Path) -> miette::Result<Vec<String>> {
    let scan = scan_mods_directory(mods_dir, &ExternalRegistry::default())?;
    Ok(scan
        .natives
        .iter()
        .map(|n| modorder_core::key::file_name(n).to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn classifies_folders() {
        let tmp = tempfile::tempdir().unwrap();
        let m = ScanMatchers::new().unwrap();

        let folder = tmp.path().join("Content");
        touch(&folder.join("regulation.bin"));
        assert_eq!(detect_mod_type(&folder, &m), ModType::Folder);

        let dll = tmp.path().join("Plugin");
        touch(&dll.join("plugin.dll"));
        assert_eq!(detect_mod_type(&dll, &m), ModType::Dll);

        let mixed = tmp.path().join("Both");
        fs::create_dir_all(mixed.join("param")).unwrap();
        touch(&mixed.join("bin").join("hook.DLL"));
        assert_eq!(detect_mod_type(&mixed, &m), ModType::Mixed);

        let unknown = tmp.path().join("Readme");
        touch(&unknown.join("readme.txt"));
        touch(&unknown.join("steam_api64.dll"));
        assert_eq!(detect_mod_type(&unknown, &m), ModType::Unknown);
    }

    #[test]
    fn archive_patterns_mark_content() {
        let tmp = tempfile::tempdir().unwrap();
        let m = ScanMatchers::new().unwrap();
        let dir = tmp.path().join("Archive");
        touch(&dir.join("data0.bdt"));
        assert_eq!(detect_mod_type(&dir, &m), ModType::Folder);
    }

    #[test]
    fn dll_paths_are_relative_and_slash_separated() {
        let tmp = tempfile::tempdir().unwrap();
        let m = ScanMatchers::new().unwrap();
        let dir = tmp.path().join("Coop");
        touch(&dir.join("nrsc.dll"));
        touch(&dir.join("libs").join("extra.dll"));
        touch(&dir.join("libzstd.dll"));
        assert_eq!(
            scan_dll_files(&dir, &m),
            vec!["Coop/nrsc.dll", "Coop/libs/extra.dll"]
        );
    }
}

use std::path::Path;

use modorder_core::entity::EntityKind;
use modorder_core::registry::ExternalRegistry;

fn registry() -> ExternalRegistry {
    let mut r = ExternalRegistry::default();
    r.packages.insert("Kept".into(), "/present/Kept".into());
    r.packages.insert("Gone".into(), "/missing/Gone".into());
    r.natives.insert("kept.dll".into(), "/present/kept.dll".into());
    r.natives.insert("gone.dll".into(), "/missing/gone.dll".into());
    r.mod_comments.insert("Gone".into(), "old".into());
    r.native_comments.insert("gone.dll".into(), "old".into());
    r
}

fn exists(path: &Path) -> bool {
    path.starts_with("/present")
}

#[test]
fn check_existence_reports_every_entry() {
    let report = registry().check_existence(exists);
    assert_eq!(report.packages.get("Kept"), Some(&true));
    assert_eq!(report.packages.get("Gone"), Some(&false));
    assert_eq!(report.natives.get("gone.dll"), Some(&false));
}

#[test]
fn get_missing_lists_only_missing() {
    let missing = registry().get_missing(exists);
    assert_eq!(missing.packages, vec!["Gone".to_string()]);
    assert_eq!(missing.natives, vec!["gone.dll".to_string()]);
}

#[test]
fn cleanup_missing_removes_entries_and_comments() {
    let mut r = registry();
    let removed = r.cleanup_missing(exists);
    assert_eq!(removed.len(), 2);
    assert!(!r.packages.contains_key("Gone"));
    assert!(!r.natives.contains_key("gone.dll"));
    assert!(r.mod_comments.is_empty());
    assert!(r.native_comments.is_empty());
    assert!(r.packages.contains_key("Kept"));
}

#[test]
fn cleanup_internal_removes_paths_inside_mods_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let mods = tmp.path().join("Mods");
    let inner = mods.join("Inner");
    std::fs::create_dir_all(&inner).unwrap();
    let outer = tmp.path().join("Outer");
    std::fs::create_dir_all(&outer).unwrap();

    let mut r = ExternalRegistry::default();
    r.packages
        .insert("Inner".into(), inner.to_string_lossy().into_owned());
    r.packages
        .insert("Outer".into(), outer.to_string_lossy().into_owned());

    let removed = r.cleanup_internal(&mods);
    assert_eq!(removed.packages, vec!["Inner".to_string()]);
    assert!(r.packages.contains_key("Outer"));
}

#[test]
fn comments_trim_and_clear() {
    let mut r = ExternalRegistry::default();
    r.set_comment(EntityKind::Package, "ModA", "  needs patch 1.02  ");
    assert_eq!(r.comment(EntityKind::Package, "ModA"), "needs patch 1.02");
    r.set_comment(EntityKind::Package, "ModA", "   ");
    assert_eq!(r.comment(EntityKind::Package, "ModA"), "");
    assert!(r.mod_comments.is_empty());
}

#[test]
fn is_external_native_matches_path_or_name() {
    let r = registry();
    assert!(r.is_external_native("/present/kept.dll"));
    assert!(r.is_external_native("kept.dll"));
    assert!(!r.is_external_native("Mods/local.dll"));
}

#[test]
fn load_falls_back_to_default_on_malformed_json() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("external_mods.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(ExternalRegistry::load(&path), ExternalRegistry::default());
}

#[test]
fn save_then_load_round_trips() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("external_mods.json");
    let r = registry();
    r.save(&path).unwrap();
    assert_eq!(ExternalRegistry::load(&path), r);
}

#[test]
fn load_missing_file_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let r = ExternalRegistry::load(&tmp.path().join("nope.json"));
    assert_eq!(r, ExternalRegistry::default());
}

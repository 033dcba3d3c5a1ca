use std::fs;
use std::path::Path;

use modorder_core::registry::ExternalRegistry;
use modorder_ops::ops_scan::scan_mods_directory;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

#[test]
fn scan_lists_packages_natives_and_externals() {
    let tmp = tempfile::tempdir().unwrap();
    let mods = tmp.path().join("Mods");
    touch(&mods.join("Content").join("regulation.bin"));
    touch(&mods.join("SeamlessCoop").join("nrsc.dll"));
    touch(&mods.join("Hybrid").join("mod.ini"));
    touch(&mods.join("Hybrid").join("hybrid.dll"));
    touch(&mods.join("nighter.dll"));
    touch(&mods.join("oo2core_9_win64.dll"));
    touch(&mods.join(".git").join("config.ini"));
    touch(&mods.join("Empty").join("readme.txt"));

    let ext_pkg = tmp.path().join("ExternalPack");
    fs::create_dir_all(&ext_pkg).unwrap();
    let mut registry = ExternalRegistry::default();
    registry
        .packages
        .insert("ExternalPack".into(), ext_pkg.to_string_lossy().into_owned());
    registry
        .natives
        .insert("gone.dll".into(), tmp.path().join("gone.dll").to_string_lossy().into_owned());

    let result = scan_mods_directory(&mods, &registry).unwrap();
    assert_eq!(
        result.packages,
        vec!["Content", "Hybrid", "ExternalPack (external)"]
    );
    assert_eq!(
        result.natives,
        vec!["Hybrid/hybrid.dll", "SeamlessCoop/nrsc.dll", "nighter.dll"]
    );
}

#[test]
fn missing_mods_dir_lists_only_externals() {
    let tmp = tempfile::tempdir().unwrap();
    let dll = tmp.path().join("tool.dll");
    fs::write(&dll, b"").unwrap();
    let mut registry = ExternalRegistry::default();
    registry
        .natives
        .insert("tool.dll".into(), dll.to_string_lossy().into_owned());

    let result = scan_mods_directory(&tmp.path().join("nope"), &registry).unwrap();
    assert!(result.packages.is_empty());
    assert_eq!(result.natives, vec!["tool.dll (external)"]);
}

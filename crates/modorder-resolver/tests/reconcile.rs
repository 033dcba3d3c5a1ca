use modorder_core::entity::{Constraint, EntityKind, Native, NativeAttrs, Package};
use modorder_resolver::{ConstraintIssue, LoadOrderResolver};

#[test]
fn reconcile_purges_disabled_references() {
    let mut a = Package::new("A", "A");
    a.load_before = Some(vec![Constraint::required("B"), Constraint::required("Gone")]);
    let mut b = Package::new("B", "B");
    b.load_after = Some(vec![Constraint::optional("Gone")]);
    let mut r = LoadOrderResolver::from_entities(vec![a, b], Vec::new());

    r.reconcile();
    assert_eq!(
        r.package("A").unwrap().load_before,
        Some(vec![Constraint::required("B")])
    );
    assert_eq!(r.package("B").unwrap().load_after, None);

    r.toggle_enabled(EntityKind::Package, "B");
    r.reconcile();
    assert_eq!(r.package("A").unwrap().load_before, None);
}

#[test]
fn reconcile_keeps_natives_by_file_name() {
    let mut a = Native::new("Mods/a/a.dll");
    a.load_before = Some(vec![Constraint::required("b.dll")]);
    let b = Native::new(r"D:\ext\b.dll");
    let mut r = LoadOrderResolver::from_entities(Vec::new(), vec![a, b]);
    r.reconcile();
    assert_eq!(
        r.native_load_before("a.dll").unwrap(),
        &[Constraint::required("b.dll")]
    );
}

#[test]
fn lookup_accepts_decorated_and_partial_names() {
    let mut r = LoadOrderResolver::new();
    r.enable_native("SeamlessCoop/nrsc.dll", NativeAttrs::default());
    r.enable_package("ModA", "ModA");
    assert!(r.native("nrsc.dll").is_some());
    assert!(r.native("SeamlessCoop/nrsc.dll").is_some());
    assert!(r.native("sc.dll").is_none());
    assert!(r.package("ModA (external)").is_some());
    assert!(r.disable(EntityKind::Native, "nrsc.dll (external)"));
    assert!(r.natives().is_empty());
}

#[test]
fn duplicate_native_rejected() {
    let mut r = LoadOrderResolver::new();
    assert!(r.enable(EntityKind::Native, "a.dll", None));
    assert!(!r.enable(EntityKind::Native, "a.dll", None));
    assert!(r.enable(EntityKind::Package, "Pkg", Some("/ext/Pkg")));
    assert_eq!(r.package("Pkg").unwrap().source, "/ext/Pkg");
}

#[test]
fn comments_are_trimmed() {
    let mut r = LoadOrderResolver::new();
    r.enable_package("ModA", "ModA");
    assert!(r.set_comment(EntityKind::Package, "ModA", "  needs patch 1.2  "));
    assert_eq!(r.package("ModA").unwrap().comment, "needs patch 1.2");
    assert!(!r.set_comment(EntityKind::Native, "none.dll", "x"));
}

#[test]
fn diagnose_reports_dangling_and_contradictions() {
    let mut a = Package::new("A", "A");
    a.load_after = Some(vec![Constraint::optional("Gone")]);
    let mut x = Native::new("x.dll");
    x.load_before = Some(vec![Constraint::required("y.dll")]);
    let mut y = Native::new("y.dll");
    y.load_before = Some(vec![Constraint::required("x.dll")]);
    let r = LoadOrderResolver::from_entities(vec![a], vec![x, y]);

    let report = r.diagnose();
    assert!(report.issues.contains(&ConstraintIssue::DanglingTarget {
        kind: EntityKind::Package,
        owner: "A".to_string(),
        target: "Gone".to_string(),
    }));
    assert!(report.issues.contains(&ConstraintIssue::Contradiction {
        first: "x.dll".to_string(),
        second: "y.dll".to_string(),
    }));
}

#[test]
fn diagnose_clean_state() {
    let mut r = LoadOrderResolver::new();
    r.enable_package("A", "A");
    r.enable_package("B", "B");
    r.set_force_last("B");
    assert!(r.diagnose().is_empty());
}

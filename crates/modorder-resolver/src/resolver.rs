//! The load-order resolver: an in-memory arena of packages and natives plus
//! every operation that mutates their ordering constraints.
//!
//! Mutations return `bool`; "not found" and "not applicable" are both
//! reported as `false`. After enabling or disabling entities callers run
//! [`LoadOrderResolver::reconcile`] (and [`LoadOrderResolver::on_entity_enabled`]
//! for an enable) to restore the invariants:
//!
//! * constraint lists only name enabled entities of the same kind;
//! * at most one package holds the force-last marker and at most one native
//!   holds the force-first marker;
//! * fixed precedence rules hold for every enabled pair, and no pair of
//!   natives is ordered both ways.

use std::collections::HashSet;

use modorder_core::entity::{
    collapse, has_target, retain, targets, Constraint, EntityKind, Native, NativeAttrs, Package,
};
use modorder_core::key::EntityKey;
use modorder_util::errors::ModorderError;

use crate::graph::OrderGraph;
use crate::report::{ConstraintIssue, ConstraintReport};
use crate::rules::{self, FixedOrder};

/// With this many other enabled packages or fewer, a single overlapping
/// `load_after` reference is enough to recognise the force-last marker.
const FORCE_LAST_SMALL_SET: usize = 3;

/// Entity counts, as shown in the launcher header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_packages: usize,
    pub enabled_packages: usize,
    pub total_natives: usize,
    pub enabled_natives: usize,
}

#[derive(Debug, Clone)]
pub struct LoadOrderResolver {
    packages: Vec<Package>,
    natives: Vec<Native>,
    fixed_orders: Vec<FixedOrder>,
}

impl Default for LoadOrderResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadOrderResolver {
    /// An empty resolver using the built-in fixed precedence table.
    pub fn new() -> Self {
        Self::with_fixed_orders(FixedOrder::defaults())
    }

    /// An empty resolver using a custom fixed precedence table.
    pub fn with_fixed_orders(fixed_orders: Vec<FixedOrder>) -> Self {
        Self {
            packages: Vec::new(),
            natives: Vec::new(),
            fixed_orders,
        }
    }

    /// A resolver over existing collections (e.g. loaded from a profile).
    pub fn from_entities(packages: Vec<Package>, natives: Vec<Native>) -> Self {
        Self {
            packages,
            natives,
            fixed_orders: FixedOrder::defaults(),
        }
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn natives(&self) -> &[Native] {
        &self.natives
    }

    pub fn fixed_orders(&self) -> &[FixedOrder] {
        &self.fixed_orders
    }

    pub fn package(&self, id: &str) -> Option<&Package> {
        self.package_index(&EntityKey::parse(id)).map(|i| &self.packages[i])
    }

    pub fn native(&self, name: &str) -> Option<&Native> {
        self.native_index(&EntityKey::parse(name)).map(|i| &self.natives[i])
    }

    fn package_index(&self, key: &EntityKey) -> Option<usize> {
        self.packages.iter().position(|p| p.matches(key))
    }

    fn native_index(&self, key: &EntityKey) -> Option<usize> {
        self.natives.iter().position(|n| n.matches(key))
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total_packages: self.packages.len(),
            enabled_packages: self.packages.iter().filter(|p| p.enabled).count(),
            total_natives: self.natives.len(),
            enabled_natives: self.natives.iter().filter(|n| n.enabled).count(),
        }
    }

    // Enable / disable

    /// Append an enabled package. Fails if a package with the same id exists.
    pub fn enable_package(&mut self, id: &str, source: &str) -> bool {
        let key = EntityKey::parse(id);
        if self.package_index(&key).is_some() {
            tracing::debug!("package {key} already present");
            return false;
        }
        let mut package = Package::new(key.as_str(), source);
        package.external = key.is_external();
        tracing::debug!("enabled package {key}");
        self.packages.push(package);
        true
    }

    /// Append an enabled native. Fails if a native with the same path exists.
    pub fn enable_native(&mut self, path: &str, attrs: NativeAttrs) -> bool {
        let key = EntityKey::parse(path);
        let stored = attrs.source.unwrap_or_else(|| key.as_str().to_string());
        if self
            .natives
            .iter()
            .any(|n| n.path == key.as_str() || n.path == stored)
        {
            tracing::debug!("native {key} already present");
            return false;
        }
        let load_early = attrs.load_early
            || rules::wants_early_load(key.as_str())
            || rules::wants_early_load(&stored);

        let mut native = Native::new(stored);
        native.external = key.is_external();
        native.optional = attrs.optional;
        native.initializer = attrs.initializer;
        native.finalizer = attrs.finalizer;
        native.load_early = load_early;
        tracing::debug!("enabled native {} (load_early={load_early})", native.path);
        self.natives.push(native);
        true
    }

    /// Kind-dispatching enable. `source` defaults to the identifier.
    pub fn enable(&mut self, kind: EntityKind, identifier: &str, source: Option<&str>) -> bool {
        match kind {
            EntityKind::Package => {
                let key = EntityKey::parse(identifier);
                let source = source.unwrap_or(key.as_str()).to_string();
                self.enable_package(identifier, &source)
            }
            EntityKind::Native => self.enable_native(
                identifier,
                NativeAttrs {
                    source: source.map(str::to_string),
                    ..NativeAttrs::default()
                },
            ),
        }
    }

    /// Remove the matching entity. Does not touch other entities' constraints;
    /// run [`Self::reconcile`] afterwards.
    pub fn disable(&mut self, kind: EntityKind, identifier: &str) -> bool {
        let key = EntityKey::parse(identifier);
        let removed = match kind {
            EntityKind::Package => self
                .package_index(&key)
                .map(|i| self.packages.remove(i).id),
            EntityKind::Native => self.native_index(&key).map(|i| self.natives.remove(i).path),
        };
        match removed {
            Some(name) => {
                tracing::debug!("disabled {kind} {name}");
                true
            }
            None => false,
        }
    }

    /// Flip the enabled flag of the matching entity in place.
    pub fn toggle_enabled(&mut self, kind: EntityKind, identifier: &str) -> bool {
        let key = EntityKey::parse(identifier);
        let enabled = match kind {
            EntityKind::Package => {
                let Some(i) = self.package_index(&key) else {
                    return false;
                };
                &mut self.packages[i].enabled
            }
            EntityKind::Native => {
                let Some(i) = self.native_index(&key) else {
                    return false;
                };
                &mut self.natives[i].enabled
            }
        };
        *enabled = !*enabled;
        tracing::debug!("toggled {kind} {key} -> enabled={}", *enabled);
        true
    }

    // Reconciliation

    /// Drop every constraint that names a disabled or removed entity, then
    /// re-apply the fixed precedence rules.
    pub fn reconcile(&mut self) {
        let enabled_packages: HashSet<String> = self
            .packages
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.name().to_string())
            .collect();
        for p in &mut self.packages {
            retain(&mut p.load_after, |c| enabled_packages.contains(&c.id));
            retain(&mut p.load_before, |c| enabled_packages.contains(&c.id));
        }

        let enabled_natives: HashSet<String> = self
            .natives
            .iter()
            .filter(|n| n.enabled)
            .map(|n| n.name().to_string())
            .collect();
        for n in &mut self.natives {
            retain(&mut n.load_after, |c| enabled_natives.contains(&c.id));
            retain(&mut n.load_before, |c| enabled_natives.contains(&c.id));
        }

        self.ensure_fixed_orders();
    }

    /// Fold a newly enabled entity into the current force marker, if any
    /// entity of that kind holds one, then re-apply the fixed rules.
    pub fn on_entity_enabled(&mut self, kind: EntityKind, identifier: &str) {
        let key = EntityKey::parse(identifier);
        match kind {
            EntityKind::Package => {
                let new_name = self
                    .package_index(&key)
                    .map(|i| self.packages[i].name().to_string())
                    .unwrap_or_else(|| key.as_str().to_string());
                let holder = (0..self.packages.len()).find(|&i| {
                    let p = &self.packages[i];
                    p.enabled
                        && p.id != new_name
                        && self.holds_force_last(i, Some(new_name.as_str()))
                });
                if let Some(i) = holder {
                    tracing::debug!("rebuilding force-last of {}", self.packages[i].id);
                    self.rebuild_force_last(i);
                }
            }
            EntityKind::Native => {
                let new_name = self
                    .native_index(&key)
                    .map(|i| self.natives[i].name().to_string())
                    .unwrap_or_else(|| key.file_name().to_string());
                let holder = (0..self.natives.len()).find(|&i| {
                    let n = &self.natives[i];
                    n.enabled
                        && n.name() != new_name
                        && self.holds_force_first(i, Some(new_name.as_str()))
                });
                if let Some(i) = holder {
                    tracing::debug!("rebuilding force-first of {}", self.natives[i].name());
                    self.rebuild_force_first(i);
                }
            }
        }
        self.ensure_fixed_orders();
    }

    // Force last (packages)

    /// Make `id` load after every other enabled package. Any other package's
    /// `load_after` is cleared so only one marker exists.
    pub fn set_force_last(&mut self, id: &str) -> bool {
        let Some(idx) = self.package_index(&EntityKey::parse(id)) else {
            return false;
        };
        for (i, p) in self.packages.iter_mut().enumerate() {
            if i != idx {
                p.load_after = None;
            }
        }
        self.rebuild_force_last(idx);
        true
    }

    pub fn clear_force_last(&mut self, id: &str) -> bool {
        match self.package_index(&EntityKey::parse(id)) {
            Some(idx) => {
                self.packages[idx].load_after = None;
                true
            }
            None => false,
        }
    }

    /// Whether `id` holds the force-last marker.
    ///
    /// Recognised by overlap rather than equality so a marker that went
    /// partially stale after enable/disable is still found: with three or
    /// fewer other enabled packages one overlapping reference suffices,
    /// otherwise at least half of them must be referenced.
    pub fn is_force_last(&self, id: &str) -> bool {
        self.package_index(&EntityKey::parse(id))
            .is_some_and(|idx| self.holds_force_last(idx, None))
    }

    fn holds_force_last(&self, idx: usize, ignore: Option<&str>) -> bool {
        let pkg = &self.packages[idx];
        let others: HashSet<&str> = self
            .packages
            .iter()
            .filter(|p| p.enabled && p.id != pkg.id && Some(p.id.as_str()) != ignore)
            .map(|p| p.name())
            .collect();
        if others.is_empty() {
            return false;
        }
        let overlap = targets(&pkg.load_after)
            .filter(|t| others.contains(t))
            .collect::<HashSet<_>>()
            .len();
        if others.len() <= FORCE_LAST_SMALL_SET {
            overlap >= 1
        } else {
            overlap * 2 >= others.len()
        }
    }

    fn rebuild_force_last(&mut self, idx: usize) {
        let target = self.packages[idx].id.clone();
        let others: Vec<Constraint> = self
            .packages
            .iter()
            .filter(|p| p.enabled && p.id != target)
            .map(|p| Constraint::optional(p.name()))
            .collect();
        self.packages[idx].load_after = collapse(others);
    }

    // Force first (natives)

    /// Make `name` load before every other enabled native.
    ///
    /// Other natives keep only the fixed-precedence part of their
    /// `load_before`. The new set skips natives a fixed rule places ahead of
    /// `name`, and targets already reachable through another target are
    /// dropped after the fixed rules are re-applied.
    pub fn set_force_first(&mut self, name: &str) -> bool {
        let Some(idx) = self.native_index(&EntityKey::parse(name)) else {
            return false;
        };
        let fixed = &self.fixed_orders;
        for (i, n) in self.natives.iter_mut().enumerate() {
            if i == idx {
                continue;
            }
            let owner = n.name().to_string();
            retain(&mut n.load_before, |c| rules::requires(fixed, &owner, &c.id));
        }
        self.rebuild_force_first(idx);
        true
    }

    /// Drop the force-first list of `name`. Fixed-rule edges it owns are
    /// restored right away.
    pub fn clear_force_first(&mut self, name: &str) -> bool {
        if !self.clear_native_load_before(name) {
            return false;
        }
        self.ensure_fixed_orders();
        true
    }

    /// Whether `name` holds the force-first marker: every other enabled
    /// native is either reachable from it through the ordering graph or
    /// placed ahead of it by a fixed rule.
    pub fn is_force_first(&self, name: &str) -> bool {
        self.native_index(&EntityKey::parse(name))
            .is_some_and(|idx| self.holds_force_first(idx, None))
    }

    fn holds_force_first(&self, idx: usize, ignore: Option<&str>) -> bool {
        let native = &self.natives[idx];
        if native.load_before.is_none() {
            return false;
        }
        let own = native.name();
        // A list made only of fixed-rule edges is not a marker.
        if targets(&native.load_before).all(|t| rules::requires(&self.fixed_orders, own, t)) {
            return false;
        }
        let others: Vec<&str> = self
            .natives
            .iter()
            .filter(|n| n.enabled && n.name() != own && Some(n.name()) != ignore)
            .map(|n| n.name())
            .collect();
        if others.is_empty() {
            return false;
        }
        let graph = OrderGraph::from_natives(&self.natives, None);
        let covered: HashSet<&str> = graph.reachable_from(own).into_iter().collect();
        others
            .iter()
            .all(|o| covered.contains(o) || rules::requires(&self.fixed_orders, o, own))
    }

    fn rebuild_force_first(&mut self, idx: usize) {
        let own = self.natives[idx].name().to_string();
        let others: Vec<Constraint> = self
            .natives
            .iter()
            .filter(|n| n.enabled && n.name() != own)
            .map(|n| n.name())
            .filter(|other| !rules::requires(&self.fixed_orders, other, &own))
            .map(Constraint::required)
            .collect();
        self.natives[idx].load_before = collapse(others);
        self.ensure_fixed_orders();
        self.optimize_force_first(idx);
    }

    /// Drop targets of the native at `idx` that another retained target
    /// already reaches. Fixed-rule edges are never dropped.
    fn optimize_force_first(&mut self, idx: usize) {
        let Some(current) = self.natives[idx].load_before.clone() else {
            return;
        };
        let own = self.natives[idx].name().to_string();
        let graph = OrderGraph::from_natives(&self.natives, Some(idx));

        let mut retained = current.clone();
        for c in &current {
            if rules::requires(&self.fixed_orders, &own, &c.id) {
                continue;
            }
            let redundant = retained
                .iter()
                .any(|other| other.id != c.id && graph.reaches(&other.id, &c.id));
            if redundant {
                tracing::debug!("{own}: {} reachable through chain, dropping", c.id);
                retained.retain(|other| other.id != c.id);
            }
        }
        self.natives[idx].load_before = collapse(retained);
    }

    // Pairwise precedence

    /// Require `first` to load before `second`. Both natives must exist and be
    /// enabled. A reverse relation is removed first, so the latest request
    /// wins.
    pub fn set_pairwise_order(&mut self, first: &str, second: &str) -> bool {
        let (Some(a), Some(b)) = (
            self.native_index(&EntityKey::parse(first)),
            self.native_index(&EntityKey::parse(second)),
        ) else {
            return false;
        };
        if a == b || !self.natives[a].enabled || !self.natives[b].enabled {
            return false;
        }
        let a_name = self.natives[a].name().to_string();
        let b_name = self.natives[b].name().to_string();

        if has_target(&self.natives[b].load_before, &a_name)
            || has_target(&self.natives[a].load_after, &b_name)
        {
            tracing::debug!("removing reverse order {b_name} -> {a_name}");
            retain(&mut self.natives[b].load_before, |c| c.id != a_name);
            retain(&mut self.natives[a].load_after, |c| c.id != b_name);
        }

        let list = self.natives[a].load_before.get_or_insert_with(Vec::new);
        match list.iter_mut().find(|c| c.id == b_name) {
            Some(existing) => existing.optional = false,
            None => list.push(Constraint::required(b_name)),
        }
        true
    }

    /// Remove a `first` before `second` constraint. Returns whether one was
    /// removed.
    pub fn remove_pairwise_order(&mut self, first: &str, second: &str) -> bool {
        let Some(a) = self.native_index(&EntityKey::parse(first)) else {
            return false;
        };
        let target = EntityKey::parse(second).file_name().to_string();
        let before = &mut self.natives[a].load_before;
        if !has_target(before, &target) {
            return false;
        }
        retain(before, |c| c.id != target);
        true
    }

    /// Apply every fixed precedence rule whose two natives are enabled.
    pub fn ensure_fixed_orders(&mut self) {
        let rules = self.fixed_orders.clone();
        for rule in &rules {
            if self.enabled_native_named(&rule.first) && self.enabled_native_named(&rule.second) {
                self.set_pairwise_order(&rule.first, &rule.second);
            }
        }
    }

    fn enabled_native_named(&self, name: &str) -> bool {
        self.natives.iter().any(|n| n.enabled && n.name() == name)
    }

    // Per-native attributes

    pub fn native_load_before(&self, name: &str) -> Option<&[Constraint]> {
        self.native(name).and_then(|n| n.load_before.as_deref())
    }

    /// Replace the `load_before` list of `name`. An empty `names` clears it.
    ///
    /// Any reverse relation to a listed native is removed, as with
    /// [`set_pairwise_order`](Self::set_pairwise_order).
    pub fn set_native_load_before(&mut self, name: &str, names: &[&str], optional: bool) -> bool {
        let Some(idx) = self.native_index(&EntityKey::parse(name)) else {
            return false;
        };
        let own = self.natives[idx].name().to_string();
        let list: Vec<Constraint> = names
            .iter()
            .map(|t| Constraint {
                id: EntityKey::parse(t).file_name().to_string(),
                optional,
            })
            .filter(|c| c.id != own)
            .collect();

        for c in &list {
            retain(&mut self.natives[idx].load_after, |a| a.id != c.id);
            for (i, other) in self.natives.iter_mut().enumerate() {
                if i != idx && other.name() == c.id {
                    retain(&mut other.load_before, |b| b.id != own);
                }
            }
        }
        self.natives[idx].load_before = collapse(list);
        true
    }

    pub fn clear_native_load_before(&mut self, name: &str) -> bool {
        match self.native_index(&EntityKey::parse(name)) {
            Some(idx) => {
                self.natives[idx].load_before = None;
                true
            }
            None => false,
        }
    }

    pub fn set_native_load_early(&mut self, name: &str, load_early: bool) -> bool {
        match self.native_index(&EntityKey::parse(name)) {
            Some(idx) => {
                self.natives[idx].load_early = load_early;
                true
            }
            None => false,
        }
    }

    pub fn is_native_load_early(&self, name: &str) -> bool {
        self.native(name).is_some_and(|n| n.load_early)
    }

    /// Set the free-text comment of an entity (trimmed).
    pub fn set_comment(&mut self, kind: EntityKind, identifier: &str, comment: &str) -> bool {
        let key = EntityKey::parse(identifier);
        let slot = match kind {
            EntityKind::Package => {
                let Some(i) = self.package_index(&key) else {
                    return false;
                };
                &mut self.packages[i].comment
            }
            EntityKind::Native => {
                let Some(i) = self.native_index(&key) else {
                    return false;
                };
                &mut self.natives[i].comment
            }
        };
        *slot = comment.trim().to_string();
        true
    }

    // Derived order

    /// Names of the enabled entities of `kind` in an order satisfying every
    /// constraint between them.
    pub fn load_order(&self, kind: EntityKind) -> miette::Result<Vec<String>> {
        let graph = match kind {
            EntityKind::Package => OrderGraph::from_packages(&self.packages),
            EntityKind::Native => OrderGraph::from_natives(&self.natives, None),
        };
        match graph.topological_order() {
            Ok(order) => Ok(order.into_iter().map(str::to_string).collect()),
            Err(cycle) => Err(ModorderError::Resolution {
                message: format!("{kind} constraints form a cycle: {}", cycle.join(" -> ")),
            }
            .into()),
        }
    }

    /// Inspect the current constraints without changing anything.
    pub fn diagnose(&self) -> ConstraintReport {
        let mut report = ConstraintReport::new();

        let enabled_packages: HashSet<&str> = self
            .packages
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.name())
            .collect();
        for p in self.packages.iter().filter(|p| p.enabled) {
            for target in targets(&p.load_after).chain(targets(&p.load_before)) {
                if !enabled_packages.contains(target) {
                    report.add(ConstraintIssue::DanglingTarget {
                        kind: EntityKind::Package,
                        owner: p.id.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }

        let enabled_natives: HashSet<&str> = self
            .natives
            .iter()
            .filter(|n| n.enabled)
            .map(|n| n.name())
            .collect();
        for n in self.natives.iter().filter(|n| n.enabled) {
            for target in targets(&n.load_after).chain(targets(&n.load_before)) {
                if !enabled_natives.contains(target) {
                    report.add(ConstraintIssue::DanglingTarget {
                        kind: EntityKind::Native,
                        owner: n.name().to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }

        let enabled: Vec<&Native> = self.natives.iter().filter(|n| n.enabled).collect();
        for (i, a) in enabled.iter().enumerate() {
            for b in &enabled[i + 1..] {
                let a_first = has_target(&a.load_before, b.name())
                    || has_target(&b.load_after, a.name());
                let b_first = has_target(&b.load_before, a.name())
                    || has_target(&a.load_after, b.name());
                if a_first && b_first {
                    report.add(ConstraintIssue::Contradiction {
                        first: a.name().to_string(),
                        second: b.name().to_string(),
                    });
                }
            }
        }

        let last: Vec<String> = (0..self.packages.len())
            .filter(|&i| self.packages[i].enabled && self.holds_force_last(i, None))
            .map(|i| self.packages[i].id.clone())
            .collect();
        if last.len() > 1 {
            report.add(ConstraintIssue::MultipleMarkers {
                kind: EntityKind::Package,
                holders: last,
            });
        }
        let first: Vec<String> = (0..self.natives.len())
            .filter(|&i| self.natives[i].enabled && self.holds_force_first(i, None))
            .map(|i| self.natives[i].name().to_string())
            .collect();
        if first.len() > 1 {
            report.add(ConstraintIssue::MultipleMarkers {
                kind: EntityKind::Native,
                holders: first,
            });
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_rejects_duplicates_after_stripping_decoration() {
        let mut r = LoadOrderResolver::new();
        assert!(r.enable_package("ModA", "ModA"));
        assert!(!r.enable_package("ModA (external)", "/ext/ModA"));
        assert_eq!(r.packages().len(), 1);
    }

    #[test]
    fn enable_native_applies_early_load_default() {
        let mut r = LoadOrderResolver::new();
        assert!(r.enable_native("SeamlessCoop/nrsc.dll", NativeAttrs::default()));
        assert!(r.is_native_load_early("nrsc.dll"));
    }

    #[test]
    fn external_native_stored_by_source_path() {
        let mut r = LoadOrderResolver::new();
        let attrs = NativeAttrs {
            source: Some("/ext/tools/ext.dll".to_string()),
            ..NativeAttrs::default()
        };
        assert!(r.enable_native("ext.dll (external)", attrs));
        let native = r.native("ext.dll").unwrap();
        assert_eq!(native.path, "/ext/tools/ext.dll");
        assert!(native.external);
    }

    #[test]
    fn toggle_keeps_entity() {
        let mut r = LoadOrderResolver::new();
        r.enable_package("ModA", "ModA");
        assert!(r.toggle_enabled(EntityKind::Package, "ModA"));
        assert_eq!(r.packages().len(), 1);
        assert!(!r.packages()[0].enabled);
        assert!(!r.toggle_enabled(EntityKind::Package, "Missing"));
    }

    #[test]
    fn summary_counts() {
        let mut r = LoadOrderResolver::new();
        r.enable_package("A", "A");
        r.enable_package("B", "B");
        r.enable_native("x.dll", NativeAttrs::default());
        r.toggle_enabled(EntityKind::Package, "B");
        assert_eq!(
            r.summary(),
            Summary {
                total_packages: 2,
                enabled_packages: 1,
                total_natives: 1,
                enabled_natives: 1,
            }
        );
    }
}

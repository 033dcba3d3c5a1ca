//! A launcher session: configuration, external registry and resolver loaded
//! together, with the follow-up passes every mutation needs.

use std::path::Path;

use modorder_core::config::LauncherConfig;
use modorder_core::entity::EntityKind;
use modorder_core::key::{decorate_external, EntityKey};
use modorder_core::registry::ExternalRegistry;
use modorder_core::scan::ScanResult;
use modorder_resolver::LoadOrderResolver;

use crate::{ops_profile, ops_registry, ops_scan};

pub struct Session {
    pub config: LauncherConfig,
    pub registry: ExternalRegistry,
    pub resolver: LoadOrderResolver,
}

impl Session {
    /// Load the registry, then the profile. Never fails; unreadable files are
    /// logged and replaced with empty state.
    pub fn open(config: LauncherConfig) -> Self {
        let registry = ExternalRegistry::load(&config.registry_path());
        let resolver = ops_profile::load_profile(&config, &registry);
        Self {
            config,
            registry,
            resolver,
        }
    }

    pub fn mods_dir(&self) -> &Path {
        self.config.mods_dir()
    }

    pub fn scan(&self) -> miette::Result<ScanResult> {
        ops_scan::scan_mods_directory(self.mods_dir(), &self.registry)
    }

    /// Enable an entity and fold it into the current force markers.
    ///
    /// Registry entries are enabled with their registered absolute path,
    /// whether or not `identifier` carries the external decoration.
    pub fn enable(&mut self, kind: EntityKind, identifier: &str) -> bool {
        let key = EntityKey::parse(identifier);
        let external_path = match kind {
            EntityKind::Package => self.registry.package_path(key.as_str()),
            EntityKind::Native => self.registry.native_path(key.file_name()),
        }
        .map(str::to_string);

        let enabled = match external_path {
            Some(ref path) => {
                let name = match kind {
                    EntityKind::Package => key.as_str(),
                    EntityKind::Native => key.file_name(),
                };
                self.resolver
                    .enable(kind, &decorate_external(name), Some(path.as_str()))
            }
            None if key.is_external() => {
                tracing::warn!("{kind} {key} is not in the external registry");
                false
            }
            None => self.resolver.enable(kind, key.as_str(), None),
        };
        if enabled {
            self.resolver.on_entity_enabled(kind, key.as_str());
            self.apply_comment(kind, &key);
        }
        enabled
    }

    fn apply_comment(&mut self, kind: EntityKind, key: &EntityKey) {
        let name = match kind {
            EntityKind::Package => key.as_str(),
            EntityKind::Native => key.file_name(),
        };
        let comment = self.registry.comment(kind, name).to_string();
        if !comment.is_empty() {
            self.resolver.set_comment(kind, key.as_str(), &comment);
        }
    }

    /// Remove an entity and purge references to it.
    pub fn disable(&mut self, kind: EntityKind, identifier: &str) -> bool {
        let removed = self.resolver.disable(kind, identifier);
        if removed {
            self.resolver.reconcile();
        }
        removed
    }

    /// Flip an entity's enabled flag and run the matching follow-up pass.
    pub fn toggle(&mut self, kind: EntityKind, identifier: &str) -> bool {
        if !self.resolver.toggle_enabled(kind, identifier) {
            return false;
        }
        self.resolver.reconcile();
        let now_enabled = match kind {
            EntityKind::Package => self.resolver.package(identifier).is_some_and(|p| p.enabled),
            EntityKind::Native => self.resolver.native(identifier).is_some_and(|n| n.enabled),
        };
        if now_enabled {
            self.resolver.on_entity_enabled(kind, identifier);
        }
        true
    }

    /// Store a comment in the registry and on the entity, if enabled.
    pub fn set_comment(&mut self, kind: EntityKind, identifier: &str, comment: &str) {
        let key = EntityKey::parse(identifier);
        let name = match kind {
            EntityKind::Package => key.as_str(),
            EntityKind::Native => key.file_name(),
        };
        self.registry.set_comment(kind, name, comment);
        self.resolver.set_comment(kind, identifier, comment);
    }

    /// Register an external mod at `path`. Returns its registry name.
    pub fn add_external(&mut self, kind: EntityKind, path: &Path) -> miette::Result<String> {
        let mods_dir = self.config.mods_dir().to_path_buf();
        match kind {
            EntityKind::Package => {
                ops_registry::add_external_package(&mut self.registry, &mods_dir, path)
            }
            EntityKind::Native => {
                ops_registry::add_external_native(&mut self.registry, &mods_dir, path)
            }
        }
    }

    /// Unregister an external mod. An enabled entity of that name is disabled
    /// as well.
    pub fn remove_external(&mut self, kind: EntityKind, name: &str) -> bool {
        let key = EntityKey::parse(name);
        let registered_path = match kind {
            EntityKind::Package => self.registry.package_path(key.as_str()),
            EntityKind::Native => self.registry.native_path(key.as_str()),
        }
        .map(str::to_string);
        if !ops_registry::remove_external(&mut self.registry, kind, key.as_str()) {
            return false;
        }
        let target = registered_path.unwrap_or_else(|| key.as_str().to_string());
        self.disable(kind, &target);
        true
    }

    /// Drop registry entries that are gone or inside the Mods directory.
    pub fn cleanup_external(&mut self) -> ops_registry::CleanupResult {
        let mods_dir = self.config.mods_dir().to_path_buf();
        ops_registry::cleanup_external(&mut self.registry, &mods_dir)
    }

    /// Persist the profile. Failures are logged and reported as `false`.
    pub fn save_profile(&self) -> bool {
        match ops_profile::save_profile(&self.config, &self.resolver) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to save profile: {e}");
                false
            }
        }
    }

    /// Persist the registry. Failures are logged and reported as `false`.
    pub fn save_registry(&self) -> bool {
        match self.registry.save(&self.config.registry_path()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to save external registry: {e}");
                false
            }
        }
    }
}

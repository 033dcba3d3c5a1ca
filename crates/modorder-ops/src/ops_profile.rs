//! Operation: load and save the load-order profile.

use modorder_core::config::LauncherConfig;
use modorder_core::profile::ProfileDocument;
use modorder_core::registry::ExternalRegistry;
use modorder_resolver::LoadOrderResolver;

/// Load the profile named by `config` into a resolver.
///
/// Never fails: a missing profile gives an empty resolver, and a malformed
/// one is logged and replaced by an empty resolver.
pub fn load_profile(config: &LauncherConfig, registry: &ExternalRegistry) -> LoadOrderResolver {
    let path = config.profile_path();
    if !path.is_file() {
        tracing::debug!("no profile at {}", path.display());
        return LoadOrderResolver::new();
    }
    match ProfileDocument::from_path(&path) {
        Ok(doc) => {
            let (packages, natives) = doc.into_entities(registry);
            tracing::debug!(
                "loaded {} packages and {} natives from {}",
                packages.len(),
                natives.len(),
                path.display()
            );
            LoadOrderResolver::from_entities(packages, natives)
        }
        Err(e) => {
            tracing::warn!("{e}; starting with an empty profile");
            LoadOrderResolver::new()
        }
    }
}

/// Write the enabled entities of `resolver` to the profile named by `config`.
pub fn save_profile(config: &LauncherConfig, resolver: &LoadOrderResolver) -> miette::Result<()> {
    let doc = ProfileDocument::from_entities(
        resolver.packages(),
        resolver.natives(),
        &config.profile.game,
        &config.profile.version,
    );
    doc.write_to(&config.profile_path())
}

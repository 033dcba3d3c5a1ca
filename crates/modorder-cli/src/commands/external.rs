use miette::Result;

use modorder_core::entity::EntityKind;
use modorder_ops::Session;
use modorder_util::progress::{status, status_info, status_warn};

use super::{not_found, save_profile, save_registry};
use crate::cli::ExternalAction;

pub fn exec(mut session: Session, action: ExternalAction) -> Result<()> {
    match action {
        ExternalAction::Add { kind, path } => {
            let name = session.add_external(kind, &path)?;
            save_registry(&session)?;
            status("Registered", &format!("external {kind} {name}"));
        }
        ExternalAction::Remove { kind, name } => {
            if !session.remove_external(kind, &name) {
                return Err(not_found(format!("external {kind} '{name}'")));
            }
            save_registry(&session)?;
            save_profile(&session)?;
            status("Removed", &format!("external {kind} {name}"));
        }
        ExternalAction::Check => {
            let report = modorder_ops::ops_registry::check_external(&session.registry);
            if report.packages.is_empty() && report.natives.is_empty() {
                println!("No external mods registered.");
                return Ok(());
            }
            for (kind, entries) in [
                (EntityKind::Package, &report.packages),
                (EntityKind::Native, &report.natives),
            ] {
                for (name, exists) in entries {
                    let state = if *exists { "ok" } else { "missing" };
                    println!("  {kind} {name}: {state}");
                }
            }
        }
        ExternalAction::Cleanup => {
            let result = session.cleanup_external();
            if result.is_empty() {
                status_info("Clean", "no stale external entries");
                return Ok(());
            }
            save_registry(&session)?;
            for name in result.missing.packages.iter().chain(&result.missing.natives) {
                status_warn("Missing", name);
            }
            for name in result.internal.packages.iter().chain(&result.internal.natives) {
                status_warn("Internal", name);
            }
            status(
                "Removed",
                &format!(
                    "{} stale external entries",
                    result.missing.len() + result.internal.len()
                ),
            );
        }
    }
    Ok(())
}

use miette::Result;

use modorder_core::entity::EntityKind;
use modorder_ops::Session;
use modorder_util::errors::ModorderError;
use modorder_util::progress::{status, status_info};

use super::{not_found, save_profile};

pub fn enable(mut session: Session, kind: EntityKind, id: &str) -> Result<()> {
    if !session.enable(kind, id) {
        return Err(ModorderError::Generic {
            message: format!("{kind} '{id}' is already enabled or not registered"),
        }
        .into());
    }
    save_profile(&session)?;
    status("Enabled", &format!("{kind} {id}"));
    Ok(())
}

pub fn disable(mut session: Session, kind: EntityKind, id: &str) -> Result<()> {
    if !session.disable(kind, id) {
        return Err(not_found(format!("{kind} '{id}'")));
    }
    save_profile(&session)?;
    status("Disabled", &format!("{kind} {id}"));
    Ok(())
}

pub fn toggle(mut session: Session, kind: EntityKind, id: &str) -> Result<()> {
    if !session.toggle(kind, id) {
        return Err(not_found(format!("{kind} '{id}'")));
    }
    let enabled = match kind {
        EntityKind::Package => session.resolver.package(id).is_some_and(|p| p.enabled),
        EntityKind::Native => session.resolver.native(id).is_some_and(|n| n.enabled),
    };
    save_profile(&session)?;
    if enabled {
        status("Enabled", &format!("{kind} {id}"));
    } else {
        status("Disabled", &format!("{kind} {id}"));
        status_info(
            "Note",
            &format!("{id} is no longer in the profile; use `enable` to restore it"),
        );
    }
    Ok(())
}

use miette::Result;

use modorder_ops::Session;
use modorder_util::progress::{status, status_info};

use super::{not_found, save_profile};

pub fn last(mut session: Session, id: &str, clear: bool) -> Result<()> {
    let changed = if clear {
        session.resolver.clear_force_last(id)
    } else {
        session.resolver.set_force_last(id)
    };
    if !changed {
        return Err(not_found(format!("package '{id}'")));
    }
    save_profile(&session)?;
    if clear {
        status("Cleared", &format!("force-last on {id}"));
    } else if session.resolver.is_force_last(id) {
        status("Forced", &format!("{id} to load last"));
    } else {
        status_info("Skipped", &format!("{id} is the only enabled package"));
    }
    Ok(())
}

pub fn first(mut session: Session, native: &str, clear: bool) -> Result<()> {
    let changed = if clear {
        session.resolver.clear_force_first(native)
    } else {
        session.resolver.set_force_first(native)
    };
    if !changed {
        return Err(not_found(format!("native '{native}'")));
    }
    save_profile(&session)?;
    if clear {
        status("Cleared", &format!("force-first on {native}"));
    } else if session.resolver.is_force_first(native) {
        status("Forced", &format!("{native} to load first"));
    } else {
        status_info("Skipped", &format!("{native} is the only enabled native"));
    }
    Ok(())
}

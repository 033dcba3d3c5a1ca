use miette::Result;

use modorder_ops::Session;
use modorder_util::errors::ModorderError;
use modorder_util::progress::status;

use super::{not_found, save_profile};

pub fn pairwise(mut session: Session, first: &str, second: &str, remove: bool) -> Result<()> {
    if remove {
        if !session.resolver.remove_pairwise_order(first, second) {
            return Err(not_found(format!("constraint '{first}' before '{second}'")));
        }
        save_profile(&session)?;
        status("Removed", &format!("{first} before {second}"));
        return Ok(());
    }

    if !session.resolver.set_pairwise_order(first, second) {
        return Err(ModorderError::Generic {
            message: format!("Both '{first}' and '{second}' must be enabled natives"),
        }
        .into());
    }
    session.resolver.ensure_fixed_orders();
    save_profile(&session)?;
    status("Ordered", &format!("{first} before {second}"));
    Ok(())
}

pub fn early(mut session: Session, native: &str, on: bool) -> Result<()> {
    if !session.resolver.set_native_load_early(native, on) {
        return Err(not_found(format!("native '{native}'")));
    }
    save_profile(&session)?;
    let label = if on { "Early" } else { "Normal" };
    status(label, native);
    Ok(())
}

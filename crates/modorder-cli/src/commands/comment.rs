use miette::Result;

use modorder_core::entity::EntityKind;
use modorder_ops::Session;
use modorder_util::progress::status;

use super::{save_profile, save_registry};

pub fn exec(mut session: Session, kind: EntityKind, id: &str, text: &str) -> Result<()> {
    session.set_comment(kind, id, text);
    save_registry(&session)?;
    save_profile(&session)?;
    if text.trim().is_empty() {
        status("Cleared", &format!("comment on {kind} {id}"));
    } else {
        status("Commented", &format!("{kind} {id}"));
    }
    Ok(())
}

use miette::Result;

use modorder_core::entity::EntityKind;
use modorder_ops::Session;

pub fn exec(session: &Session, kind: Option<EntityKind>) -> Result<()> {
    let kinds = match kind {
        Some(k) => vec![k],
        None => vec![EntityKind::Package, EntityKind::Native],
    };
    let show_headers = kinds.len() > 1;
    for kind in kinds {
        let order = session.resolver.load_order(kind)?;
        if show_headers {
            println!("{kind}s:");
        }
        for (i, name) in order.iter().enumerate() {
            println!("  {:>2}. {name}", i + 1);
        }
    }
    Ok(())
}

use miette::Result;

use modorder_core::entity::EntityKind;
use modorder_ops::Session;
use modorder_util::progress::status_warn;

pub fn exec(session: &Session) -> Result<()> {
    let report = session.resolver.diagnose();
    print!("{report}");
    if report.is_empty() {
        println!();
    }

    for kind in [EntityKind::Package, EntityKind::Native] {
        if let Err(e) = session.resolver.load_order(kind) {
            status_warn("Warning", &e.to_string());
        }
    }
    Ok(())
}

use miette::Result;

use modorder_core::entity::EntityKind;
use modorder_ops::Session;

pub fn exec(session: &Session) -> Result<()> {
    let result = session.scan()?;
    if result.is_empty() {
        println!("No mods found in {}", session.mods_dir().display());
        return Ok(());
    }

    println!("Packages ({}):", result.packages.len());
    for id in &result.packages {
        println!("  {} {id}", mark(session, EntityKind::Package, id));
    }
    println!("Natives ({}):", result.natives.len());
    for path in &result.natives {
        println!("  {} {path}", mark(session, EntityKind::Native, path));
    }
    Ok(())
}

fn mark(session: &Session, kind: EntityKind, id: &str) -> &'static str {
    let enabled = match kind {
        EntityKind::Package => session.resolver.package(id).is_some_and(|p| p.enabled),
        EntityKind::Native => session.resolver.native(id).is_some_and(|n| n.enabled),
    };
    if enabled {
        "[x]"
    } else {
        "[ ]"
    }
}

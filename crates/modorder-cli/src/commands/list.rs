use miette::Result;
use serde_json::json;

use modorder_core::entity::targets;
use modorder_ops::Session;
use modorder_util::errors::ModorderError;

pub fn exec(session: &Session, as_json: bool) -> Result<()> {
    let resolver = &session.resolver;

    if as_json {
        let packages: Vec<_> = resolver
            .packages()
            .iter()
            .map(|p| {
                json!({
                    "id": p.id,
                    "source": p.source,
                    "enabled": p.enabled,
                    "external": p.external,
                    "force_last": resolver.is_force_last(&p.id),
                    "load_after": targets(&p.load_after).collect::<Vec<_>>(),
                    "load_before": targets(&p.load_before).collect::<Vec<_>>(),
                    "comment": p.comment,
                })
            })
            .collect();
        let natives: Vec<_> = resolver
            .natives()
            .iter()
            .map(|n| {
                json!({
                    "path": n.path,
                    "name": n.name(),
                    "enabled": n.enabled,
                    "external": n.external,
                    "load_early": n.load_early,
                    "force_first": resolver.is_force_first(&n.path),
                    "load_after": targets(&n.load_after).collect::<Vec<_>>(),
                    "load_before": targets(&n.load_before).collect::<Vec<_>>(),
                    "comment": n.comment,
                })
            })
            .collect();
        let doc = json!({ "packages": packages, "natives": natives });
        let text = serde_json::to_string_pretty(&doc).map_err(|e| ModorderError::Generic {
            message: format!("Failed to render JSON: {e}"),
        })?;
        println!("{text}");
        return Ok(());
    }

    let summary = resolver.summary();
    println!(
        "Packages ({}/{} enabled):",
        summary.enabled_packages, summary.total_packages
    );
    for p in resolver.packages() {
        let mut tags = Vec::new();
        if p.external {
            tags.push("external");
        }
        if resolver.is_force_last(&p.id) {
            tags.push("force-last");
        }
        print_line(p.enabled, &p.id, &tags, &p.comment);
    }

    println!(
        "Natives ({}/{} enabled):",
        summary.enabled_natives, summary.total_natives
    );
    for n in resolver.natives() {
        let mut tags = Vec::new();
        if n.external {
            tags.push("external");
        }
        if n.load_early {
            tags.push("early");
        }
        if resolver.is_force_first(&n.path) {
            tags.push("force-first");
        }
        print_line(n.enabled, &n.path, &tags, &n.comment);
    }
    Ok(())
}

fn print_line(enabled: bool, name: &str, tags: &[&str], comment: &str) {
    let mark = if enabled { "[x]" } else { "[ ]" };
    let mut line = format!("  {mark} {name}");
    if !tags.is_empty() {
        line.push_str(&format!(" ({})", tags.join(", ")));
    }
    if !comment.is_empty() {
        line.push_str(&format!("  # {comment}"));
    }
    println!("{line}");
}

//! Command dispatch and handler modules.

mod check;
mod comment;
mod enable;
mod external;
mod force;
mod list;
mod load_order;
mod order;
mod scan;

use miette::Result;

use modorder_core::config::LauncherConfig;
use modorder_ops::Session;
use modorder_util::errors::ModorderError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let mut config = LauncherConfig::load()?;
    if let Some(dir) = cli.mods_dir {
        config = config.with_mods_dir(dir);
    }
    tracing::debug!("using Mods directory {}", config.mods_dir().display());
    let session = Session::open(config);

    match cli.command {
        Command::Scan => scan::exec(&session),
        Command::List { json } => list::exec(&session, json),
        Command::Enable { kind, id } => enable::enable(session, kind, &id),
        Command::Disable { kind, id } => enable::disable(session, kind, &id),
        Command::Toggle { kind, id } => enable::toggle(session, kind, &id),
        Command::ForceLast { id, clear } => force::last(session, &id, clear),
        Command::ForceFirst { native, clear } => force::first(session, &native, clear),
        Command::Order {
            first,
            second,
            remove,
        } => order::pairwise(session, &first, &second, remove),
        Command::Early { native, off } => order::early(session, &native, !off),
        Command::LoadOrder { kind } => load_order::exec(&session, kind),
        Command::Comment { kind, id, text } => comment::exec(session, kind, &id, &text),
        Command::Check => check::exec(&session),
        Command::External { action } => external::exec(session, action),
    }
}

/// Save the profile, turning a logged failure into an error.
fn save_profile(session: &Session) -> Result<()> {
    if session.save_profile() {
        Ok(())
    } else {
        Err(ModorderError::Generic {
            message: format!(
                "Failed to save profile to {}",
                session.config.profile_path().display()
            ),
        }
        .into())
    }
}

/// Save the external registry, turning a logged failure into an error.
fn save_registry(session: &Session) -> Result<()> {
    if session.save_registry() {
        Ok(())
    } else {
        Err(ModorderError::Generic {
            message: format!(
                "Failed to save external registry to {}",
                session.config.registry_path().display()
            ),
        }
        .into())
    }
}

fn not_found(what: impl std::fmt::Display) -> miette::Report {
    ModorderError::Generic {
        message: format!("{what} not found"),
    }
    .into()
}

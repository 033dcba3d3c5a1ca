//! CLI argument definitions for modorder.
//!
//! Uses `clap` derive macros to define the full command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use modorder_core::entity::EntityKind;

#[derive(Parser, Debug)]
#[command(
    name = "modorder",
    version,
    about = "Load-order manager for a game mod launcher",
    long_about = "modorder tracks content packages and native plugins in a Mods directory, \
                  keeps their ordering constraints consistent, and writes the launcher profile."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Managed Mods directory (overrides ~/.modorder/config.toml)
    #[arg(long, global = true, env = "MODORDER_MODS_DIR")]
    pub mods_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List packages and natives found in the Mods directory
    Scan,

    /// Show enabled packages and natives with their markers
    #[command(alias = "ls")]
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Enable a package or native
    Enable {
        /// Entity kind: package or native
        kind: EntityKind,
        /// Package id or native path (a trailing " (external)" is accepted)
        id: String,
    },

    /// Disable a package or native and drop references to it
    Disable {
        /// Entity kind: package or native
        kind: EntityKind,
        /// Package id or native path
        id: String,
    },

    /// Flip the enabled flag of a package or native
    ///
    /// The profile only stores enabled entities, so toggling one off removes
    /// it from the profile; use `enable` to bring it back.
    Toggle {
        /// Entity kind: package or native
        kind: EntityKind,
        /// Package id or native path
        id: String,
    },

    /// Make a package load after every other package
    ForceLast {
        /// Package id
        id: String,
        /// Remove the marker instead
        #[arg(long)]
        clear: bool,
    },

    /// Make a native load before every other native
    ForceFirst {
        /// Native file name or path
        native: String,
        /// Remove the marker instead
        #[arg(long)]
        clear: bool,
    },

    /// Require one native to load before another
    Order {
        /// Native that loads first
        first: String,
        /// Native that loads second
        second: String,
        /// Remove the constraint instead
        #[arg(long)]
        remove: bool,
    },

    /// Mark a native to load early
    Early {
        /// Native file name or path
        native: String,
        /// Clear the flag instead
        #[arg(long)]
        off: bool,
    },

    /// Print the derived load order
    LoadOrder {
        /// Only this kind: package or native
        kind: Option<EntityKind>,
    },

    /// Set or clear the comment of a package or native
    Comment {
        /// Entity kind: package or native
        kind: EntityKind,
        /// Package id or native file name
        id: String,
        /// Comment text; empty clears it
        #[arg(default_value = "")]
        text: String,
    },

    /// Report constraint problems in the current profile
    Check,

    /// Manage mods that live outside the Mods directory
    External {
        #[command(subcommand)]
        action: ExternalAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExternalAction {
    /// Register an external package folder or native DLL
    Add {
        /// Entity kind: package or native
        kind: EntityKind,
        /// Absolute or relative path
        path: PathBuf,
    },
    /// Unregister an external mod (and disable it)
    #[command(alias = "rm")]
    Remove {
        /// Entity kind: package or native
        kind: EntityKind,
        /// Registry name
        name: String,
    },
    /// Check which registered paths still exist
    Check,
    /// Drop entries whose path is gone or inside the Mods directory
    Cleanup,
}

pub fn parse() -> Cli {
    Cli::parse()
}

//! Command-line interface for Flix.

mod commands;

pub use commands::{cmd_init, cmd_set_admin};

use clap::{Parser, Subcommand};

/// Flix - movie catalog and review service
#[derive(Parser)]
#[command(name = "flix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server (default)
    Serve,

    /// Create default config file
    Init,

    /// Grant admin rights to a user
    Promote {
        /// Username of the account
        username: String,
    },

    /// Revoke admin rights from a user
    Demote {
        /// Username of the account
        username: String,
    },
}

use clap::{Args, Parser, Subcommand};
use kv_variables::Domain;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kv-variables")]
#[command(about = "Inspect and change persisted, domain-scoped variables")]
pub struct Cli {
    /// Configuration file (defaults to the XDG config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage directory, overriding the configured one
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Domain selection shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct DomainArg {
    /// Domain (namespace); omit for the default domain
    #[arg(short, long)]
    pub domain: Option<String>,
}

impl DomainArg {
    pub fn to_domain(&self) -> Domain {
        Domain::from(self.domain.as_deref())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show every declared variable and its effective value
    List {
        #[command(flatten)]
        domain: DomainArg,
    },
    /// Print the effective value of a variable as JSON
    Get {
        /// Variable name
        name: String,
        #[command(flatten)]
        domain: DomainArg,
    },
    /// Set a variable from a string
    Set {
        /// Variable name
        name: String,
        /// New value; parsed according to the variable's kind
        value: String,
        #[command(flatten)]
        domain: DomainArg,
    },
    /// Reset a variable to its default value
    Clear {
        /// Variable name
        name: String,
        #[command(flatten)]
        domain: DomainArg,
    },
    /// Flip a bool variable
    Toggle {
        /// Variable name
        name: String,
        #[command(flatten)]
        domain: DomainArg,
    },
    /// Reset every declared variable in a domain
    ResetAll {
        #[command(flatten)]
        domain: DomainArg,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Print the stored record of a domain
    Raw {
        #[command(flatten)]
        domain: DomainArg,
    },
}

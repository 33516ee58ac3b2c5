use anyhow::Result;
use clap::Parser;
use kv_variables::config::Config;
use log::{debug, info};
use std::io::{self, Write};

mod cli;

use cli::commands::{
    clear_command, get_command, list_command, raw_command, reset_all_command, set_command,
    toggle_command,
};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    info!("Starting kv-variables");

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.storage {
        config.storage_dir = dir;
    }
    debug!("Using storage directory: {:?}", config.storage_dir);

    let store = config.open_store();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::List { domain } => list_command(&config, &store, &domain.to_domain(), &mut out)?,
        Commands::Get { name, domain } => {
            get_command(&config, &store, &name, &domain.to_domain(), &mut out)?
        }
        Commands::Set { name, value, domain } => {
            set_command(&config, &store, &name, &value, &domain.to_domain(), &mut out)?
        }
        Commands::Clear { name, domain } => {
            clear_command(&config, &store, &name, &domain.to_domain(), &mut out)?
        }
        Commands::Toggle { name, domain } => {
            toggle_command(&config, &store, &name, &domain.to_domain(), &mut out)?
        }
        Commands::ResetAll { domain, force } => {
            reset_all_command(&config, &store, &domain.to_domain(), force, &mut out)?
        }
        Commands::Raw { domain } => raw_command(&store, &domain.to_domain(), &mut out)?,
    }

    out.flush()?;
    Ok(())
}

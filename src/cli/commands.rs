//! Command handlers
//!
//! Handlers write their output to `out` so they can be exercised without a
//! terminal.

use super::prompts::prompt_reset_all_confirmation;
use anyhow::{Context, Result};
use kv_variables::config::Config;
use kv_variables::{Domain, RecordStore};
use log::info;
use std::io::Write;
use std::sync::Arc;

/// Show every declared variable in `domain`
pub fn list_command(
    config: &Config,
    store: &Arc<RecordStore>,
    domain: &Domain,
    out: &mut dyn Write,
) -> Result<()> {
    let definitions = config.registry.list_all();
    if definitions.is_empty() {
        writeln!(out, "No variables declared.")?;
        return Ok(());
    }

    for def in definitions {
        let variable = def.variable(store.clone());
        writeln!(out, "{}", variable.describe(domain)?)?;
        if let Some(description) = variable.description() {
            writeln!(out, "    {}", description)?;
        }
    }
    Ok(())
}

/// Print the effective value of a variable as JSON
pub fn get_command(
    config: &Config,
    store: &Arc<RecordStore>,
    name: &str,
    domain: &Domain,
    out: &mut dyn Write,
) -> Result<()> {
    let def = config.registry.require(name)?;
    let value = def.variable(store.clone()).get(domain)?;
    writeln!(out, "{}", serde_json::to_string(&value)?)?;
    Ok(())
}

/// Parse `raw` according to the variable's kind and store it
pub fn set_command(
    config: &Config,
    store: &Arc<RecordStore>,
    name: &str,
    raw: &str,
    domain: &Domain,
    out: &mut dyn Write,
) -> Result<()> {
    info!("Setting {} to {} in {}", name, raw, domain);

    let def = config.registry.require(name)?;
    let variable = def.variable(store.clone());
    if !variable.set_with_string(raw, domain)? {
        anyhow::bail!("Invalid value for {}: '{}'. Expected a {}.", name, raw, def.kind);
    }

    writeln!(out, "{}", variable.describe(domain)?)?;
    Ok(())
}

/// Reset a variable to its default value
pub fn clear_command(
    config: &Config,
    store: &Arc<RecordStore>,
    name: &str,
    domain: &Domain,
    out: &mut dyn Write,
) -> Result<()> {
    info!("Resetting {} in {}", name, domain);

    let def = config.registry.require(name)?;
    def.variable(store.clone()).clear(domain)?;
    writeln!(out, "Reset {} to {}", name, def.default)?;
    Ok(())
}

/// Flip a bool variable and print the new value
pub fn toggle_command(
    config: &Config,
    store: &Arc<RecordStore>,
    name: &str,
    domain: &Domain,
    out: &mut dyn Write,
) -> Result<()> {
    let def = config.registry.require(name)?;
    let new_value = def.boolean(store.clone())?.toggle(domain)?;
    writeln!(out, "{}", new_value)?;
    Ok(())
}

/// Reset every declared variable in `domain`
///
/// # Arguments
/// * `force` - Skip confirmation prompt
pub fn reset_all_command(
    config: &Config,
    store: &Arc<RecordStore>,
    domain: &Domain,
    force: bool,
    out: &mut dyn Write,
) -> Result<()> {
    info!("Resetting all variables in {}", domain);

    if !force && !prompt_reset_all_confirmation(domain.name())? {
        writeln!(out, "Operation cancelled.")?;
        return Ok(());
    }

    let definitions = config.registry.list_all();
    for def in &definitions {
        def.variable(store.clone())
            .clear(domain)
            .with_context(|| format!("Failed to reset {}", def.name))?;
    }

    writeln!(out, "Reset {} variables to their defaults", definitions.len())?;
    Ok(())
}

/// Print the stored record of `domain`
pub fn raw_command(store: &Arc<RecordStore>, domain: &Domain, out: &mut dyn Write) -> Result<()> {
    let record = store.load(domain)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
    Ok(())
}

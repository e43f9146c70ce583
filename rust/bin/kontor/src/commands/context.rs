//! Context management commands.

use std::path::Path;

use anyhow::Result;

use crate::config::{ClientConfig, Context};

/// `kontor context set <name> --server <url>`
pub fn set(name: &str, server: Option<&str>, config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;

    let server = server
        .map(str::to_string)
        .or_else(|| config.get_mut(name).map(|c| c.server.clone()))
        .unwrap_or_default();

    config.upsert_context(Context {
        name: name.to_string(),
        server,
    });
    if config.current_context.is_empty() {
        config.current_context = name.to_string();
    }
    config.save(config_path)?;
    println!("Context \"{}\" saved.", name);
    Ok(())
}

/// `kontor context list`
pub fn list(config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(config_path)?;
    if config.contexts.is_empty() {
        println!("No contexts configured.");
        return Ok(());
    }
    for ctx in &config.contexts {
        let marker = if ctx.name == config.current_context { "*" } else { " " };
        let server = if ctx.server.is_empty() { "-" } else { &ctx.server };
        println!("{} {:<20} {}", marker, ctx.name, server);
    }
    Ok(())
}

/// `kontor context delete <name>`
pub fn delete(name: &str, config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;
    if !config.remove_context(name) {
        anyhow::bail!("No context named \"{}\".", name);
    }
    config.save(config_path)?;
    println!("Context \"{}\" deleted.", name);
    Ok(())
}

/// `kontor use <name>`
pub fn use_context(name: &str, config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;
    if config.get_mut(name).is_none() {
        anyhow::bail!("No context named \"{}\".", name);
    }
    config.current_context = name.to_string();
    config.save(config_path)?;
    println!("Switched to context \"{}\".", name);
    Ok(())
}

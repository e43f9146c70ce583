//! Dashboard commands — summary, export, settings.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use super::resource::{build_client, current_context};

/// `kontor dashboard summary [--range 7d|30d|90d]`
pub fn summary(range: Option<&str>, config_path: &Path) -> Result<()> {
    let ctx = current_context(config_path)?;
    let (client, base_url) = build_client(&ctx)?;

    let mut url = format!("{}/dashboard/v1/summary", base_url);
    if let Some(range) = range {
        url.push_str(&format!("?range={}", range));
    }

    let resp = client.get(&url).send()?;
    let status = resp.status();
    let body: serde_json::Value = resp.json()?;
    if !status.is_success() {
        anyhow::bail!(
            "Error ({}): {}",
            status,
            body["message"].as_str().unwrap_or("unknown error")
        );
    }

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// `kontor dashboard export [--range ...] [--format csv|document] [-o file]`
pub fn export(
    range: Option<&str>,
    format: &str,
    out: Option<&str>,
    config_path: &Path,
) -> Result<()> {
    let ctx = current_context(config_path)?;
    let (client, base_url) = build_client(&ctx)?;

    let mut params = vec![format!("format={}", format)];
    if let Some(range) = range {
        params.push(format!("range={}", range));
    }
    let url = format!("{}/dashboard/v1/export?{}", base_url, params.join("&"));

    let resp = client.get(&url).send()?;
    let status = resp.status();
    if !status.is_success() {
        let body: serde_json::Value = resp.json().unwrap_or_default();
        anyhow::bail!(
            "Error ({}): {}",
            status,
            body["message"].as_str().unwrap_or("unknown error")
        );
    }

    let bytes = resp.bytes()?;
    match out {
        Some(path) => {
            std::fs::write(path, &bytes)?;
            println!("Export written to {} ({} bytes).", path, bytes.len());
        }
        None => std::io::stdout().write_all(&bytes)?,
    }
    Ok(())
}

/// `kontor dashboard settings [--json '...']`
pub fn settings(json_body: Option<&str>, config_path: &Path) -> Result<()> {
    let ctx = current_context(config_path)?;
    let (client, base_url) = build_client(&ctx)?;
    let url = format!("{}/dashboard/v1/settings", base_url);

    let resp = match json_body {
        Some(json) => {
            let body: serde_json::Value = serde_json::from_str(json)
                .map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))?;
            client.put(&url).json(&body).send()?
        }
        None => client.get(&url).send()?,
    };

    let status = resp.status();
    let body: serde_json::Value = resp.json()?;
    if !status.is_success() {
        anyhow::bail!(
            "Error ({}): {}",
            status,
            body["message"].as_str().unwrap_or("unknown error")
        );
    }

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

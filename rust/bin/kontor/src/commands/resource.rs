//! Generic resource CRUD commands.
//!
//! `kontor get persons`, `kontor create enterprise --json '...'`, etc.
//! Translates resource names to REST API paths.

use std::path::Path;

use anyhow::Result;

use crate::config::{ClientConfig, Context};

/// Map a singular/plural resource name to the API path prefix.
fn resource_path(resource: &str) -> Result<(&'static str, &'static str)> {
    // Returns (singular, api_path).
    match resource.to_lowercase().as_str() {
        "person" | "persons" => Ok(("person", "/crm/v1/persons")),
        "enterprise" | "enterprises" => Ok(("enterprise", "/crm/v1/enterprises")),
        "requirement" | "requirements" => Ok(("requirement", "/crm/v1/requirements")),
        _ => Err(anyhow::anyhow!("Unknown resource type: {}", resource)),
    }
}

/// HTTP client helper.
pub(crate) fn build_client(ctx: &Context) -> Result<(reqwest::blocking::Client, String)> {
    if ctx.server.is_empty() {
        anyhow::bail!(
            "No server URL set for context \"{}\". Run `kontor context set {} --server <url>`.",
            ctx.name, ctx.name
        );
    }
    let client = reqwest::blocking::Client::builder().build()?;
    Ok((client, ctx.server.trim_end_matches('/').to_string()))
}

pub(crate) fn current_context(config_path: &Path) -> Result<Context> {
    let config = ClientConfig::load(config_path)?;
    config
        .current()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No current context. Run `kontor use <name>`."))
}

fn error_message(body: &serde_json::Value) -> String {
    body["message"]
        .as_str()
        .or_else(|| body["error"].as_str())
        .unwrap_or("unknown error")
        .to_string()
}

/// GET a resource (list or get by ID).
pub fn get(
    resource: &str,
    id: Option<&str>,
    limit: Option<usize>,
    offset: Option<usize>,
    query: Option<&str>,
    config_path: &Path,
) -> Result<()> {
    let ctx = current_context(config_path)?;
    let (_, api_path) = resource_path(resource)?;
    let (client, base_url) = build_client(&ctx)?;

    let url = if let Some(id) = id {
        format!("{}{}/{}", base_url, api_path, id)
    } else {
        let mut u = format!("{}{}", base_url, api_path);
        let mut params = Vec::new();
        if let Some(l) = limit {
            params.push(format!("limit={}", l));
        }
        if let Some(o) = offset {
            params.push(format!("offset={}", o));
        }
        if let Some(q) = query {
            params.push(format!("q={}", q));
        }
        if !params.is_empty() {
            u.push('?');
            u.push_str(&params.join("&"));
        }
        u
    };

    let resp = client.get(&url).send()?;
    let status = resp.status();
    let body: serde_json::Value = resp.json()?;

    if !status.is_success() {
        anyhow::bail!("Error ({}): {}", status, error_message(&body));
    }

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// CREATE a resource.
pub fn create(resource: &str, json_body: &str, config_path: &Path) -> Result<()> {
    let ctx = current_context(config_path)?;
    let (singular, api_path) = resource_path(resource)?;
    let (client, base_url) = build_client(&ctx)?;

    let url = format!("{}{}", base_url, api_path);
    let body: serde_json::Value = serde_json::from_str(json_body)
        .map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))?;

    let resp = client.post(&url).json(&body).send()?;
    let status = resp.status();
    let result: serde_json::Value = resp.json()?;

    if !status.is_success() {
        anyhow::bail!("Error ({}): {}", status, error_message(&result));
    }

    println!("{} created.", singular);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// UPDATE a resource (PATCH).
pub fn update(resource: &str, id: &str, json_body: &str, config_path: &Path) -> Result<()> {
    let ctx = current_context(config_path)?;
    let (singular, api_path) = resource_path(resource)?;
    let (client, base_url) = build_client(&ctx)?;

    let url = format!("{}{}/{}", base_url, api_path, id);
    let body: serde_json::Value = serde_json::from_str(json_body)
        .map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))?;

    let resp = client.patch(&url).json(&body).send()?;
    let status = resp.status();
    let result: serde_json::Value = resp.json()?;

    if !status.is_success() {
        anyhow::bail!("Error ({}): {}", status, error_message(&result));
    }

    println!("{} {} updated.", singular, id);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// DELETE a resource.
pub fn delete(resource: &str, id: &str, config_path: &Path) -> Result<()> {
    let ctx = current_context(config_path)?;
    let (singular, api_path) = resource_path(resource)?;
    let (client, base_url) = build_client(&ctx)?;

    let url = format!("{}{}/{}", base_url, api_path, id);
    let resp = client.delete(&url).send()?;
    let status = resp.status();

    if !status.is_success() {
        let body: serde_json::Value = resp.json().unwrap_or_default();
        anyhow::bail!("Error ({}): {}", status, error_message(&body));
    }

    println!("{} {} deleted.", singular, id);
    Ok(())
}

/// Convert a lead to a client.
pub fn convert(id: &str, config_path: &Path) -> Result<()> {
    let ctx = current_context(config_path)?;
    let (client, base_url) = build_client(&ctx)?;

    let url = format!("{}/crm/v1/persons/{}/convert", base_url, id);
    let resp = client.post(&url).send()?;
    let status = resp.status();
    let result: serde_json::Value = resp.json()?;

    if !status.is_success() {
        anyhow::bail!("Error ({}): {}", status, error_message(&result));
    }

    println!("person {} is now a client.", id);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// STATUS — check server health.
pub fn status(config_path: &Path) -> Result<()> {
    let ctx = current_context(config_path)?;

    println!("Context:   {}", ctx.name);
    println!("Server:    {}", if ctx.server.is_empty() { "-" } else { &ctx.server });

    if ctx.server.is_empty() {
        println!("Status:    no server configured");
        return Ok(());
    }

    let (client, base_url) = build_client(&ctx)?;
    match client.get(format!("{}/health", base_url)).send() {
        Ok(resp) if resp.status().is_success() => println!("Status:    ok"),
        Ok(resp) => println!("Status:    error ({})", resp.status()),
        Err(e) => println!("Status:    unreachable ({})", e),
    }
    Ok(())
}

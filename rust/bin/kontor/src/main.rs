//! `kontor` — the Kontor CLI client.
//!
//! Manages contexts and resource operations against a kontord server.
//! Think of it as `kubectl` for Kontor.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Kontor CLI tool.
#[derive(Parser, Debug)]
#[command(name = "kontor", about = "Kontor CLI client")]
struct Cli {
    /// Path to client config file (default: ~/.kontor/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage contexts.
    #[command(name = "context")]
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the current context.
    #[command(name = "use")]
    Use {
        /// Context name.
        name: String,
    },

    /// Get resource(s).
    Get {
        /// Resource type (persons, enterprises, requirements).
        resource: String,
        /// Optional resource ID for single get.
        id: Option<String>,
        /// Limit results.
        #[arg(long)]
        limit: Option<usize>,
        /// Offset for pagination.
        #[arg(long)]
        offset: Option<usize>,
        /// Search query.
        #[arg(short = 'q', long = "query")]
        query: Option<String>,
    },

    /// Create a resource.
    Create {
        /// Resource type.
        resource: String,
        /// JSON body.
        #[arg(long = "json")]
        json_body: Option<String>,
        /// Read JSON from file.
        #[arg(short = 'f', long = "file")]
        file: Option<String>,
    },

    /// Update a resource (PATCH).
    Update {
        /// Resource type.
        resource: String,
        /// Resource ID.
        id: String,
        /// JSON body.
        #[arg(long = "json")]
        json_body: String,
    },

    /// Delete a resource.
    Delete {
        /// Resource type.
        resource: String,
        /// Resource ID.
        id: String,
    },

    /// Convert a lead person to a client.
    Convert {
        /// Person ID.
        id: String,
    },

    /// Dashboard operations.
    Dashboard {
        #[command(subcommand)]
        action: DashboardAction,
    },

    /// Show context and server status.
    Status,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Add or update a context.
    Set {
        /// Context name.
        name: String,
        /// Server URL.
        #[arg(long)]
        server: Option<String>,
    },
    /// List contexts.
    List,
    /// Delete a context.
    Delete {
        /// Context name.
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum DashboardAction {
    /// Fetch the aggregated summary.
    Summary {
        /// Time range: 7d, 30d, or 90d.
        #[arg(long)]
        range: Option<String>,
    },
    /// Download an export of the summary.
    Export {
        /// Time range: 7d, 30d, or 90d.
        #[arg(long)]
        range: Option<String>,
        /// Export format: csv or document.
        #[arg(long, default_value = "csv")]
        format: String,
        /// Output file (stdout when omitted).
        #[arg(short = 'o', long = "out")]
        out: Option<String>,
    },
    /// Show or replace dashboard settings.
    Settings {
        /// New settings as JSON; omit to show the current values.
        #[arg(long = "json")]
        json_body: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(config::ClientConfig::default_path);

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Set { name, server } => {
                commands::context::set(&name, server.as_deref(), &config_path)
            }
            ContextAction::List => commands::context::list(&config_path),
            ContextAction::Delete { name } => commands::context::delete(&name, &config_path),
        },
        Commands::Use { name } => commands::context::use_context(&name, &config_path),
        Commands::Get { resource, id, limit, offset, query } => commands::resource::get(
            &resource,
            id.as_deref(),
            limit,
            offset,
            query.as_deref(),
            &config_path,
        ),
        Commands::Create { resource, json_body, file } => {
            let body = match (json_body, file) {
                (Some(json), _) => json,
                (None, Some(path)) => std::fs::read_to_string(&path)?,
                (None, None) => anyhow::bail!("Provide --json or --file."),
            };
            commands::resource::create(&resource, &body, &config_path)
        }
        Commands::Update { resource, id, json_body } => {
            commands::resource::update(&resource, &id, &json_body, &config_path)
        }
        Commands::Delete { resource, id } => {
            commands::resource::delete(&resource, &id, &config_path)
        }
        Commands::Convert { id } => commands::resource::convert(&id, &config_path),
        Commands::Dashboard { action } => match action {
            DashboardAction::Summary { range } => {
                commands::dashboard::summary(range.as_deref(), &config_path)
            }
            DashboardAction::Export { range, format, out } => commands::dashboard::export(
                range.as_deref(),
                &format,
                out.as_deref(),
                &config_path,
            ),
            DashboardAction::Settings { json_body } => {
                commands::dashboard::settings(json_body.as_deref(), &config_path)
            }
        },
        Commands::Status => commands::resource::status(&config_path),
    }
}

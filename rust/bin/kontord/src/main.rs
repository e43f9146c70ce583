//! `kontord` — the Kontor server binary.
//!
//! Usage:
//!   kontord -c <context-name-or-path> [--listen <addr>] [--seed-demo <n>]
//!
//! The context name resolves to `/etc/kontor/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use kontor_core::Module;
use tracing::info;

use config::ServerConfig;

/// Kontor server.
#[derive(Parser, Debug)]
#[command(name = "kontord", about = "Kontor server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides the configured value).
    #[arg(long = "listen")]
    listen: Option<String>,

    /// Seed n synthetic persons (plus enterprises and requirements)
    /// before serving. For demo environments only.
    #[arg(long = "seed-demo")]
    seed_demo: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    let listen = cli.listen.unwrap_or_else(|| server_config.server.listen.clone());

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = kontor_core::ServiceConfig {
        data_dir: Some(data_dir.clone()),
        listen: listen.clone(),
        ..Default::default()
    };

    // Embedded stores, shared by all modules.
    let sql: Arc<dyn kontor_sql::SQLStore> = Arc::new(
        kontor_sql::SqliteStore::open(&core_config.resolve_sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    let kv: Arc<dyn kontor_kv::KVStore> = Arc::new(
        kontor_kv::RedbStore::open(&core_config.resolve_kv_path())
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );

    bootstrap::ensure_dashboard_settings(&kv)?;

    let crm_module = crm::CrmModule::new(crm::service::CrmService::new(Arc::clone(&sql))?);
    info!("CRM module initialized");

    if let Some(count) = cli.seed_demo {
        bootstrap::seed_demo(&crm_module.service(), count)?;
    }

    let dashboard_module =
        dashboard::DashboardModule::new(Arc::clone(&sql), Arc::clone(&kv));
    info!("Dashboard module initialized");

    let module_routes = vec![
        (crm_module.name(), crm_module.routes()),
        (dashboard_module.name(), dashboard_module.routes()),
    ];

    let app = routes::build_router(module_routes);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("Kontor server listening on {}", listen);
    axum::serve(listener, app).await?;

    Ok(())
}

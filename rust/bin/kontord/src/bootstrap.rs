//! Bootstrap — first-start checks and default documents.

use std::sync::Arc;

use tracing::info;

use dashboard::SettingsStore;
use kontor_kv::KVStore;

use crate::config::ServerConfig;

/// Verify server configuration is usable before opening any stores.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("storage.data_dir is empty in configuration");
    }
    if config.server.listen.is_empty() {
        anyhow::bail!("server.listen is empty in configuration");
    }
    Ok(())
}

/// Ensure a dashboard settings document exists so the first GET does
/// not depend on in-process defaults.
pub fn ensure_dashboard_settings(kv: &Arc<dyn KVStore>) -> anyhow::Result<()> {
    let store = SettingsStore::new(Arc::clone(kv));
    let settings = store.load()?;
    store.save(&settings)?;
    info!(range = %settings.default_range, "dashboard settings ready");
    Ok(())
}

/// Seed synthetic demo data when requested on the command line.
pub fn seed_demo(service: &crm::service::CrmService, count: usize) -> anyhow::Result<()> {
    let report = service.seed_demo(count, rand_seed())?;
    info!(
        persons = report.persons,
        enterprises = report.enterprises,
        requirements = report.requirements,
        "demo data seeded"
    );
    Ok(())
}

fn rand_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

use axum::Router;

/// A service module that contributes HTTP routes.
///
/// Each business module (crm, dashboard, ...) implements this trait
/// to register its API endpoints. The binary entry point collects all
/// modules and merges their routes into a single Router.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes. Routers carry their own versioned
    /// prefix (`/crm/v1`, ...) and are merged into the app as-is.
    fn routes(&self) -> Router;
}

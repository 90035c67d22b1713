use tracing_subscriber::EnvFilter;

/// Install a formatted tracing subscriber filtered by `filter`
/// (e.g. "info", "neo_pokedex=debug"). Later calls are no-ops.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("logging initialized");
    }
}

use empdb::ConnectionSettings;
use std::path::Path;

/// Pick connection settings: `--database`, then `DATABASE_URL`, then the
/// properties file. A missing properties file falls back to the built-in
/// local defaults.
pub fn resolve_settings(
    database: Option<&str>,
    env_url: Option<String>,
    config: &Path,
) -> anyhow::Result<ConnectionSettings> {
    if let Some(url) = database {
        tracing::debug!("using --database");
        return Ok(ConnectionSettings::from_url(url));
    }
    if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
        tracing::debug!("using DATABASE_URL");
        return Ok(ConnectionSettings::from_url(url));
    }
    if config.exists() {
        tracing::debug!(config = %config.display(), "using properties file");
        return ConnectionSettings::load(config).map_err(|e| {
            anyhow::anyhow!("failed to load config {}: {e}", config.display())
        });
    }

    tracing::warn!(
        config = %config.display(),
        "no --database, DATABASE_URL or properties file; using local defaults"
    );
    Ok(ConnectionSettings::default())
}

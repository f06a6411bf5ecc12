pub mod fetch;
pub mod hash;
pub mod init;
pub mod run;
pub mod status;

use std::path::Path;
use std::sync::Arc;

use waypoint_config::{AppConfig, Binding};
use waypoint_security::HmacVerifier;
use waypoint_session::{Session, SessionDriver, SessionOptions};

use crate::SourceArgs;

/// Load the config file and apply command-line overrides.
pub fn load_config(path: &Path, overrides: &SourceArgs) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config =
        AppConfig::load_with_env(path).map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(binding) = overrides.binding {
        config.binding = binding;
    }
    if let Some(catalog) = &overrides.catalog {
        config.binding = Binding::Static;
        config.static_catalog.path = Some(catalog.clone());
    }
    Ok(config)
}

/// Wire the configured source, verifier and view table into a driver.
pub async fn build_driver(
    config: &AppConfig,
) -> Result<SessionDriver, Box<dyn std::error::Error>> {
    let source = waypoint_sources::build_from_config(config).await?;
    let verifier = Arc::new(HmacVerifier::new(config.hash_secret()));
    let session = Session::new(
        verifier,
        config.view_table()?,
        SessionOptions::from_config(config),
    );
    Ok(SessionDriver::new(session, source)
        .with_request_timeout(std::time::Duration::from_secs(config.request_timeout_secs)))
}

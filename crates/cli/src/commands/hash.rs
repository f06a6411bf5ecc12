//! `waypoint hash` - Print a verification token.

use std::path::Path;

use waypoint_config::AppConfig;
use waypoint_core::UserIdentity;

pub fn run(
    config_path: &Path,
    user: &str,
    secret: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let identity = UserIdentity::new(user)?;
    let secret = match secret {
        Some(secret) => secret,
        None => AppConfig::load_with_env(config_path)
            .map_err(|e| format!("Failed to load config: {e}"))?
            .hash_secret()
            .to_string(),
    };
    if secret.is_empty() {
        tracing::warn!("hash_secret is empty; the token is not bound to any secret");
    }
    println!("{}", waypoint_security::hash_user_id(identity.as_str(), &secret));
    Ok(())
}

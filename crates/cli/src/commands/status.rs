//! `waypoint status` - Show the effective configuration.

use std::path::Path;

use waypoint_config::AppConfig;

pub fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        AppConfig::load_with_env(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    println!("Waypoint Status");
    println!("===============");
    println!("  Config file:   {}", config_path.display());
    println!("  API base URL:  {}", config.api_base_url);
    println!(
        "  Organization:  {}",
        config.organization_code().unwrap_or("(not set)")
    );
    println!(
        "  Hash secret:   {}",
        if config.hash_secret.is_some() { "set" } else { "not set" }
    );
    println!("  Platform:      {}", config.platform);
    println!("  Content types: {}", config.content_types.join(", "));
    println!("  Binding:       {}", config.binding);
    println!("  Presentation:  {:?}", config.presentation_mode);
    println!("  Timeout:       {}s", config.request_timeout_secs);
    println!(
        "  Fetch on sign-in: {}",
        if config.fetch_on_sign_in { "yes" } else { "no" }
    );

    println!();
    println!("  Views:");
    for view in config.view_table()?.views() {
        match &view.trigger_point {
            Some(tp) => println!("    {:<24} -> {tp}", view.name),
            None => println!("    {:<24}    (no trigger point)", view.name),
        }
    }

    println!();
    if !config_path.exists() {
        println!("  No config file; run `waypoint init` to create one");
    } else if config.binding.uses_network() && config.organization_code().is_err() {
        println!("  The {} binding needs organization_code to be set", config.binding);
    } else {
        println!("  Configuration OK");
    }

    Ok(())
}

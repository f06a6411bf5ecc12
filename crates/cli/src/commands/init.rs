//! `waypoint init` - Write a default config file.

use std::path::Path;

use waypoint_config::AppConfig;

pub fn run(config_path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if config_path.exists() && !force {
        println!("Config already exists at: {}", config_path.display());
        println!("Edit it manually or re-run with --force.");
        return Ok(());
    }

    if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(config_path, AppConfig::default_toml())?;

    println!("Created {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set organization_code (or export WAYPOINT_ORG_CODE)");
    println!("  2. Run: waypoint run --user <id>");
    Ok(())
}

//! `waypoint fetch` - One-shot content request.

use std::path::Path;

use waypoint_session::FetchOutcome;

use crate::SourceArgs;
use crate::render;

pub async fn run(
    config_path: &Path,
    source: &SourceArgs,
    user: &str,
    view: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path, source)?;
    // Navigation below issues the only request
    config.fetch_on_sign_in = false;

    let mut driver = super::build_driver(&config).await?;
    driver.sign_in(user).await?;
    let view = view
        .map(str::to_string)
        .unwrap_or_else(|| driver.session().views().default_view().to_string());
    driver.navigate(&view).await?;

    let failed = driver
        .settle()
        .await
        .iter()
        .any(|c| c.outcome == FetchOutcome::Failed);

    let session = driver.session();
    if json {
        println!("{}", serde_json::to_string_pretty(session.content())?);
    } else {
        println!("  {}", render::status_line(session));
        println!("{}", render::items(session.content()));
        println!();
        println!("{}", render::surface(&session.surface()));
    }

    if failed {
        return Err(format!("content request for '{view}' failed (see log)").into());
    }
    Ok(())
}

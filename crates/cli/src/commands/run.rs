//! `waypoint run` - Interactive session.

use std::io::Write;
use std::path::Path;

use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use waypoint_core::SessionError;
use waypoint_session::SessionDriver;

use crate::SourceArgs;
use crate::render;
use crate::repl::{Command, HELP};

pub async fn run(
    config_path: &Path,
    source: &SourceArgs,
    user: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path, source)?;
    let mut driver = super::build_driver(&config).await?;
    let mut events = driver.subscribe();

    println!();
    println!("  Waypoint - interactive session");
    println!();
    println!("  Source:    {}", driver.source().name());
    println!("  Platform:  {}", config.platform);
    println!("  Views:     {}", view_names(&driver).join(", "));
    println!();
    println!("  Type 'help' for commands, 'quit' to leave.");
    println!();

    if let Some(user) = user {
        report(driver.sign_in(&user).await);
    }

    let mut lines = BufReader::new(io::stdin()).lines();
    prompt(&driver)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    prompt(&driver)?;
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(&mut driver, command).await,
                    Err(e) => eprintln!("  {e}"),
                }
                prompt(&driver)?;
            }
            Some(_) = driver.next_completion(), if driver.outstanding() > 0 => {
                println!();
                println!("{}", render::surface(&driver.session().surface()));
                prompt(&driver)?;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    println!();
                    println!("  · {}", render::event(&event));
                    prompt(&driver)?;
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Event log fell behind");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

async fn execute(driver: &mut SessionDriver, command: Command) {
    let result = match command {
        Command::SignIn(user) => driver.sign_in(&user).await,
        Command::SignOut => driver.sign_out().await,
        Command::Go(view) => driver.navigate(&view).await,
        Command::Refresh => driver.refresh().await,
        Command::ClosePopup => driver.close_popup(),
        Command::OpenButton => driver.open_button_overlay(),
        Command::CloseButton => driver.close_button_overlay(),
        Command::HideInline => driver.hide_inline(),
        Command::Show => {
            println!("  {}", render::status_line(driver.session()));
            println!("{}", render::surface(&driver.session().surface()));
            Ok(())
        }
        Command::Views => {
            for name in view_names(driver) {
                println!("  {name}");
            }
            Ok(())
        }
        Command::Help => {
            println!("{HELP}");
            Ok(())
        }
        Command::Quit => Ok(()),
    };
    report(result);
}

fn report(result: Result<(), SessionError>) {
    if let Err(e) = result {
        eprintln!("  [Error] {e}");
    }
}

fn view_names(driver: &SessionDriver) -> Vec<String> {
    driver
        .session()
        .views()
        .views()
        .iter()
        .map(|v| match &v.trigger_point {
            Some(tp) if tp.as_str() == v.name => v.name.clone(),
            Some(tp) => format!("{} -> {tp}", v.name),
            None => format!("{} (no content)", v.name),
        })
        .collect()
}

fn prompt(driver: &SessionDriver) -> std::io::Result<()> {
    let who = driver
        .session()
        .identity()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "anonymous".into());
    print!("  {who}@{} > ", driver.session().view());
    std::io::stdout().flush()
}

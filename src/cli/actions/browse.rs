use super::open_app;
use crate::{app::Screen, config::ConfigOverrides};
use anyhow::Result;

/// Resolves `path` for the stored session and prints the screen it lands on.
/// # Errors
/// Returns an error if the app cannot start or redirects loop.
pub fn open(config: ConfigOverrides, path: &str) -> Result<()> {
    let app = open_app(config)?;
    match app.navigate(path)? {
        Screen::Loading => println!("loading"),
        Screen::Render {
            path,
            route,
            params,
        } => {
            println!("{path}\t{route}");
            for (name, value) in params {
                println!("  {name}={value}");
            }
        }
    }
    Ok(())
}

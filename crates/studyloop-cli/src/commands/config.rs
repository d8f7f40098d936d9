//! Configuration management.

use clap::Subcommand;
use studyloop_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration as TOML
    Show,
    /// Write a default config file if none exists
    Init,
    /// Print the config file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init => {
            let path = Config::path()?;
            if path.exists() {
                println!("config already exists at {}", path.display());
            } else {
                Config::default().save()?;
                println!("wrote default config to {}", path.display());
            }
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }
    Ok(())
}

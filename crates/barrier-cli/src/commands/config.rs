use std::path::Path;

use barrier_core::Config;
use clap::Subcommand;

use super::load_config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "transition.duration_ms", "operator.name")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Print the config file location
    Path,
}

pub fn run(config_path: Option<&Path>, action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let save = |config: &Config| -> Result<(), Box<dyn std::error::Error>> {
        match config_path {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
        Ok(())
    };

    match action {
        ConfigAction::Get { key } => {
            let config = load_config(config_path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(config_path)?;
            config.set(&key, &value)?;
            save(&config)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = load_config(config_path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            save(&Config::default())?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            let path = match config_path {
                Some(path) => path.to_path_buf(),
                None => Config::path()?,
            };
            println!("{}", path.display());
        }
    }
    Ok(())
}

use super::context::load_config;
use crate::errors::MenuCartError;
use crate::logger;
use crate::GlobalOpts;
use clap::Subcommand;
use colored::Colorize;
use menucart_config::{ConfigError, CONFIG_KEYS};

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print every setting
    Show,
    /// Print a single setting
    Get { key: String },
    /// Change a setting and save the configuration file
    Set { key: String, value: String },
    /// Print the path of the configuration file in use
    Path,
}

pub fn handle_config(action: Option<ConfigAction>, opts: &GlobalOpts) -> Result<(), MenuCartError> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let config = load_config(opts)?;
            println!("{}", "Configuration:".bold().green());
            for (key, value) in config.values_iter() {
                println!("  {}: {}", key.cyan(), value);
            }
        }
        ConfigAction::Get { key } => {
            let config = load_config(opts)?;
            match config.get(&key) {
                Some(value) => println!("{}", value),
                None if CONFIG_KEYS.contains(&key.as_str()) => {
                    if opts.verbosity_level() > 0 {
                        println!("{}", "(unset)".yellow());
                    }
                }
                None => return Err(ConfigError::UnknownKey(key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(opts)?;
            config.set(&key, value.clone())?;
            config.save()?;
            logger::success(&format!("Set {} = {}", key, value));
        }
        ConfigAction::Path => {
            println!("{}", opts.config_path().display());
        }
    }
    Ok(())
}

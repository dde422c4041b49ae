//! Common types and utilities shared across modules

use clap::Parser;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,

    #[arg(
        long,
        global = true,
        env = "MENUCART_CONFIG",
        help = "Configuration file (default: ~/.config/wp-menu-cart/menucart.toml)"
    )]
    pub config: Option<PathBuf>,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// The configuration file in effect
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(menucart_config::Config::path)
    }
}

/// Read markup from `file`, or from stdin when no file is given.
pub fn read_input(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut stdin = io::stdin();
            if stdin.is_terminal() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "no input provided; pass a file or pipe markup via stdin",
                ));
            }
            let mut input = String::new();
            stdin.read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

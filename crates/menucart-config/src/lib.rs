//! Configuration for wp-menu-cart
//!
//! A single TOML file describes the site the cart item is rendered for:
//! which menu sits in which theme location, where the options store and
//! translations live, which optional companions are available, and the cart
//! state the shop reports.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod errors;
pub mod paths;

pub use config::{CartConfig, Config, CONFIG_KEYS, DEFAULT_LOCALE, DEFAULT_MENU_LOCATION};
pub use errors::ConfigError;

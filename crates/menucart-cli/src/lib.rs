//! wp-menu-cart library - the menu cart plugin model and CLI commands
//!
//! Exposed as a library so the commands and the plugin model can be tested
//! without going through the binary.

pub mod commands;
pub mod common;
pub mod compat;
pub mod detection;
pub mod errors;
pub mod i18n;
pub mod notices;
pub mod options;
pub mod plugin;
pub mod shop;

pub use common::GlobalOpts;
pub use menucart_config as config;
pub use menucart_logger as logger;

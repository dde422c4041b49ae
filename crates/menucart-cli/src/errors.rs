//! Centralized error types for wp-menu-cart
//!
//! The common-class extractor and the hook dispatch never fail; everything
//! that can go wrong lives at the edges: reading the configuration, the
//! options store and the translation catalogs.

use menucart_config::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the key/value options store
#[derive(Error, Debug)]
pub enum OptionStoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse options file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize options: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors while loading a translation catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Error, Debug)]
pub enum MenuCartError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Options store error: {0}")]
    Options(#[from] OptionStoreError),

    #[error("Translation error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No supported shop plugin is active")]
    MissingShop,

    #[error("No menu is assigned to theme location '{0}'")]
    UnknownMenu(String),
}

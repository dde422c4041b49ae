//! Host key/value settings store
//!
//! The plugin persists almost nothing itself: the list of active plugins and
//! the "shop notice dismissed" flag both live in the host's options table,
//! and multisite installs keep network-wide plugins in a separate site
//! options table.

use crate::errors::OptionStoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;

pub trait OptionStore: Send + Sync {
    fn get_option(&self, name: &str) -> Option<Value>;

    fn update_option(&mut self, name: &str, value: Value) -> Result<(), OptionStoreError>;

    /// Network-wide option on multisite installs
    fn get_site_option(&self, name: &str) -> Option<Value>;
}

/// Read an option as a list of strings, ignoring non-string entries.
pub fn string_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(single)) if !single.is_empty() => vec![single],
        _ => Vec::new(),
    }
}

/// In-process store, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryOptionStore {
    options: BTreeMap<String, Value>,
    site_options: BTreeMap<String, Value>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_option(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.options.insert(name.to_string(), value.into());
        self
    }

    pub fn with_site_option(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.site_options.insert(name.to_string(), value.into());
        self
    }
}

impl OptionStore for MemoryOptionStore {
    fn get_option(&self, name: &str) -> Option<Value> {
        self.options.get(name).cloned()
    }

    fn update_option(&mut self, name: &str, value: Value) -> Result<(), OptionStoreError> {
        self.options.insert(name.to_string(), value);
        Ok(())
    }

    fn get_site_option(&self, name: &str) -> Option<Value> {
        self.site_options.get(name).cloned()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct OptionsFile {
    #[serde(default)]
    options: toml::Table,
    #[serde(default)]
    site_options: toml::Table,
}

/// Store persisted as a TOML file with `[options]` and `[site_options]`
/// tables. Updates are written through immediately.
#[derive(Debug, Clone)]
pub struct TomlOptionStore {
    path: PathBuf,
    data: OptionsFile,
}

impl TomlOptionStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, OptionStoreError> {
        let data = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            OptionsFile::default()
        };
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), OptionStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(&self.data)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl OptionStore for TomlOptionStore {
    fn get_option(&self, name: &str) -> Option<Value> {
        self.data.options.get(name).cloned()
    }

    fn update_option(&mut self, name: &str, value: Value) -> Result<(), OptionStoreError> {
        self.data.options.insert(name.to_string(), value);
        self.save()
    }

    fn get_site_option(&self, name: &str) -> Option<Value> {
        self.data.site_options.get(name).cloned()
    }
}

//! Translation catalogs for the `wpmenucart` text domain
//!
//! Catalogs are TOML files named `wpmenucart-<locale>.toml` with a
//! `[messages]` table mapping the English source string to its translation.

use crate::errors::CatalogError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const TEXT_DOMAIN: &str = "wpmenucart";

#[derive(Deserialize, Default)]
struct CatalogFile {
    #[serde(default)]
    messages: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locale: String,
    messages: HashMap<String, String>,
}

impl Catalog {
    /// A catalog that returns every string unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn catalog_path(languages_dir: &Path, locale: &str) -> PathBuf {
        languages_dir.join(format!("{}-{}.toml", TEXT_DOMAIN, locale))
    }

    /// Load the catalog for `locale`. No file for the locale means no
    /// translations, which is not an error.
    pub fn load(languages_dir: &Path, locale: &str) -> Result<Self, CatalogError> {
        let path = Self::catalog_path(languages_dir, locale);
        if !path.exists() {
            debug!(path = %path.display(), "No translation catalog, using source strings");
            return Ok(Self {
                locale: locale.to_string(),
                messages: HashMap::new(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|source| CatalogError::Read {
            path: path.clone(),
            source,
        })?;
        let file: CatalogFile =
            toml::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.clone(),
                source,
            })?;

        debug!(
            path = %path.display(),
            messages = file.messages.len(),
            "Loaded translation catalog"
        );
        Ok(Self {
            locale: locale.to_string(),
            messages: file.messages,
        })
    }

    pub fn from_messages(locale: &str, messages: HashMap<String, String>) -> Self {
        Self {
            locale: locale.to_string(),
            messages,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Translate `text`, falling back to the source string.
    pub fn gettext<'a>(&'a self, text: &'a str) -> &'a str {
        match self.messages.get(text) {
            Some(translated) if !translated.is_empty() => translated.as_str(),
            _ => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_identity_returns_source() {
        let catalog = Catalog::identity();
        assert_eq!(catalog.gettext("Start shopping"), "Start shopping");
    }

    #[test]
    fn test_empty_translation_falls_back() {
        let mut messages = HashMap::new();
        messages.insert("Start shopping".to_string(), String::new());
        let catalog = Catalog::from_messages("nl_NL", messages);
        assert_eq!(catalog.gettext("Start shopping"), "Start shopping");
    }

    #[test]
    fn test_load_catalog_from_dir() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let written = fs::write(
            Catalog::catalog_path(dir.path(), "nl_NL"),
            r#"
[messages]
"Start shopping" = "Begin met winkelen"
"View your shopping cart" = "Bekijk je winkelwagen"
"#,
        );
        if written.is_err() {
            return;
        }

        let loaded = Catalog::load(dir.path(), "nl_NL");
        assert!(loaded.is_ok_and(|c| c.locale() == "nl_NL"
            && c.len() == 2
            && c.gettext("Start shopping") == "Begin met winkelen"
            && c.gettext("Hide this notice") == "Hide this notice"));
    }

    #[test]
    fn test_missing_catalog_is_empty() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let loaded = Catalog::load(dir.path(), "fr_FR");
        assert!(loaded.is_ok_and(|c| c.is_empty()));
    }

    #[test]
    fn test_malformed_catalog_is_an_error() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        if fs::write(Catalog::catalog_path(dir.path(), "de_DE"), "[messages\n").is_err() {
            return;
        }
        assert!(matches!(
            Catalog::load(dir.path(), "de_DE"),
            Err(CatalogError::Parse { .. })
        ));
    }
}

use crate::errors::ConfigError;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Theme location whose menu receives the cart item
pub const DEFAULT_MENU_LOCATION: &str = "header-menu";
pub const DEFAULT_LOCALE: &str = "en_US";

const DEFAULT_OPTIONS_FILE: &str = "options.toml";
const DEFAULT_LANGUAGES_DIR: &str = "languages";
const DEFAULT_ADMIN_URL: &str = "/wp-admin/plugins.php";

/// Keys accepted by [`Config::get`] and [`Config::set`]
pub const CONFIG_KEYS: &[&str] = &[
    "menu-location",
    "menu-slug",
    "options-path",
    "languages-dir",
    "locale",
    "admin-url",
    "multisite",
    "wpml-string-translation",
    "ubermenu-version",
    "cart-contents-count",
    "cart-url",
    "shop-page-url",
];

/// Cart state reported by the shop
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    #[serde(default)]
    pub contents_count: u32,
    #[serde(default = "default_cart_url")]
    pub cart_url: String,
    #[serde(default = "default_shop_page_url")]
    pub shop_page_url: String,
}

fn default_cart_url() -> String {
    "/cart/".to_string()
}

fn default_shop_page_url() -> String {
    "/shop/".to_string()
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            contents_count: 0,
            cart_url: default_cart_url(),
            shop_page_url: default_shop_page_url(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_url: Option<String>,
    #[serde(default)]
    pub multisite: bool,
    #[serde(default)]
    pub wpml_string_translation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ubermenu_version: Option<String>,
    /// Theme location → menu slug
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub menu_locations: BTreeMap<String, String>,
    /// Overrides served by the string-translation companion, keyed by string name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub string_translations: BTreeMap<String, String>,
    #[serde(default)]
    pub cart: CartConfig,

    /// File this configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    pub fn path() -> PathBuf {
        paths::config_path()
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path())
    }

    /// Load from an explicit file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Config::default()
        };
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save back to the file this configuration came from.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self.source.clone().unwrap_or_else(Self::path);
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get_menu_location(&self) -> &str {
        self.menu_location.as_deref().unwrap_or(DEFAULT_MENU_LOCATION)
    }

    /// Slug of the menu assigned to the configured location, if any
    pub fn menu_slug(&self) -> Option<&str> {
        self.menu_locations
            .get(self.get_menu_location())
            .map(String::as_str)
            .filter(|slug| !slug.is_empty())
    }

    pub fn get_locale(&self) -> &str {
        self.locale.as_deref().unwrap_or(DEFAULT_LOCALE)
    }

    pub fn get_admin_url(&self) -> &str {
        self.admin_url.as_deref().unwrap_or(DEFAULT_ADMIN_URL)
    }

    pub fn get_options_path(&self) -> PathBuf {
        self.resolve(self.options_path.as_deref().unwrap_or(DEFAULT_OPTIONS_FILE))
    }

    pub fn get_languages_dir(&self) -> PathBuf {
        self.resolve(self.languages_dir.as_deref().unwrap_or(DEFAULT_LANGUAGES_DIR))
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        let anchor = self.source.clone().unwrap_or_else(Self::path);
        paths::sibling_of(&anchor, relative)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "menu-location" => self.menu_location.clone(),
            "menu-slug" => self.menu_slug().map(str::to_string),
            "options-path" => self.options_path.clone(),
            "languages-dir" => self.languages_dir.clone(),
            "locale" => self.locale.clone(),
            "admin-url" => self.admin_url.clone(),
            "multisite" => Some(self.multisite.to_string()),
            "wpml-string-translation" => Some(self.wpml_string_translation.to_string()),
            "ubermenu-version" => self.ubermenu_version.clone(),
            "cart-contents-count" => Some(self.cart.contents_count.to_string()),
            "cart-url" => Some(self.cart.cart_url.clone()),
            "shop-page-url" => Some(self.cart.shop_page_url.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "menu-location" => self.menu_location = Some(value),
            "menu-slug" => {
                let location = self.get_menu_location().to_string();
                self.menu_locations.insert(location, value);
            }
            "options-path" => self.options_path = Some(value),
            "languages-dir" => self.languages_dir = Some(value),
            "locale" => self.locale = Some(value),
            "admin-url" => self.admin_url = Some(value),
            "multisite" => self.multisite = parse_value(key, &value)?,
            "wpml-string-translation" => self.wpml_string_translation = parse_value(key, &value)?,
            "ubermenu-version" => self.ubermenu_version = Some(value),
            "cart-contents-count" => self.cart.contents_count = parse_value(key, &value)?,
            "cart-url" => self.cart.cart_url = value,
            "shop-page-url" => self.cart.shop_page_url = value,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Key/value pairs for display, in a stable order. Unset keys are skipped.
    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

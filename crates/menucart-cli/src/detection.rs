//! Shop and legacy-plugin detection
//!
//! The cart item only makes sense when a supported shop plugin is active,
//! and it must stay out of the way when one of the old standalone menu-cart
//! plugins is still activated (both would inject an item).

use crate::options::{string_list, OptionStore};
use menucart_hooks::HookRegistry;
use serde::Serialize;
use tracing::debug;

pub const ACTIVE_PLUGINS_OPTION: &str = "active_plugins";
pub const SITEWIDE_PLUGINS_OPTION: &str = "active_sitewide_plugins";
pub const SHOP_CHECK_OPTION: &str = "wpmenucart_shop_check";
pub const SHOP_CHECK_HIDDEN: &str = "hide";

/// Supported shop plugins: display name → plugin file
pub const SHOP_PLUGINS: &[(&str, &str)] = &[("WooCommerce", "woocommerce/woocommerce.php")];

/// Earlier releases that conflict with this one
pub const LEGACY_PLUGINS: &[&str] = &[
    "woocommerce-menu-bar-cart/wc_cart_nav.php",
    "woocommerce-menu-bar-cart/woocommerce-menu-cart.php",
    "woocommerce-menu-cart/woocommerce-menu-cart.php",
    "woocommerce-menu-cart-pro/woocommerce-menu-cart-pro.php",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveShop {
    pub name: &'static str,
    pub plugin: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum PluginStatus {
    Ready,
    MissingShop,
    LegacyVersionActive { plugins: Vec<String> },
}

impl PluginStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, PluginStatus::Ready)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub status: PluginStatus,
    pub active_plugins: Vec<String>,
    pub shops: Vec<ActiveShop>,
    pub legacy_plugins: Vec<String>,
    pub shop_notice_hidden: bool,
}

/// All active plugins, including network-activated ones on multisite.
///
/// The site list goes through the `active_plugins` filter first. Network
/// plugins are stored as `plugin file → activation time`, so only the keys
/// are merged in; duplicates keep their first position.
pub fn active_plugins(store: &dyn OptionStore, hooks: &HookRegistry, multisite: bool) -> Vec<String> {
    let site_plugins = string_list(store.get_option(ACTIVE_PLUGINS_OPTION));
    let mut active: Vec<String> = hooks.apply(ACTIVE_PLUGINS_OPTION, site_plugins, &[]);

    if multisite {
        if let Some(toml::Value::Table(sitewide)) = store.get_site_option(SITEWIDE_PLUGINS_OPTION) {
            active.extend(sitewide.keys().cloned());
        }
    }

    let mut seen = Vec::with_capacity(active.len());
    active.retain(|plugin| {
        if seen.contains(plugin) {
            false
        } else {
            seen.push(plugin.clone());
            true
        }
    });
    active
}

pub fn active_shops(active: &[String]) -> Vec<ActiveShop> {
    SHOP_PLUGINS
        .iter()
        .filter(|(_, plugin)| active.iter().any(|a| a == plugin))
        .map(|&(name, plugin)| ActiveShop { name, plugin })
        .collect()
}

pub fn active_legacy_versions(active: &[String]) -> Vec<String> {
    LEGACY_PLUGINS
        .iter()
        .filter(|legacy| active.iter().any(|a| a == *legacy))
        .map(|legacy| (*legacy).to_string())
        .collect()
}

pub fn shop_notice_hidden(store: &dyn OptionStore) -> bool {
    matches!(
        store.get_option(SHOP_CHECK_OPTION),
        Some(toml::Value::String(ref v)) if v == SHOP_CHECK_HIDDEN
    )
}

/// Decide whether the cart item can be enabled.
///
/// A missing shop only blocks when its notice has not been dismissed; a
/// conflicting legacy plugin always blocks.
pub fn check_status(store: &dyn OptionStore, hooks: &HookRegistry, multisite: bool) -> StatusReport {
    let active = active_plugins(store, hooks, multisite);
    let shops = active_shops(&active);
    let legacy = active_legacy_versions(&active);
    let hidden = shop_notice_hidden(store);

    let status = if shops.is_empty() && !hidden {
        PluginStatus::MissingShop
    } else if !legacy.is_empty() {
        PluginStatus::LegacyVersionActive {
            plugins: legacy.clone(),
        }
    } else {
        PluginStatus::Ready
    };

    debug!(
        active = active.len(),
        shops = shops.len(),
        legacy = legacy.len(),
        ?status,
        "Checked plugin status"
    );

    StatusReport {
        status,
        active_plugins: active,
        shops,
        legacy_plugins: legacy,
        shop_notice_hidden: hidden,
    }
}

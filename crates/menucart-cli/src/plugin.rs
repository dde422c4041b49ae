//! The menu cart plugin
//!
//! [`MenuCart::new`] only assembles settings and collaborators. Hooks are
//! attached by an explicit [`MenuCart::register`] call, which decides from
//! the active plugins whether the cart item is enabled or an admin notice is
//! shown instead.

use crate::compat::{Companions, STRING_CONTEXT, TRANSLATABLE_STRINGS};
use crate::detection::{self, PluginStatus, StatusReport};
use crate::i18n::Catalog;
use crate::notices;
use crate::options::OptionStore;
use crate::shop::{CartSummary, Shop};
use menucart_config::Config;
use menucart_hooks::{HookRegistry, DEFAULT_PRIORITY};
use menucart_markup::{common_list_item_classes, esc_attr};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

pub const ADMIN_NOTICES: &str = "admin_notices";
pub const CART_FRAGMENTS: &str = "add_to_cart_fragments";
/// Selector the storefront script uses to swap the cart link after an AJAX add
pub const FRAGMENT_SELECTOR: &str = "a.wpmenucart-contents";

pub const ITEM_BASE_CLASSES: &str = "wpmenucartli wpmenucart-display-standard";
pub const ITEM_ID: &str = "wpmenucartli";
const ANCHOR_CLASSES: &str = "wpmenucart-contents";
const EMPTY_ANCHOR_CLASSES: &str = "wpmenucart-contents empty-wpmenucart-visible";
const UBERMENU_TARGET_CLASS: &str = "ubermenu-target";
const CART_ICON: &str = r#"<i class="icon-basket"></i>"#;

const VIEW_CART_TEXT: &str = "View your shopping cart";
const START_SHOPPING_TEXT: &str = "Start shopping";

/// Filter names exposed to site code
pub mod filters {
    pub const EMPTY_URL: &str = "wpmenucart_emptyurl";
    pub const EMPTY_TITLE: &str = "wpmenucart_emptytitle";
    pub const FULL_URL: &str = "wpmenucart_fullurl";
    pub const FULL_TITLE: &str = "wpmenucart_fulltitle";
    pub const ANCHOR_CONTENT: &str = "wpmenucart_menu_item_a_content";
    pub const ANCHOR: &str = "wpmenucart_menu_item_a";
    pub const ITEM_CLASSES: &str = "wpmenucart_menu_item_classes";
    pub const ITEM: &str = "wpmenucart_menu_item_filter";
    pub const ITEM_WRAPPER: &str = "wpmenucart_menu_item_wrapper";
    pub const PREPEND_ITEM: &str = "wpmenucart_prepend_menu_item";
}

/// Settings the plugin is constructed with
#[derive(Debug, Clone, Default, Serialize)]
pub struct MenuCartSettings {
    /// Slug of the menu that receives the cart item
    pub menu_slug: Option<String>,
    pub wpml_string_translation: bool,
    pub multisite: bool,
    /// Admin page the missing-shop notice links back to
    pub admin_url: String,
}

impl MenuCartSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            menu_slug: config.menu_slug().map(str::to_string),
            wpml_string_translation: config.wpml_string_translation,
            multisite: config.multisite,
            admin_url: config.get_admin_url().to_string(),
        }
    }
}

/// Name of the filter the host applies to a menu's rendered items
pub fn menu_items_filter(slug: &str) -> String {
    format!("wp_nav_menu_{}_items", slug)
}

pub struct MenuCart {
    settings: MenuCartSettings,
    catalog: Catalog,
    companions: Companions,
    shop: Option<Arc<dyn Shop>>,
}

impl MenuCart {
    pub fn new(settings: MenuCartSettings) -> Self {
        Self {
            settings,
            catalog: Catalog::identity(),
            companions: Companions::default(),
            shop: None,
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_companions(mut self, companions: Companions) -> Self {
        self.companions = companions;
        self
    }

    pub fn with_shop(mut self, shop: Arc<dyn Shop>) -> Self {
        self.shop = Some(shop);
        self
    }

    pub fn settings(&self) -> &MenuCartSettings {
        &self.settings
    }

    /// Attach the plugin to the host's hooks.
    ///
    /// Registers the translatable strings, checks the active plugins, and
    /// then either adds the admin notice explaining why the cart is disabled
    /// or adds the menu and fragment filters.
    pub fn register(self: &Arc<Self>, hooks: &mut HookRegistry, store: &dyn OptionStore) -> StatusReport {
        self.register_strings();

        let report = detection::check_status(store, hooks, self.settings.multisite);
        match &report.status {
            PluginStatus::MissingShop => {
                let plugin = Arc::clone(self);
                hooks.add_action(ADMIN_NOTICES, DEFAULT_PRIORITY, move |_, _, out| {
                    out.push_str(&notices::need_shop(&plugin.catalog, &plugin.settings.admin_url));
                });
            }
            PluginStatus::LegacyVersionActive { plugins } => {
                info!(plugins = ?plugins, "Legacy menu cart plugin active, cart item disabled");
                let plugin = Arc::clone(self);
                hooks.add_action(ADMIN_NOTICES, DEFAULT_PRIORITY, move |_, _, out| {
                    out.push_str(&notices::legacy_version_active(&plugin.catalog));
                });
            }
            PluginStatus::Ready => self.register_menu_filters(hooks, &report),
        }
        report
    }

    fn register_strings(&self) {
        if !self.settings.wpml_string_translation {
            return;
        }
        if let Some(strings) = &self.companions.string_translation {
            for (name, value) in TRANSLATABLE_STRINGS {
                strings.register_string(STRING_CONTEXT, name, value);
            }
            debug!(count = TRANSLATABLE_STRINGS.len(), "Registered translatable strings");
        }
    }

    fn register_menu_filters(self: &Arc<Self>, hooks: &mut HookRegistry, report: &StatusReport) {
        if self.shop.is_none() || report.shops.is_empty() {
            debug!("No shop active, menu filters not registered");
            return;
        }

        if let Some(shop) = &self.shop {
            debug!(shop = shop.name(), "Registering cart fragments");
        }
        let plugin = Arc::clone(self);
        hooks.add_filter(CART_FRAGMENTS, DEFAULT_PRIORITY, move |registry, value, _| {
            match value {
                Value::Object(fragments) => {
                    Value::Object(plugin.ajax_fragments(registry, fragments))
                }
                other => other,
            }
        });

        let Some(slug) = self.settings.menu_slug.as_deref() else {
            debug!("No menu assigned, cart item not added to any menu");
            return;
        };

        let plugin = Arc::clone(self);
        hooks.add_filter(menu_items_filter(slug), DEFAULT_PRIORITY, move |registry, value, _| {
            match value {
                Value::String(items) => Value::String(plugin.add_cart_to_menu(registry, &items)),
                other => other,
            }
        });
        debug!(menu = slug, "Cart item filter registered");
    }

    /// Append (or prepend) the cart `<li>` to a menu's rendered items.
    ///
    /// The new item copies the classes all existing top-level items share.
    pub fn add_cart_to_menu(&self, hooks: &HookRegistry, items: &str) -> String {
        let mut classes = ITEM_BASE_CLASSES.to_string();
        let common = common_list_item_classes(items);
        if !common.is_empty() {
            classes.push(' ');
            classes.push_str(&common);
        }
        let classes: String = hooks.apply(filters::ITEM_CLASSES, classes, &[]);

        let anchor = self.menu_item(hooks).unwrap_or_default();
        let anchor: String = hooks.apply(filters::ITEM, anchor, &[]);

        let item = format!(
            r#"<li class="{}" id="{}">{}</li>"#,
            esc_attr(&classes),
            ITEM_ID,
            anchor
        );
        let item: String = hooks.apply(filters::ITEM_WRAPPER, item, &[]);

        if hooks.apply(filters::PREPEND_ITEM, false, &[]) {
            format!("{}{}", item, items)
        } else {
            format!("{}{}", items, item)
        }
    }

    /// Replace the cart link in the storefront's AJAX fragments. Other
    /// fragments are left as they are, whatever their shape.
    pub fn ajax_fragments(
        &self,
        hooks: &HookRegistry,
        mut fragments: Map<String, Value>,
    ) -> Map<String, Value> {
        if let Some(anchor) = self.menu_item(hooks) {
            fragments.insert(FRAGMENT_SELECTOR.to_string(), Value::String(anchor));
        }
        fragments
    }

    /// Build the cart link. `None` when no shop is loaded or a filter
    /// emptied the link.
    pub fn menu_item(&self, hooks: &HookRegistry) -> Option<String> {
        let shop = self.shop.as_ref()?;
        let item = shop.menu_item();
        let (viewing_cart, start_shopping) = self.hover_texts();
        let count = item.cart_contents_count;

        let (href, title, mut classes) = if item.is_empty() {
            (
                hooks.apply::<String>(filters::EMPTY_URL, item.shop_page_url.clone(), &[]),
                hooks.apply::<String>(filters::EMPTY_TITLE, start_shopping.clone(), &[]),
                EMPTY_ANCHOR_CLASSES.to_string(),
            )
        } else {
            (
                hooks.apply::<String>(filters::FULL_URL, item.cart_url.clone(), &[]),
                hooks.apply::<String>(filters::FULL_TITLE, viewing_cart.clone(), &[]),
                ANCHOR_CLASSES.to_string(),
            )
        };

        if self.companions.wants_ubermenu_target() {
            classes.push(' ');
            classes.push_str(UBERMENU_TARGET_CLASS);
        }

        let item_data = summary_value(&item);
        let content = format!(r#"{}<span class="cartcontents">{}</span>"#, CART_ICON, count);
        let content: String = hooks.apply(
            filters::ANCHOR_CONTENT,
            content,
            &[json!(CART_ICON), json!(count), item_data.clone()],
        );

        let anchor = format!(
            r#"<a class="{}" href="{}" title="{}">{}</a>"#,
            esc_attr(&classes),
            esc_attr(&href),
            esc_attr(&title),
            content
        );
        let settings = serde_json::to_value(&self.settings).unwrap_or(Value::Null);
        let anchor: String = hooks.apply(
            filters::ANCHOR,
            anchor,
            &[
                item_data,
                settings,
                json!(content),
                json!(viewing_cart),
                json!(start_shopping),
                json!(count),
            ],
        );

        (!anchor.is_empty()).then_some(anchor)
    }

    /// Hover titles, from the string-translation companion when it is
    /// enabled, otherwise from the catalog.
    fn hover_texts(&self) -> (String, String) {
        if self.settings.wpml_string_translation {
            if let Some(strings) = &self.companions.string_translation {
                return (
                    strings.translate(STRING_CONTEXT, "hover text", VIEW_CART_TEXT),
                    strings.translate(STRING_CONTEXT, "empty hover text", START_SHOPPING_TEXT),
                );
            }
        }
        (
            self.catalog.gettext(VIEW_CART_TEXT).to_string(),
            self.catalog.gettext(START_SHOPPING_TEXT).to_string(),
        )
    }
}

fn summary_value(item: &CartSummary) -> Value {
    serde_json::to_value(item).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::{StringTable, StringTranslation};
    use crate::detection::{ACTIVE_PLUGINS_OPTION, SHOP_CHECK_HIDDEN, SHOP_CHECK_OPTION};
    use crate::options::MemoryOptionStore;
    use crate::shop::WooCommerce;
    use menucart_config::CartConfig;
    use std::collections::{BTreeMap, HashMap};

    const MENU: &str = r#"<li class="menu-item nav-item current"><a href="/">Home</a></li><li class="menu-item nav-item"><a href="/blog">Blog</a></li>"#;

    fn shop(count: u32) -> Arc<dyn Shop> {
        Arc::new(WooCommerce::new(CartConfig {
            contents_count: count,
            cart_url: "/cart/".to_string(),
            shop_page_url: "/shop/".to_string(),
        }))
    }

    fn settings() -> MenuCartSettings {
        MenuCartSettings {
            menu_slug: Some("main".to_string()),
            admin_url: "/wp-admin/plugins.php".to_string(),
            ..MenuCartSettings::default()
        }
    }

    fn woocommerce_store() -> MemoryOptionStore {
        MemoryOptionStore::new().with_option(
            ACTIVE_PLUGINS_OPTION,
            vec![toml::Value::from("woocommerce/woocommerce.php")],
        )
    }

    #[test]
    fn test_new_registers_nothing() {
        let hooks = HookRegistry::new();
        let _plugin = MenuCart::new(settings()).with_shop(shop(1));
        assert!(!hooks.has_filter(&menu_items_filter("main")));
        assert!(!hooks.has_action(ADMIN_NOTICES));
    }

    #[test]
    fn test_menu_item_with_items_in_cart() {
        let plugin = MenuCart::new(settings()).with_shop(shop(3));
        let anchor = plugin.menu_item(&HookRegistry::new());
        assert_eq!(
            anchor.as_deref(),
            Some(r#"<a class="wpmenucart-contents" href="/cart/" title="View your shopping cart"><i class="icon-basket"></i><span class="cartcontents">3</span></a>"#)
        );
    }

    #[test]
    fn test_menu_item_with_empty_cart() {
        let plugin = MenuCart::new(settings()).with_shop(shop(0));
        let anchor = plugin.menu_item(&HookRegistry::new());
        assert_eq!(
            anchor.as_deref(),
            Some(r#"<a class="wpmenucart-contents empty-wpmenucart-visible" href="/shop/" title="Start shopping"><i class="icon-basket"></i><span class="cartcontents">0</span></a>"#)
        );
    }

    #[test]
    fn test_menu_item_without_shop() {
        let plugin = MenuCart::new(settings());
        assert!(plugin.menu_item(&HookRegistry::new()).is_none());
    }

    #[test]
    fn test_ubermenu_target_class() {
        let plugin = MenuCart::new(settings())
            .with_shop(shop(1))
            .with_companions(Companions {
                ubermenu_version: Some("3.1".to_string()),
                ..Companions::default()
            });
        let anchor = plugin.menu_item(&HookRegistry::new()).unwrap_or_default();
        assert!(anchor.starts_with(r#"<a class="wpmenucart-contents ubermenu-target""#));
    }

    #[test]
    fn test_url_and_title_filters() {
        let mut hooks = HookRegistry::new();
        hooks.add_filter(filters::FULL_URL, DEFAULT_PRIORITY, |_, _, _| json!("/checkout/?step=1&x=2"));
        hooks.add_filter(filters::FULL_TITLE, DEFAULT_PRIORITY, |_, _, _| json!("Your \"bag\""));

        let plugin = MenuCart::new(settings()).with_shop(shop(2));
        let anchor = plugin.menu_item(&hooks).unwrap_or_default();
        assert!(anchor.contains(r#"href="/checkout/?step=1&amp;x=2""#));
        assert!(anchor.contains(r#"title="Your &quot;bag&quot;""#));
    }

    #[test]
    fn test_anchor_content_filter_receives_count() {
        let mut hooks = HookRegistry::new();
        hooks.add_filter(filters::ANCHOR_CONTENT, DEFAULT_PRIORITY, |_, _, args| {
            let count = args.get(1).and_then(Value::as_u64).unwrap_or(0);
            json!(format!("{} items", count))
        });

        let plugin = MenuCart::new(settings()).with_shop(shop(5));
        let anchor = plugin.menu_item(&hooks).unwrap_or_default();
        assert!(anchor.ends_with(">5 items</a>"));
    }

    #[test]
    fn test_emptied_anchor_is_none() {
        let mut hooks = HookRegistry::new();
        hooks.add_filter(filters::ANCHOR, DEFAULT_PRIORITY, |_, _, _| json!(""));
        let plugin = MenuCart::new(settings()).with_shop(shop(5));
        assert!(plugin.menu_item(&hooks).is_none());
    }

    #[test]
    fn test_add_cart_to_menu_copies_common_classes() {
        let plugin = MenuCart::new(settings()).with_shop(shop(1));
        let out = plugin.add_cart_to_menu(&HookRegistry::new(), MENU);
        assert!(out.starts_with(MENU));
        assert!(out.contains(
            r#"<li class="wpmenucartli wpmenucart-display-standard menu-item nav-item" id="wpmenucartli"><a class="wpmenucart-contents""#
        ));
        assert!(out.ends_with("</a></li>"));
    }

    #[test]
    fn test_add_cart_to_menu_prepends_when_asked() {
        let mut hooks = HookRegistry::new();
        hooks.add_filter(filters::PREPEND_ITEM, DEFAULT_PRIORITY, |_, _, _| json!(true));
        hooks.add_filter(filters::ITEM_CLASSES, DEFAULT_PRIORITY, |_, value, _| {
            json!(format!("{} extra", value.as_str().unwrap_or_default()))
        });

        let plugin = MenuCart::new(settings()).with_shop(shop(1));
        let out = plugin.add_cart_to_menu(&hooks, MENU);
        assert!(out.starts_with(r#"<li class="wpmenucartli wpmenucart-display-standard menu-item nav-item extra" id="wpmenucartli">"#));
        assert!(out.ends_with(MENU));
    }

    #[test]
    fn test_add_cart_to_empty_menu_uses_base_classes() {
        let plugin = MenuCart::new(settings()).with_shop(shop(1));
        let out = plugin.add_cart_to_menu(&HookRegistry::new(), "");
        assert!(out.starts_with(r#"<li class="wpmenucartli wpmenucart-display-standard" id="wpmenucartli">"#));
    }

    #[test]
    fn test_ajax_fragments_replace_cart_link() {
        let plugin = MenuCart::new(settings()).with_shop(shop(2));
        let mut fragments = Map::new();
        fragments.insert("div.widget_shopping_cart_content".to_string(), json!("<div/>"));
        let fragments = plugin.ajax_fragments(&HookRegistry::new(), fragments);
        assert_eq!(fragments.len(), 2);
        assert!(fragments
            .get(FRAGMENT_SELECTOR)
            .and_then(Value::as_str)
            .is_some_and(|a| a.contains(r#"<span class="cartcontents">2</span>"#)));
    }

    #[test]
    fn test_fragments_filter_keeps_non_string_fragments() {
        let mut hooks = HookRegistry::new();
        let plugin = Arc::new(MenuCart::new(settings()).with_shop(shop(0)));
        plugin.register(&mut hooks, &woocommerce_store());

        let filtered = hooks.apply_filters(
            CART_FRAGMENTS,
            json!({
                "div.widget_shopping_cart_content": "<div/>",
                "cart_hash": "abc",
                "count": 3
            }),
            &[],
        );
        assert_eq!(filtered.get("div.widget_shopping_cart_content"), Some(&json!("<div/>")));
        assert_eq!(filtered.get("cart_hash"), Some(&json!("abc")));
        assert_eq!(filtered.get("count"), Some(&json!(3)));
        assert!(filtered
            .get(FRAGMENT_SELECTOR)
            .and_then(Value::as_str)
            .is_some_and(|a| a.contains("empty-wpmenucart-visible")));
    }

    #[test]
    fn test_fragments_filter_passes_non_objects_through() {
        let mut hooks = HookRegistry::new();
        let plugin = Arc::new(MenuCart::new(settings()).with_shop(shop(1)));
        plugin.register(&mut hooks, &woocommerce_store());
        assert_eq!(hooks.apply_filters(CART_FRAGMENTS, json!("none"), &[]), json!("none"));
    }

    #[test]
    fn test_register_ready_adds_menu_filter() {
        let mut hooks = HookRegistry::new();
        let plugin = Arc::new(MenuCart::new(settings()).with_shop(shop(1)));
        let report = plugin.register(&mut hooks, &woocommerce_store());

        assert!(report.status.is_ready());
        assert!(hooks.has_filter(&menu_items_filter("main")));
        assert!(hooks.has_filter(CART_FRAGMENTS));
        assert!(!hooks.has_action(ADMIN_NOTICES));

        let rendered: String = hooks.apply(&menu_items_filter("main"), MENU.to_string(), &[]);
        assert!(rendered.contains(r#"id="wpmenucartli""#));

        let fragments: BTreeMap<String, String> =
            hooks.apply(CART_FRAGMENTS, BTreeMap::new(), &[]);
        assert!(fragments.contains_key(FRAGMENT_SELECTOR));
    }

    #[test]
    fn test_register_without_menu_slug_skips_menu_filter() {
        let mut hooks = HookRegistry::new();
        let plugin = Arc::new(
            MenuCart::new(MenuCartSettings {
                menu_slug: None,
                ..settings()
            })
            .with_shop(shop(1)),
        );
        let report = plugin.register(&mut hooks, &woocommerce_store());
        assert!(report.status.is_ready());
        assert!(hooks.has_filter(CART_FRAGMENTS));
        assert!(!hooks.has_filter(&menu_items_filter("main")));
    }

    #[test]
    fn test_register_missing_shop_adds_notice() {
        let mut hooks = HookRegistry::new();
        let plugin = Arc::new(MenuCart::new(settings()));
        let report = plugin.register(&mut hooks, &MemoryOptionStore::new());

        assert_eq!(report.status, PluginStatus::MissingShop);
        assert!(!hooks.has_filter(&menu_items_filter("main")));
        let notice = hooks.do_action(ADMIN_NOTICES, &[]);
        assert!(notice.contains("could not detect an active shop plugin"));
        assert!(notice.contains("hide_wpmenucart_shop_check=true"));
    }

    #[test]
    fn test_register_hidden_notice_without_shop_stays_quiet() {
        let mut hooks = HookRegistry::new();
        let store = MemoryOptionStore::new().with_option(SHOP_CHECK_OPTION, SHOP_CHECK_HIDDEN);
        let plugin = Arc::new(MenuCart::new(settings()).with_shop(shop(1)));
        let report = plugin.register(&mut hooks, &store);

        assert!(report.status.is_ready());
        assert!(!hooks.has_action(ADMIN_NOTICES));
        assert!(!hooks.has_filter(CART_FRAGMENTS));
        assert!(!hooks.has_filter(&menu_items_filter("main")));
    }

    #[test]
    fn test_register_legacy_adds_notice() {
        let mut hooks = HookRegistry::new();
        let store = MemoryOptionStore::new().with_option(
            ACTIVE_PLUGINS_OPTION,
            vec![
                toml::Value::from("woocommerce/woocommerce.php"),
                toml::Value::from("woocommerce-menu-cart-pro/woocommerce-menu-cart-pro.php"),
            ],
        );
        let plugin = Arc::new(MenuCart::new(settings()).with_shop(shop(1)));
        let report = plugin.register(&mut hooks, &store);

        assert!(matches!(report.status, PluginStatus::LegacyVersionActive { .. }));
        assert!(!hooks.has_filter(&menu_items_filter("main")));
        assert!(hooks
            .do_action(ADMIN_NOTICES, &[])
            .contains("An old version of WooCommerce Menu Cart"));
    }

    #[test]
    fn test_string_translation_companion() {
        let mut overrides = BTreeMap::new();
        overrides.insert("hover text".to_string(), "Naar winkelwagen".to_string());
        let table = Arc::new(StringTable::new(overrides));
        let companion: Arc<dyn StringTranslation> = table.clone();

        let plugin = Arc::new(
            MenuCart::new(MenuCartSettings {
                wpml_string_translation: true,
                ..settings()
            })
            .with_shop(shop(1))
            .with_companions(Companions {
                string_translation: Some(companion),
                ..Companions::default()
            }),
        );

        let mut hooks = HookRegistry::new();
        plugin.register(&mut hooks, &woocommerce_store());
        assert_eq!(table.registered().len(), TRANSLATABLE_STRINGS.len());

        let anchor = plugin.menu_item(&hooks).unwrap_or_default();
        assert!(anchor.contains(r#"title="Naar winkelwagen""#));
    }

    #[test]
    fn test_catalog_translates_titles() {
        let mut messages = HashMap::new();
        messages.insert("Start shopping".to_string(), "Begin met winkelen".to_string());
        let plugin = MenuCart::new(settings())
            .with_shop(shop(0))
            .with_catalog(Catalog::from_messages("nl_NL", messages));
        let anchor = plugin.menu_item(&HookRegistry::new()).unwrap_or_default();
        assert!(anchor.contains(r#"title="Begin met winkelen""#));
    }
}

use crate::compat::{Companions, StringTable, StringTranslation};
use crate::detection::StatusReport;
use crate::errors::MenuCartError;
use crate::i18n::Catalog;
use crate::logger;
use crate::options::TomlOptionStore;
use crate::plugin::{menu_items_filter, MenuCart, MenuCartSettings};
use crate::shop::WooCommerce;
use crate::GlobalOpts;
use menucart_config::Config;
use menucart_hooks::HookRegistry;
use std::sync::Arc;

/// A site assembled from the configuration: options, translations, the
/// companions, and the plugin registered on a fresh hook registry.
pub struct SiteContext {
    pub config: Config,
    pub store: TomlOptionStore,
    pub hooks: HookRegistry,
    pub plugin: Arc<MenuCart>,
    pub report: StatusReport,
}

impl SiteContext {
    pub fn load(opts: &GlobalOpts) -> Result<Self, MenuCartError> {
        Self::from_config(load_config(opts)?)
    }

    pub fn from_config(config: Config) -> Result<Self, MenuCartError> {
        let options_path = config.get_options_path();
        logger::debug(&format!("Reading options from: {}", options_path.display()));
        let store = TomlOptionStore::open(&options_path)?;

        let catalog = Catalog::load(&config.get_languages_dir(), config.get_locale())?;
        let plugin = Arc::new(
            MenuCart::new(MenuCartSettings::from_config(&config))
                .with_catalog(catalog)
                .with_companions(companions_for(&config))
                .with_shop(Arc::new(WooCommerce::new(config.cart.clone()))),
        );

        let mut hooks = HookRegistry::new();
        let report = plugin.register(&mut hooks, &store);
        logger::debug(&format!("Plugin status: {:?}", report.status));

        Ok(SiteContext {
            config,
            store,
            hooks,
            plugin,
            report,
        })
    }

    /// Filter name for the menu at the configured theme location.
    pub fn menu_filter(&self) -> Result<String, MenuCartError> {
        self.config
            .menu_slug()
            .map(menu_items_filter)
            .ok_or_else(|| MenuCartError::UnknownMenu(self.config.get_menu_location().to_string()))
    }
}

pub fn load_config(opts: &GlobalOpts) -> Result<Config, MenuCartError> {
    let path = opts.config_path();
    logger::debug(&format!("Reading config from: {}", path.display()));
    Ok(Config::load_from(&path)?)
}

fn companions_for(config: &Config) -> Companions {
    let string_translation = if config.wpml_string_translation {
        let table: Arc<dyn StringTranslation> =
            Arc::new(StringTable::new(config.string_translations.clone()));
        Some(table)
    } else {
        None
    };
    Companions {
        string_translation,
        ubermenu_version: config.ubermenu_version.clone(),
    }
}

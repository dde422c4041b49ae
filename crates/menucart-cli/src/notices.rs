//! Admin notices and their dismissal
//!
//! Notices are the only user-facing output when the cart cannot be enabled.
//! The missing-shop notice carries a link that, when followed, stores a flag
//! so the notice is not shown again.

use crate::detection::{SHOP_CHECK_HIDDEN, SHOP_CHECK_OPTION};
use crate::errors::OptionStoreError;
use crate::i18n::Catalog;
use crate::options::OptionStore;
use menucart_markup::{add_query_arg, esc_attr, esc_html, format_positional};
use tracing::info;

/// Query argument that dismisses the missing-shop notice
pub const HIDE_QUERY_ARG: &str = "hide_wpmenucart_shop_check";

pub const NEED_SHOP_TEXT: &str = "WP Menu Cart Pro could not detect an active shop plugin. Make sure you have activated at least one of the supported plugins.";
pub const HIDE_NOTICE_TEXT: &str = "Hide this notice";
pub const LEGACY_VERSION_TEXT: &str = "An old version of WooCommerce Menu Cart is currently activated, you need to disable or uninstall it for WP Menu Cart to function properly";

const NEED_SHOP_TEMPLATE: &str = r#"<div class="error"><p>%1$s <a href="%2$s">%3$s</a></p></div>"#;

/// Notice shown when no supported shop plugin is active.
pub fn need_shop(catalog: &Catalog, admin_url: &str) -> String {
    let hide_url = add_query_arg(admin_url, HIDE_QUERY_ARG, "true");
    format_positional(
        NEED_SHOP_TEMPLATE,
        &[
            &esc_html(catalog.gettext(NEED_SHOP_TEXT)),
            &esc_attr(&hide_url),
            &esc_html(catalog.gettext(HIDE_NOTICE_TEXT)),
        ],
    )
}

/// Notice shown when an old standalone release is still active.
pub fn legacy_version_active(catalog: &Catalog) -> String {
    format!(
        r#"<div class="error"><p>{}</p></div>"#,
        esc_html(catalog.gettext(LEGACY_VERSION_TEXT))
    )
}

/// Handle a request's query arguments. Returns `true` when the request
/// dismissed the missing-shop notice.
pub fn handle_dismiss_request<'a, I>(
    query: I,
    store: &mut dyn OptionStore,
) -> Result<bool, OptionStoreError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let dismissed = query
        .into_iter()
        .any(|(key, value)| key == HIDE_QUERY_ARG && !value.is_empty());
    if !dismissed {
        return Ok(false);
    }

    store.update_option(SHOP_CHECK_OPTION, toml::Value::from(SHOP_CHECK_HIDDEN))?;
    info!("Missing-shop notice dismissed");
    Ok(true)
}

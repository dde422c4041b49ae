use super::context::SiteContext;
use crate::errors::MenuCartError;
use crate::plugin::CART_FRAGMENTS;
use crate::GlobalOpts;
use std::collections::BTreeMap;

/// Print the AJAX cart fragments as JSON.
pub fn handle_fragments(opts: &GlobalOpts) -> Result<(), MenuCartError> {
    let ctx = SiteContext::load(opts)?;
    if ctx.report.shops.is_empty() {
        return Err(MenuCartError::MissingShop);
    }

    let fragments: BTreeMap<String, String> =
        ctx.hooks.apply(CART_FRAGMENTS, BTreeMap::new(), &[]);
    println!("{}", serde_json::to_string_pretty(&fragments)?);
    Ok(())
}

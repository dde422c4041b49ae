//! Shop collaborator
//!
//! The menu item only needs three facts from the shop: how many items are in
//! the cart, where the cart page is, and where to send shoppers when the cart
//! is empty.

use menucart_config::CartConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub cart_contents_count: u32,
    pub cart_url: String,
    pub shop_page_url: String,
}

impl CartSummary {
    pub fn is_empty(&self) -> bool {
        self.cart_contents_count == 0
    }
}

pub trait Shop: Send + Sync {
    /// Display name of the shop plugin
    fn name(&self) -> &str;

    fn menu_item(&self) -> CartSummary;
}

/// WooCommerce cart state as reported to the menu.
#[derive(Debug, Clone)]
pub struct WooCommerce {
    cart: CartConfig,
}

impl WooCommerce {
    pub fn new(cart: CartConfig) -> Self {
        Self { cart }
    }
}

impl Shop for WooCommerce {
    fn name(&self) -> &str {
        "WooCommerce"
    }

    fn menu_item(&self) -> CartSummary {
        CartSummary {
            cart_contents_count: self.cart.contents_count,
            cart_url: self.cart.cart_url.clone(),
            shop_page_url: self.cart.shop_page_url.clone(),
        }
    }
}

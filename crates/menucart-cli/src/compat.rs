//! Optional companion plugins
//!
//! Companions are resolved once when the site is assembled and handed to the
//! plugin; nothing probes for them while rendering.

use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Context under which the menu cart registers its strings
pub const STRING_CONTEXT: &str = "WP Menu Cart";

/// Strings offered to the string-translation companion: name → source text
pub const TRANSLATABLE_STRINGS: &[(&str, &str)] = &[
    ("item text", "item"),
    ("items text", "items"),
    ("empty cart text", "your cart is currently empty"),
    ("hover text", "View your shopping cart"),
    ("empty hover text", "Start shopping"),
];

/// Mega-menu releases from this version on expect `ubermenu-target` on links
const UBERMENU_TARGET_SINCE: &str = "3.0.0";

/// A string-translation service (WPML style).
pub trait StringTranslation: Send + Sync {
    fn register_string(&self, context: &str, name: &str, value: &str);

    fn translate(&self, context: &str, name: &str, default: &str) -> String;
}

/// String translation backed by a fixed table of overrides.
#[derive(Default)]
pub struct StringTable {
    overrides: BTreeMap<String, String>,
    registered: Mutex<BTreeMap<(String, String), String>>,
}

impl StringTable {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self {
            overrides,
            registered: Mutex::new(BTreeMap::new()),
        }
    }

    /// Strings registered so far as `(context, name) → source text`
    pub fn registered(&self) -> BTreeMap<(String, String), String> {
        self.registered.lock().clone()
    }
}

impl StringTranslation for StringTable {
    fn register_string(&self, context: &str, name: &str, value: &str) {
        self.registered
            .lock()
            .insert((context.to_string(), name.to_string()), value.to_string());
    }

    fn translate(&self, _context: &str, name: &str, default: &str) -> String {
        self.overrides
            .get(name)
            .filter(|text| !text.is_empty())
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

#[derive(Clone, Default)]
pub struct Companions {
    pub string_translation: Option<Arc<dyn StringTranslation>>,
    pub ubermenu_version: Option<String>,
}

impl fmt::Debug for Companions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Companions")
            .field("string_translation", &self.string_translation.is_some())
            .field("ubermenu_version", &self.ubermenu_version)
            .finish()
    }
}

impl Companions {
    /// Whether cart links need the mega-menu's target class.
    pub fn wants_ubermenu_target(&self) -> bool {
        self.ubermenu_version
            .as_deref()
            .is_some_and(|version| compare_versions(version, UBERMENU_TARGET_SINCE) != Ordering::Less)
    }
}

/// Compare dotted version strings numerically (`3.10` > `3.9`). Missing
/// components count as zero and any non-numeric suffix on a component is
/// ignored, so `3.0.0-beta` compares equal to `3.0.0`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |version: &str| -> Vec<u64> {
        version
            .trim()
            .trim_start_matches(['v', 'V'])
            .split('.')
            .map(|part| {
                let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().unwrap_or(0)
            })
            .collect()
    };
    let (left, right) = (parse(a), parse(b));
    let len = left.len().max(right.len());
    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

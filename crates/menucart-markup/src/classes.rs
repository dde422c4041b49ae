//! Common class extraction for sibling menu items
//!
//! The host renders a menu as a run of `<li>` elements (optionally wrapped in
//! a `<ul>`), each carrying theme-specific classes. The injected cart item
//! should look like its siblings, so we read the classes every top-level item
//! has in common and hand them back as a single space-joined string.

use scraper::{ElementRef, Html};
use tracing::{debug, trace};

const LIST_ITEM: &str = "li";

/// Diagnostics reported by the HTML parser for one fragment.
///
/// The parser records malformed-markup errors on the document instead of
/// failing. They are moved in here right after parsing and dropped when the
/// extraction scope ends, so no call ever sees another call's errors.
pub struct ParseDiagnostics {
    messages: Vec<String>,
}

impl ParseDiagnostics {
    /// Take the recorded errors out of a freshly parsed document.
    pub fn capture(document: &mut Html) -> Self {
        let messages = std::mem::take(&mut document.errors)
            .into_iter()
            .map(|message| message.into_owned())
            .collect();
        Self { messages }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Drop for ParseDiagnostics {
    fn drop(&mut self) {
        if !self.messages.is_empty() {
            trace!(count = self.messages.len(), "Discarding parser diagnostics");
        }
    }
}

/// Get a flat list of the classes shared by all top-level `<li>` items.
///
/// Items inside a nested sub-menu are ignored. Returns an empty string when
/// the markup is empty, holds no list items, or the items share nothing.
pub fn common_list_item_classes(markup: &str) -> String {
    if markup.is_empty() {
        return String::new();
    }

    let mut document = Html::parse_fragment(markup);
    let diagnostics = ParseDiagnostics::capture(&mut document);

    let items: Vec<ElementRef<'_>> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == LIST_ITEM)
        .collect();

    if items.is_empty() {
        debug!(
            diagnostics = diagnostics.len(),
            "No list items found in menu markup"
        );
        return String::new();
    }

    let mut eligible = items
        .iter()
        .filter(|item| is_top_level(item))
        .map(class_tokens);

    let Some(first) = eligible.next() else {
        debug!(
            items = items.len(),
            "All list items belong to nested sub-menus"
        );
        return String::new();
    };

    let common = eligible.fold(first, |common, tokens| {
        common
            .into_iter()
            .filter(|token| tokens.contains(token))
            .collect()
    });

    let flat = common.join(" ");
    debug!(
        items = items.len(),
        diagnostics = diagnostics.len(),
        classes = %flat,
        "Computed common menu item classes"
    );
    flat
}

/// An item is top-level when no other list item encloses it. This covers
/// items directly under the outer `<ul>` as well as bare sibling `<li>`s
/// with no container at all.
fn is_top_level(item: &ElementRef<'_>) -> bool {
    !item
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == LIST_ITEM)
}

/// Class tokens of one item in attribute order, duplicates dropped.
fn class_tokens<'a>(item: &ElementRef<'a>) -> Vec<&'a str> {
    let mut tokens: Vec<&'a str> = Vec::new();
    let value = item.value().attr("class").unwrap_or_default();
    for token in value.split_ascii_whitespace() {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

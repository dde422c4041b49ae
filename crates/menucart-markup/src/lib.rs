//! Menu markup utilities
//!
//! Everything in here works on plain strings of HTML: reading the classes
//! that the host's menu items share, and the small templating helpers used
//! to build the injected cart item.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod classes;
pub mod escape;
pub mod format;
pub mod query;

pub use classes::{common_list_item_classes, ParseDiagnostics};
pub use escape::{esc_attr, esc_html};
pub use format::format_positional;
pub use query::add_query_arg;

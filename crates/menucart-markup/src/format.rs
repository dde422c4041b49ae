//! Positional string templates
//!
//! Translated messages are written with printf-style placeholders so that
//! translators can reorder them: `%1$s` refers to the first argument, a bare
//! `%s` takes the next unused one, and `%%` is a literal percent sign.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;

static PLACEHOLDER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"%%|%(?:(\d+)\$)?s").ok());

/// Fill a positional template. Placeholders pointing past the end of `args`
/// are replaced with nothing.
pub fn format_positional(template: &str, args: &[&str]) -> String {
    let Some(placeholder) = PLACEHOLDER.as_ref() else {
        warn!("Placeholder pattern unavailable, returning template verbatim");
        return template.to_string();
    };

    let mut next = 0usize;
    placeholder
        .replace_all(template, |caps: &Captures<'_>| {
            if &caps[0] == "%%" {
                return "%".to_string();
            }
            let index = match caps.get(1) {
                Some(position) => position
                    .as_str()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1)),
                None => {
                    let index = next;
                    next += 1;
                    Some(index)
                }
            };
            index
                .and_then(|i| args.get(i))
                .map(|arg| (*arg).to_string())
                .unwrap_or_default()
        })
        .into_owned()
}

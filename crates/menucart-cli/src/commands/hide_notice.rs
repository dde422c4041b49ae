use super::context::load_config;
use crate::errors::MenuCartError;
use crate::logger;
use crate::notices::{handle_dismiss_request, HIDE_QUERY_ARG};
use crate::options::TomlOptionStore;
use crate::GlobalOpts;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct HideNoticeCommand {
    /// Query string of the admin request (default: hide_wpmenucart_shop_check=true)
    #[arg(long)]
    pub query: Option<String>,
}

/// Apply an admin request's query arguments to the options file.
pub fn handle_hide_notice(cmd: HideNoticeCommand, opts: &GlobalOpts) -> Result<(), MenuCartError> {
    let config = load_config(opts)?;
    let mut store = TomlOptionStore::open(&config.get_options_path())?;

    let query = cmd
        .query
        .unwrap_or_else(|| format!("{}=true", HIDE_QUERY_ARG));
    if handle_dismiss_request(parse_query(&query), &mut store)? {
        logger::success(&format!(
            "Shop notice hidden ({})",
            store.path().display()
        ));
    } else {
        logger::warn(&format!(
            "Request does not carry {}, nothing changed",
            HIDE_QUERY_ARG
        ));
    }
    Ok(())
}

/// Split `a=1&b=2` into pairs. A key without `=` has an empty value.
fn parse_query(query: &str) -> Vec<(&str, &str)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect()
}

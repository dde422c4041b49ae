//! URL query-string helper used for admin links

/// Append (or replace) a query argument on a URL, keeping any fragment at
/// the end. Keys and values are expected to be URL-safe already.
pub fn add_query_arg(url: &str, key: &str, value: &str) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };

    let (path, query) = match base.split_once('?') {
        Some((path, query)) => (path, query),
        None => (base, ""),
    };

    let mut pairs: Vec<String> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(key))
        .map(|pair| pair.to_string())
        .collect();
    pairs.push(format!("{}={}", key, value));

    let mut out = format!("{}?{}", path, pairs.join("&"));
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

//! URL string helpers.
//!
//! Content URLs are compared as plain strings, so these helpers work on
//! `&str` directly rather than parsing into a URL type.

use std::collections::HashMap;

/// Strip the query string (and anything after it).
pub fn strip_query(url: &str) -> &str {
    match url.find('?') {
        Some(idx) => &url[..idx],
        None => url,
    }
}

/// Query parameters of `url` as a map, percent-decoded. Later duplicates
/// win.
pub fn query_params(url: &str) -> HashMap<String, String> {
    let Some((_, query)) = url.split_once('?') else {
        return HashMap::new();
    };
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => (decode(name), decode(value)),
            None => (decode(pair), String::new()),
        })
        .collect()
}

/// Percent-decode `text`, keeping it as-is if it does not decode to UTF-8.
fn decode(text: &str) -> String {
    urlencoding::decode(text)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| text.to_string())
}

/// Append `name=value` to the query string of `url`.
pub fn add_query_param(url: &str, name: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{name}={value}")
}

/// Scheme and host of an absolute URL (`https://host:port`).
pub fn origin(url: &str) -> Option<&str> {
    let scheme_end = url.find("://")?;
    let rest = &url[scheme_end + 3..];
    if rest.is_empty() {
        return None;
    }
    let host_len = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    if host_len == 0 {
        return None;
    }
    Some(&url[..scheme_end + 3 + host_len])
}

/// True for `http://` and `https://` URLs.
pub fn is_absolute(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// The last non-empty path segment, ignoring one trailing `/` or `#`.
pub fn url_tail(url: &str) -> &str {
    let trimmed = url
        .strip_suffix('/')
        .or_else(|| url.strip_suffix('#'))
        .unwrap_or(url);
    trimmed.rsplit(['/', '#']).next().unwrap_or(trimmed)
}

//! Query-string helpers for redirect annotation.
//!
//! After a bulk save the next redirect carries a one-time marker argument,
//! and the admin screen strips registered arguments from the URL it
//! displays. These helpers operate on plain URL strings and keep every
//! other part of the URL (path, fragment, unrelated arguments) intact.

use indexmap::IndexMap;

struct Parts<'a> {
    base: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

fn split(url: &str) -> Parts<'_> {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, frag)) => (rest, Some(frag)),
        None => (url, None),
    };
    let (base, query) = match rest.split_once('?') {
        Some((base, q)) => (base, Some(q)),
        None => (rest, None),
    };
    Parts {
        base,
        query,
        fragment,
    }
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

/// Parses a query string (without the leading `?`) into ordered pairs.
///
/// A repeated name keeps its first position and its last value.
pub fn parse_query(query: &str) -> IndexMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode(k), decode(v)),
            None => (decode(pair), String::new()),
        })
        .collect()
}

fn build(parts: &Parts<'_>, args: &IndexMap<String, String>) -> String {
    let mut out = parts.base.to_string();
    if !args.is_empty() {
        out.push('?');
        let encoded: Vec<String> = args
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    urlencoding::encode(k).into_owned()
                } else {
                    format!("{}={}", urlencoding::encode(k), urlencoding::encode(v))
                }
            })
            .collect();
        out.push_str(&encoded.join("&"));
    }
    if let Some(fragment) = parts.fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Returns the decoded value of `name` in `url`'s query string.
pub fn query_arg(url: &str, name: &str) -> Option<String> {
    let query = split(url).query?;
    parse_query(query).shift_remove(name)
}

/// Sets `name=value` on `url`, replacing any existing value for `name`.
pub fn add_query_arg(url: &str, name: &str, value: &str) -> String {
    let parts = split(url);
    let mut args = parts.query.map(parse_query).unwrap_or_default();
    args.insert(name.to_string(), value.to_string());
    build(&parts, &args)
}

/// Removes every argument listed in `names` from `url`.
pub fn remove_query_args<S: AsRef<str>>(url: &str, names: &[S]) -> String {
    let parts = split(url);
    let Some(query) = parts.query else {
        return url.to_string();
    };
    let mut args = parse_query(query);
    args.retain(|k, _| !names.iter().any(|n| n.as_ref() == k));
    build(&parts, &args)
}

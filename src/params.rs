//! Query-string model for target URLs.
//!
//! Pairs are split on `&` and then on the first `=`. Pairs without `=` and
//! pairs with an empty name are skipped. Duplicate names resolve last-write-wins
//! in both [`parameters`] and [`override_param`], keeping the position of the
//! first occurrence.

use crate::error::{HunterError, Result};
use regex::{Captures, Regex};
use url::Url;

/// Parse `raw` and check it is an absolute http(s) URL with a host.
pub fn validate(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| HunterError::validation(raw, e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(HunterError::validation(raw, format!("unsupported scheme '{}'", other))),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(HunterError::validation(raw, "missing host"));
    }

    Ok(url)
}

/// Scheme, host, port and path; query and fragment removed.
pub fn base_url(url: &Url) -> Url {
    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);
    base
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

fn raw_pairs(url: &Url) -> impl Iterator<Item = (&str, &str)> {
    url.query()
        .unwrap_or("")
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(name, _)| !name.is_empty())
}

fn upsert(pairs: &mut Vec<(String, String)>, name: &str, value: String) {
    match pairs.iter_mut().find(|(k, _)| k == name) {
        Some(entry) => entry.1 = value,
        None => pairs.push((name.to_string(), value)),
    }
}

/// Ordered, decoded `(name, value)` mapping of the URL's query string.
pub fn parameters(url: &Url) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, value) in raw_pairs(url) {
        upsert(&mut pairs, &decode_component(name), decode_component(value));
    }
    pairs
}

/// A query parameter name, decoded and as spelled in the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    pub name: String,
    /// First spelling seen in the query string, e.g. `q%5B%5D` for `q[]`.
    pub raw_name: String,
}

/// Parameters in extraction order, one entry per decoded name.
pub fn query_params(url: &Url) -> Vec<QueryParam> {
    let mut params: Vec<QueryParam> = Vec::new();
    for (raw_name, _) in raw_pairs(url) {
        let name = decode_component(raw_name);
        if !params.iter().any(|p| p.name == name) {
            params.push(QueryParam {
                name,
                raw_name: raw_name.to_string(),
            });
        }
    }
    params
}

/// Parameter names in extraction order. Empty when there is no query string,
/// which callers treat as "not applicable".
pub fn extract(url: &Url) -> Vec<String> {
    query_params(url).into_iter().map(|p| p.name).collect()
}

/// Rebuild `url` with `name` set to `value`, every other parameter kept by value.
pub fn override_param(url: &Url, name: &str, value: &str) -> Url {
    let mut pairs = parameters(url);
    upsert(&mut pairs, name, value.to_string());

    let mut rebuilt = base_url(url);
    rebuilt
        .query_pairs_mut()
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    rebuilt
}

/// Textual substitution of `name`'s value, without re-encoding.
///
/// Only used to build the proof URL shown to the user and written to the
/// output file; outgoing requests always go through [`override_param`].
pub fn replace_literal(url: &str, name: &str, value: &str) -> String {
    let pattern = format!(r"(^|[?&]){}=[^&#]*", regex::escape(name));
    match Regex::new(&pattern) {
        Ok(re) => re
            .replace_all(url, |caps: &Captures| format!("{}{}={}", &caps[1], name, value))
            .into_owned(),
        Err(_) => url.to_string(),
    }
}

/// `raw_url` with `param` rewritten to `payload` for display.
///
/// Matches the spelling from the parsed query first, then the decoded name,
/// since the parser may have normalised characters the user typed raw.
pub fn proof_url(raw_url: &str, param: &QueryParam, payload: &str) -> String {
    let proof = replace_literal(raw_url, &param.raw_name, payload);
    if proof != raw_url || param.raw_name == param.name {
        return proof;
    }
    replace_literal(raw_url, &param.name, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn validate_rejects_bad_targets() {
        assert!(validate("http://example.com/?id=1").is_ok());
        assert!(validate("https://example.com").is_ok());
        assert!(validate("ftp://example.com/?id=1").is_err());
        assert!(validate("example.com/?id=1").is_err());
        assert!(validate("file:///etc/passwd").is_err());
    }

    #[test]
    fn no_query_means_no_parameters() {
        assert!(extract(&url("http://example.com/search")).is_empty());
        assert!(extract(&url("http://example.com/search?")).is_empty());
    }

    #[test]
    fn extract_skips_malformed_pairs() {
        let u = url("http://example.com/?a=1&flag&=orphan&b=2&c=");
        assert_eq!(extract(&u), vec!["a", "b", "c"]);
    }

    #[test]
    fn duplicate_names_are_last_write_wins() {
        let u = url("http://example.com/?id=1&q=x&id=2");
        assert_eq!(extract(&u), vec!["id", "q"]);
        assert_eq!(parameters(&u)[0], ("id".to_string(), "2".to_string()));
    }

    #[test]
    fn override_round_trips_values_needing_encoding() {
        let u = url("http://example.com/p?id=1&q=keep%20me");
        for value in ["a b", "x&y=z", "<script>alert('XSS')</script>", "100%"] {
            let rebuilt = override_param(&u, "id", value);
            let params = parameters(&rebuilt);
            assert_eq!(params[0], ("id".to_string(), value.to_string()));
            assert_eq!(params[1], ("q".to_string(), "keep me".to_string()));
        }
    }

    #[test]
    fn override_adds_missing_parameter() {
        let rebuilt = override_param(&url("http://example.com/"), "test", "v");
        assert_eq!(rebuilt.as_str(), "http://example.com/?test=v");
    }

    #[test]
    fn override_drops_fragment() {
        let rebuilt = override_param(&url("http://example.com/a?id=1#frag"), "id", "2");
        assert_eq!(rebuilt.as_str(), "http://example.com/a?id=2");
    }

    #[test]
    fn replace_literal_is_unencoded_and_name_exact() {
        let proof = replace_literal("http://test/?xid=9&id=2&q=3", "id", "<script>alert('XSS')</script>");
        assert_eq!(proof, "http://test/?xid=9&id=<script>alert('XSS')</script>&q=3");
    }

    #[test]
    fn encoded_names_keep_their_raw_spelling() {
        let u = url("http://example.com/?q%5B%5D=1&first+name=2&q[]=3");
        let params = query_params(&u);
        assert_eq!(extract(&u), vec!["q[]", "first name"]);
        assert_eq!(params[0].raw_name, "q%5B%5D");
        assert_eq!(params[1].raw_name, "first+name");
    }

    #[test]
    fn proof_url_rewrites_encoded_names() {
        let raw = "http://test/?q%5B%5D=1&first+name=2";
        let params = query_params(&url(raw));
        assert_eq!(proof_url(raw, &params[0], "<b>"), "http://test/?q%5B%5D=<b>&first+name=2");
        assert_eq!(proof_url(raw, &params[1], "<b>"), "http://test/?q%5B%5D=1&first+name=<b>");
    }

    #[test]
    fn proof_url_falls_back_to_decoded_name() {
        // The parser percent-encodes the space typed in the raw URL.
        let raw = "http://test/?a b=1";
        let params = query_params(&url(raw));
        assert_eq!(params[0].raw_name, "a%20b");
        assert_eq!(proof_url(raw, &params[0], "<b>"), "http://test/?a b=<b>");
    }

    #[test]
    fn replace_literal_treats_dollar_literally() {
        let proof = replace_literal("http://test/?id=2", "id", "$1${x}");
        assert_eq!(proof, "http://test/?id=$1${x}");
    }
}

//! Route parameters, query strings and concrete locations.
//!
//! - [`RouteParams`]: path parameters extracted from dynamic segments
//!   (`/users/:id`) when a path is resolved against the route table.
//! - [`QueryParams`]: the `?key=value&...` part of a URL, order preserving
//!   and multi-valued.
//! - [`Location`]: a concrete navigation target split into path and query.
//!
//! # Example
//!
//! ```
//! use console_navigator::params::Location;
//!
//! let location = Location::parse("/login?redirect=%2Fusers%3Fpage%3D2");
//! assert_eq!(location.path, "/login");
//! assert_eq!(location.query.get("redirect"), Some("/users?page=2"));
//! ```

use std::collections::HashMap;

/// Route parameters extracted from path segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteParams {
    params: HashMap<String, String>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

impl<'k, 'v> From<matchit::Params<'k, 'v>> for RouteParams {
    fn from(params: matchit::Params<'k, 'v>) -> Self {
        let mut out = RouteParams::new();
        for (key, value) in params.iter() {
            out.insert(key.to_string(), value.to_string());
        }
        out
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters parsed from a URL query string.
///
/// Pairs keep their original order, so a query survives a parse/serialize
/// cycle unchanged. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create empty query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a query string (without the leading `?`).
    pub fn from_query_string(query: &str) -> Self {
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (decode_uri_component(key), decode_uri_component(value)),
                None => (decode_uri_component(pair), String::new()),
            })
            .collect();

        Self { pairs }
    }

    /// Get the first value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get all values for a key, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Get the first value for a key, parsed as type `T`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Append a value for the given key.
    pub fn insert(&mut self, key: String, value: String) {
        self.pairs.push((key, value));
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Serialize back into a query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    encode_uri_component(key),
                    encode_uri_component(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pairs (repeated keys count separately).
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

// ============================================================================
// Location
// ============================================================================

/// A concrete navigation target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Path without query, e.g. `/users`.
    pub path: String,
    pub query: QueryParams,
}

impl Location {
    /// Split `full_path` into path and query. A `#fragment` is dropped.
    pub fn parse(full_path: &str) -> Self {
        let without_hash = full_path.split('#').next().unwrap_or_default();
        match without_hash.split_once('?') {
            Some((path, query)) => Self {
                path: path.to_string(),
                query: QueryParams::from_query_string(query),
            },
            None => Self {
                path: without_hash.to_string(),
                query: QueryParams::new(),
            },
        }
    }

    /// Path plus serialized query.
    pub fn full_path(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query.to_query_string())
        }
    }
}

/// Percent-encode everything outside the unreserved set, byte-wise over UTF-8.
pub fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(byte));
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Decode `%XX` escapes and `+`. Malformed escapes are kept verbatim.
pub fn decode_uri_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                if let Some(byte) = hex {
                    out.push(byte);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_params_get_as() {
        let mut params = RouteParams::new();
        params.insert("id".to_string(), "123".to_string());

        assert_eq!(params.get("id"), Some(&"123".to_string()));
        assert_eq!(params.get_as::<u32>("id"), Some(123));
        assert_eq!(params.get_as::<u32>("missing"), None);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_query_params_basic() {
        let query = QueryParams::from_query_string("page=1&sort=name&tag=a&tag=b");

        assert_eq!(query.get("page"), Some("1"));
        assert_eq!(query.get_as::<u32>("page"), Some(1));
        assert_eq!(query.get_all("tag"), vec!["a", "b"]);
        assert_eq!(query.get("missing"), None);
        assert!(query.contains("sort"));
    }

    #[test]
    fn test_query_string_keeps_order() {
        let query = QueryParams::from_query_string("b=2&a=1");
        assert_eq!(query.to_query_string(), "b=2&a=1");
    }

    #[test]
    fn test_empty_query_string() {
        assert!(QueryParams::from_query_string("").is_empty());
    }

    #[test]
    fn test_uri_round_trip_non_ascii() {
        let encoded = encode_uri_component("/用户?id=1");
        assert!(encoded.starts_with("%2F"));
        assert_eq!(decode_uri_component(&encoded), "/用户?id=1");
    }

    #[test]
    fn test_malformed_escape_is_kept() {
        assert_eq!(decode_uri_component("100%"), "100%");
        assert_eq!(decode_uri_component("%zz"), "%zz");
        assert_eq!(decode_uri_component("a+b"), "a b");
    }

    #[test]
    fn test_location_parse() {
        let location = Location::parse("/users?page=2#top");
        assert_eq!(location.path, "/users");
        assert_eq!(location.query.get("page"), Some("2"));
        assert_eq!(location.full_path(), "/users?page=2");

        let bare = Location::parse("/home");
        assert_eq!(bare.full_path(), "/home");
    }
}

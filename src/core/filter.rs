//! Filter value encoding
//!
//! View filters travel as `vf_<key>=<value>` query parameters. Two characters
//! are reserved in that syntax: `&` separates parameters and `,` separates the
//! entries of a multi-value filter. Both are escaped in keys and values:
//!
//! | input | encoded |
//! |-------|---------|
//! | `&`   | `%26`   |
//! | `,`   | `\,`    |
//!
//! Known limitations:
//!
//! - a value that is meant to carry several comma-separated list entries
//!   cannot be expressed; every comma is treated as a literal
//! - `=` is not escaped, so a key containing it (`vf_a=b=c`) is ambiguous to
//!   the server

use crate::domain::Filter;

/// A filter whose key and value have been escaped for the render request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFilter {
    pub key: String,
    pub value: String,
}

impl EncodedFilter {
    /// Encodes a declared filter
    pub fn from_filter(filter: &Filter) -> Self {
        let (key, value) = encode(&filter.key, &filter.value);
        Self { key, value }
    }
}

/// Escapes a filter key/value pair
///
/// # Example
///
/// ```
/// use folio::core::filter::encode;
///
/// let (key, value) = encode("Region", "East & West, North");
/// assert_eq!(key, "Region");
/// assert_eq!(value, r"East %26 West\, North");
/// ```
pub fn encode(key: &str, value: &str) -> (String, String) {
    (escape(key), escape(value))
}

/// Encodes every filter of a filter-set, keeping their order
pub fn encode_all(filters: &[Filter]) -> Vec<EncodedFilter> {
    filters.iter().map(EncodedFilter::from_filter).collect()
}

/// Escapes the reserved characters of one component
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("%26"),
            ',' => out.push_str("\\,"),
            other => out.push(other),
        }
    }
    out
}

/// Reverses [`escape`]
///
/// Exact for inputs that did not already contain `%26` or `\,` before escaping.
pub fn unescape(input: &str) -> String {
    input.replace("%26", "&").replace("\\,", ",")
}

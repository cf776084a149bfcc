//! Case-insensitive header mapping used by [`RequestOptions`](crate::types::RequestOptions)
//! and [`Response`](crate::types::Response).
//!
//! HTTP header names are case-insensitive; a header may also legitimately
//! carry more than one value (e.g. repeated `Set-Cookie`). `Headers` keeps
//! the original casing of the first insertion for iteration/display while
//! comparing and looking keys up in lowercase.

use std::collections::HashMap;

/// A header's value: either a single string or an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Single(String),
    Multi(Vec<String>),
}

impl HeaderValue {
    /// The first (or only) value, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            HeaderValue::Single(v) => Some(v.as_str()),
            HeaderValue::Multi(vs) => vs.first().map(|s| s.as_str()),
        }
    }

    /// All values as a slice-like iterator.
    pub fn values(&self) -> Vec<&str> {
        match self {
            HeaderValue::Single(v) => vec![v.as_str()],
            HeaderValue::Multi(vs) => vs.iter().map(|s| s.as_str()).collect(),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        HeaderValue::Single(s.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        HeaderValue::Single(s)
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(v: Vec<String>) -> Self {
        HeaderValue::Multi(v)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    // keyed by lowercase header name; stores the original-case key alongside the value
    entries: HashMap<String, (String, HeaderValue)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.entries.get(&name.to_ascii_lowercase()).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Insert a header, replacing any existing value under the same
    /// case-insensitive name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<HeaderValue>) {
        let name = name.into();
        let key = name.to_ascii_lowercase();
        self.entries.insert(key, (name, value.into()));
    }

    /// Insert a header only if it isn't already present.
    pub fn set_if_absent(&mut self, name: impl Into<String>, value: impl Into<HeaderValue>) {
        let name = name.into();
        let key = name.to_ascii_lowercase();
        self.entries.entry(key).or_insert_with(|| (name, value.into()));
    }

    pub fn remove(&mut self, name: &str) -> Option<HeaderValue> {
        self.entries.remove(&name.to_ascii_lowercase()).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.values().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.set(k, v);
        }
        headers
    }
}

//! Data links.
//!
//! A string value anywhere in resolved data may reference another
//! pattern's rendered page with a `link.<partial>` token. Tokens with a
//! known target are rewritten to that pattern's page path; unknown
//! targets are left exactly as written.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use weft_pattern::DataMap;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"link\.([A-Za-z0-9][A-Za-z0-9_-]*)").expect("link token regex"));

/// Maps partial identifiers to rendered page paths.
#[derive(Debug, Clone, Default)]
pub struct LinkResolver {
    targets: BTreeMap<String, String>,
}

impl LinkResolver {
    pub fn new(targets: BTreeMap<String, String>) -> Self {
        Self { targets }
    }

    /// Rewrite link tokens in every string value of `data`, recursing
    /// through nested objects and arrays. Returns replacements made.
    pub fn resolve_map(&self, data: &mut DataMap) -> usize {
        let mut count = 0;
        for value in data.values_mut() {
            count += self.resolve_value(value);
        }
        count
    }

    pub fn resolve_value(&self, value: &mut Value) -> usize {
        match value {
            Value::String(s) => {
                if !LINK_RE.is_match(s) {
                    return 0;
                }
                let mut count = 0;
                let replaced = LINK_RE
                    .replace_all(s, |caps: &regex::Captures<'_>| {
                        match self.targets.get(&caps[1]) {
                            Some(path) => {
                                count += 1;
                                path.clone()
                            }
                            None => caps[0].to_string(),
                        }
                    })
                    .into_owned();
                *s = replaced;
                count
            }
            Value::Array(items) => items.iter_mut().map(|v| self.resolve_value(v)).sum(),
            Value::Object(map) => {
                let mut count = 0;
                for v in map.values_mut() {
                    count += self.resolve_value(v);
                }
                count
            }
            _ => 0,
        }
    }
}

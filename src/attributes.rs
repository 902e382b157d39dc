//! Host element attributes and the tolerant attribute-value parser.
//!
//! Attributes arrive as strings. Structured values (the `sources` list) are
//! written by content editors by hand, so the parser accepts strict JSON
//! first and falls back to single-quoted JSON before giving up.
//!
//! The CLI reads whole attribute sets from TOML or JSON files. Scalar values
//! are stringified; arrays and tables are re-encoded as JSON, so a `sources`
//! list can be written natively in either format.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttributeError {
    #[error("attribute `{name}` is not valid JSON: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("attribute file {path} is not valid TOML: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("attribute file {path} is not a valid JSON object: {source}")]
    File {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Attribute map of one host element. Ordered so rendering is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value of an attribute, with empty strings treated as absent.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Builder-style setter, mostly for tests and the CLI.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Parse a structured attribute value.
///
/// Strict JSON is tried first. On failure, single quotes are swapped for
/// double quotes and parsing is retried; the error from the strict attempt is
/// the one reported.
pub fn parse_attribute<T: DeserializeOwned>(name: &str, raw: &str) -> Result<T, AttributeError> {
    match serde_json::from_str(raw) {
        Ok(value) => Ok(value),
        Err(strict) => serde_json::from_str(&raw.replace('\'', "\"")).map_err(|_| {
            AttributeError::Json {
                name: name.to_string(),
                source: strict,
            }
        }),
    }
}

// ============================================================================
// Attribute files
// ============================================================================

fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse an attribute table. JSON unless `is_toml`.
pub fn parse_attribute_table(
    text: &str,
    is_toml: bool,
    origin: &str,
) -> Result<Attributes, AttributeError> {
    let table: Map<String, Value> = if is_toml {
        toml::from_str(text).map_err(|source| AttributeError::Toml {
            path: origin.to_string(),
            source,
        })?
    } else {
        serde_json::from_str(text).map_err(|source| AttributeError::File {
            path: origin.to_string(),
            source,
        })?
    };
    Ok(table
        .into_iter()
        .map(|(name, value)| (name, stringify(value)))
        .collect())
}

/// Load attributes from a `.toml` or `.json` file (by extension; anything
/// other than `.toml` is read as JSON).
pub fn load_attributes(path: &Path) -> Result<Attributes, AttributeError> {
    let origin = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| AttributeError::Io {
        path: origin.clone(),
        source,
    })?;
    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    parse_attribute_table(&text, is_toml, &origin)
}

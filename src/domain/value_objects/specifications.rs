//! # Specifications Dictionary
//!
//! Ordered key→value attributes attached to an RFQ.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered dictionary of specification attributes.
///
/// Keys are unique; insertion order is preserved for display but no
/// invariant depends on it. Setting an existing key overwrites its value
/// in place, keeping the original position.
///
/// # Examples
///
/// ```
/// use marketplace_rfq::domain::value_objects::Specifications;
///
/// let mut specs = Specifications::new();
/// specs.set("material", "steel");
/// specs.set("grade", "304");
/// specs.set("material", "stainless steel");
///
/// assert_eq!(specs.get("material"), Some("stainless steel"));
/// assert_eq!(specs.keys().collect::<Vec<_>>(), vec!["material", "grade"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Specifications {
    entries: Vec<(String, String)>,
}

impl Specifications {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dictionary from key/value pairs.
    ///
    /// Later duplicates overwrite earlier entries in place.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut specs = Self::new();
        for (key, value) in pairs {
            specs.set(key, value);
        }
        specs
    }

    /// Sets a specification value, overwriting in place if the key exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Gets a specification value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if no attributes are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Specifications {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration document tree.
//!
//! This module provides `ConfigValue`, the recursive shape of every parsed
//! configuration document, and `ConfigMap`, the insertion-ordered mapping used
//! for its mapping nodes.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// A node of a parsed configuration document.
///
/// A document is a tree of mappings, sequences and scalars. Parsers produce it,
/// the expander rewrites it, and manifest sections are read from it.
///
/// # Examples
///
/// ```
/// use fnmanifest::domain::config_value::ConfigValue;
///
/// let value = ConfigValue::mapping([("Timeout", ConfigValue::from(30))]);
/// let map = value.as_mapping().unwrap();
/// assert_eq!(map.get("Timeout").and_then(ConfigValue::as_i64), Some(30));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ConfigValue {
    /// An explicit null, or an empty document.
    #[default]
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar.
    Integer(i64),
    /// A floating point scalar.
    Float(f64),
    /// A string scalar.
    String(String),
    /// An ordered list of values.
    Sequence(Vec<ConfigValue>),
    /// A string-keyed mapping.
    Mapping(ConfigMap),
}

impl ConfigValue {
    /// Builds a mapping value from key/value pairs, keeping their order.
    ///
    /// Later pairs replace earlier pairs with the same key.
    pub fn mapping<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ConfigValue>,
    {
        ConfigValue::Mapping(entries.into_iter().collect())
    }

    /// Builds a sequence value.
    pub fn sequence<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ConfigValue>,
    {
        ConfigValue::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Returns the mapping if this value is one.
    pub fn as_mapping(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the mapping mutably if this value is one.
    pub fn as_mapping_mut(&mut self) -> Option<&mut ConfigMap> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the sequence if this value is one.
    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the sequence mutably if this value is one.
    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<ConfigValue>> {
        match self {
            ConfigValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the string if this value is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this value is an integer scalar.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number as `f64` if this value is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Integer(n) => Some(*n as f64),
            ConfigValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean if this value is a boolean scalar.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns `true` if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns `true` if this value is a mapping.
    pub fn is_mapping(&self) -> bool {
        matches!(self, ConfigValue::Mapping(_))
    }

    /// Returns `true` if this value is a scalar (neither mapping nor sequence).
    pub fn is_scalar(&self) -> bool {
        !matches!(self, ConfigValue::Mapping(_) | ConfigValue::Sequence(_))
    }

    /// A short name of this value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
            ConfigValue::Sequence(_) => "sequence",
            ConfigValue::Mapping(_) => "mapping",
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        ConfigValue::Integer(i64::from(n))
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Integer(n)
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Float(n)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Mapping(map)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        ConfigValue::Sequence(items)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, Into::into)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => write!(f, "null"),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Integer(n) => write!(f, "{}", n),
            ConfigValue::Float(n) => write!(f, "{}", n),
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::Sequence(items) => write!(f, "<sequence of {}>", items.len()),
            ConfigValue::Mapping(map) => write!(f, "<mapping of {}>", map.len()),
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Integer(n) => serializer.serialize_i64(*n),
            ConfigValue::Float(n) => serializer.serialize_f64(*n),
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ConfigValue::Mapping(map) => map.serialize(serializer),
        }
    }
}

/// An insertion-ordered, string-keyed mapping.
///
/// Iteration follows insertion order, and replacing the value of an existing key
/// keeps the key's original position. Lookups are hashed.
///
/// Equality ignores order: two maps are equal when they hold the same keys with
/// equal values.
///
/// # Examples
///
/// ```
/// use fnmanifest::domain::config_value::{ConfigMap, ConfigValue};
///
/// let mut map = ConfigMap::new();
/// map.insert("b", ConfigValue::from(1));
/// map.insert("a", ConfigValue::from(2));
/// assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigMap {
    entries: IndexMap<String, ConfigValue>,
}

impl ConfigMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Returns the value stored under `key` mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.entries.get_mut(key)
    }

    /// Returns `true` if the map holds `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a value, returning the value it replaced.
    ///
    /// A replaced key keeps its position; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) -> Option<ConfigValue> {
        self.entries.insert(key.into(), value)
    }

    /// Removes `key`, returning its value. The remaining entries keep their order.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.entries.shift_remove(key)
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the entries mutably in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut ConfigValue)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over the values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &ConfigValue> {
        self.entries.values()
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigMap
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = ConfigMap {
            entries: IndexMap::with_capacity(iter.size_hint().0),
        };
        for (key, value) in iter {
            map.insert(key, value.into());
        }
        map
    }
}

impl IntoIterator for ConfigMap {
    type Item = (String, ConfigValue);
    type IntoIter = indexmap::map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ConfigMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

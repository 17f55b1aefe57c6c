// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dotted-key expansion.
//!
//! Manifests are often authored with flat, dot-delimited keys:
//!
//! ```yaml
//! FunctionConfiguration:
//!   Environment.Variables.STAGE: prod
//!   Environment.Variables.REGION: eu-west-1
//! ```
//!
//! Provider calls need the nested form instead:
//!
//! ```yaml
//! FunctionConfiguration:
//!   Environment:
//!     Variables:
//!       STAGE: prod
//!       REGION: eu-west-1
//! ```
//!
//! The [`Expander`] performs that rewrite over a whole [`ConfigValue`] tree.
//! Mapping values and sequence elements are expanded recursively; scalars are
//! returned unchanged.
//!
//! # Collision rules
//!
//! Keys are processed in mapping order. When a key's path reaches a position
//! that is already occupied:
//!
//! - an intermediate segment must hold a mapping, otherwise the key is a
//!   [`ManifestError::StructuralConflict`];
//! - at the final segment a mapping merges into an existing mapping key by key,
//!   any value replaces an existing non-mapping (last key wins), and a
//!   non-mapping replacing an existing mapping is a
//!   [`ManifestError::StructuralConflict`].

use crate::domain::config_value::{ConfigMap, ConfigValue};
use crate::domain::errors::{ConflictReason, ManifestError, Result};
use crate::domain::key_path::{DocumentPath, DottedKey};

/// Default nesting limit, matching the recursion limit of the YAML parser.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Expands dot-delimited mapping keys into nested mappings.
///
/// The expander is stateless apart from its depth limit and never mutates its
/// input: it takes ownership of the document and builds a new one.
///
/// # Examples
///
/// ```
/// use fnmanifest::domain::config_value::ConfigValue;
/// use fnmanifest::domain::expander::Expander;
///
/// let raw = ConfigValue::mapping([("a.b.c", 1)]);
/// let expanded = Expander::new().expand(raw).unwrap();
///
/// let nested = ConfigValue::mapping([(
///     "a",
///     ConfigValue::mapping([("b", ConfigValue::mapping([("c", 1)]))]),
/// )]);
/// assert_eq!(expanded, nested);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expander {
    max_depth: usize,
}

impl Expander {
    /// Creates an expander with the default nesting limit.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the nesting limit.
    ///
    /// A value that would land more than `max_depth` steps below the root of
    /// the expanded document makes expansion fail with
    /// [`ManifestError::NestingTooDeep`]. Every segment of a dotted key counts
    /// as one step.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the nesting limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Expands every dotted key in `value`.
    ///
    /// # Errors
    ///
    /// * [`ManifestError::MalformedKey`] - a key is empty or has an empty segment
    /// * [`ManifestError::StructuralConflict`] - a key collides with an existing value
    /// * [`ManifestError::NestingTooDeep`] - the document exceeds the nesting limit
    pub fn expand(&self, value: ConfigValue) -> Result<ConfigValue> {
        tracing::trace!(max_depth = self.max_depth, "expanding configuration document");
        let mut path = DocumentPath::root();
        self.expand_at(value, 0, &mut path)
    }

    // `depth` is the position of `value` in the expanded output, not in the input
    fn expand_at(
        &self,
        value: ConfigValue,
        depth: usize,
        path: &mut DocumentPath,
    ) -> Result<ConfigValue> {
        if depth > self.max_depth {
            return Err(ManifestError::NestingTooDeep {
                path: path.to_string(),
                limit: self.max_depth,
            });
        }

        match value {
            ConfigValue::Mapping(map) => self
                .expand_mapping(map, depth, path)
                .map(ConfigValue::Mapping),
            ConfigValue::Sequence(items) => {
                let mut expanded = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    path.push_index(index);
                    let item = self.expand_at(item, depth + 1, path);
                    path.pop();
                    expanded.push(item?);
                }
                Ok(ConfigValue::Sequence(expanded))
            }
            scalar => Ok(scalar),
        }
    }

    fn expand_mapping(
        &self,
        map: ConfigMap,
        depth: usize,
        path: &mut DocumentPath,
    ) -> Result<ConfigMap> {
        let mut result = ConfigMap::new();

        for (key, value) in map {
            let key = DottedKey::from(key);
            let segments = key.segments().ok_or_else(|| ManifestError::MalformedKey {
                key: key.to_string(),
                path: path.to_string(),
            })?;

            // checked before any nested mapping is built for the key
            path.push_key(key.as_str());
            let value = self.expand_at(value, depth + segments.len(), path);
            path.pop();

            insert_at_path(&mut result, &segments, value?, key.as_str(), path)?;
        }

        Ok(result)
    }
}

impl Default for Expander {
    fn default() -> Self {
        Self::new()
    }
}

/// Expands `value` with the default nesting limit.
///
/// # Examples
///
/// ```
/// use fnmanifest::domain::config_value::ConfigValue;
/// use fnmanifest::domain::expander::expand;
///
/// let expanded = expand(ConfigValue::mapping([("a.b", 1), ("a.c", 2)])).unwrap();
/// let a = expanded.as_mapping().unwrap().get("a").unwrap();
/// assert_eq!(a, &ConfigValue::mapping([("b", 1), ("c", 2)]));
/// ```
pub fn expand(value: ConfigValue) -> Result<ConfigValue> {
    Expander::new().expand(value)
}

fn insert_at_path(
    target: &mut ConfigMap,
    segments: &[&str],
    value: ConfigValue,
    key: &str,
    path: &DocumentPath,
) -> Result<()> {
    let Some((last, parents)) = segments.split_last() else {
        return Err(ManifestError::MalformedKey {
            key: key.to_string(),
            path: path.to_string(),
        });
    };

    let mut current = target;
    for segment in parents {
        current = descend(current, segment, key, path)?;
    }
    assign(current, last, value, key, path)
}

fn descend<'m>(
    map: &'m mut ConfigMap,
    segment: &str,
    key: &str,
    path: &DocumentPath,
) -> Result<&'m mut ConfigMap> {
    if !map.contains_key(segment) {
        map.insert(segment, ConfigValue::Mapping(ConfigMap::new()));
    }

    match map.get_mut(segment) {
        Some(ConfigValue::Mapping(child)) => Ok(child),
        _ => Err(conflict(key, segment, path, ConflictReason::NotAMapping)),
    }
}

fn assign(
    map: &mut ConfigMap,
    segment: &str,
    value: ConfigValue,
    key: &str,
    path: &DocumentPath,
) -> Result<()> {
    match map.get_mut(segment) {
        Some(ConfigValue::Mapping(existing)) => match value {
            ConfigValue::Mapping(incoming) => {
                // incoming is already expanded, so its keys are plain segments
                for (child_key, child_value) in incoming {
                    assign(existing, &child_key, child_value, key, path)?;
                }
                Ok(())
            }
            _ => Err(conflict(key, segment, path, ConflictReason::ReplacesMapping)),
        },
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => {
            map.insert(segment, value);
            Ok(())
        }
    }
}

fn conflict(
    key: &str,
    segment: &str,
    path: &DocumentPath,
    reason: ConflictReason,
) -> ManifestError {
    ManifestError::StructuralConflict {
        key: key.to_string(),
        segment: segment.to_string(),
        path: path.to_string(),
        reason,
    }
}

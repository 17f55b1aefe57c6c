// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dotted keys and document paths.
//!
//! This module provides `DottedKey`, a newtype for mapping keys that may encode a
//! nested path with `.` separators, and `DocumentPath`, which records where in a
//! document a node lives so errors can point at it.

use std::fmt;

/// Separator between the segments of a dotted key.
pub const SEGMENT_SEPARATOR: char = '.';

/// A mapping key that may contain `.`-separated path segments.
///
/// # Examples
///
/// ```
/// use fnmanifest::domain::key_path::DottedKey;
///
/// let key = DottedKey::from("Environment.Variables.STAGE");
/// assert!(key.is_dotted());
/// assert_eq!(key.segments(), Some(vec!["Environment", "Variables", "STAGE"]));
///
/// assert_eq!(DottedKey::from("a..b").segments(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DottedKey(String);

impl DottedKey {
    /// Creates a new `DottedKey` from a `String`.
    pub fn new(key: String) -> Self {
        DottedKey(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the key into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns `true` if the key contains at least one separator.
    pub fn is_dotted(&self) -> bool {
        self.0.contains(SEGMENT_SEPARATOR)
    }

    /// Splits the key into its path segments.
    ///
    /// Returns `None` when the key is malformed: empty, or holding an empty
    /// segment (a leading or trailing separator, or two separators in a row).
    pub fn segments(&self) -> Option<Vec<&str>> {
        let segments: Vec<&str> = self.0.split(SEGMENT_SEPARATOR).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return None;
        }
        Some(segments)
    }
}

impl From<String> for DottedKey {
    fn from(s: String) -> Self {
        DottedKey(s)
    }
}

impl From<&str> for DottedKey {
    fn from(s: &str) -> Self {
        DottedKey(s.to_string())
    }
}

impl AsRef<str> for DottedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DottedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One step of a [`DocumentPath`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A mapping key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

/// The location of a node inside a configuration document.
///
/// Rendered as `$` for the root, with `.key` for mapping steps and `[i]` for
/// sequence steps, e.g. `$.Environments[0].Triggers`.
///
/// # Examples
///
/// ```
/// use fnmanifest::domain::key_path::DocumentPath;
///
/// let mut path = DocumentPath::root();
/// path.push_key("Environments");
/// path.push_index(0);
/// assert_eq!(path.to_string(), "$.Environments[0]");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentPath {
    segments: Vec<PathSegment>,
}

impl DocumentPath {
    /// The path of the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Number of steps below the root.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Descends into a mapping key.
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Descends into a sequence element.
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Returns to the parent node.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// The steps of this path, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

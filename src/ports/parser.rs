// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest parser trait definition.
//!
//! This module defines the `ManifestParser` trait, which provides an interface for
//! parsing manifest documents in different text formats into a `ConfigValue` tree.

use crate::domain::{ConfigValue, Result};

/// A trait for parsing manifest documents.
///
/// Parsers produce the raw document tree exactly as authored: dotted keys are
/// left alone, since expanding them is the expander's job.
///
/// # Examples
///
/// ```rust
/// use fnmanifest::ports::ManifestParser;
/// use fnmanifest::domain::{ConfigValue, Result};
///
/// struct LineParser;
///
/// impl ManifestParser for LineParser {
///     fn parse(&self, content: &str) -> Result<ConfigValue> {
///         Ok(ConfigValue::sequence(content.lines()))
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["lines"]
///     }
/// }
///
/// let parsed = LineParser.parse("a\nb").unwrap();
/// assert_eq!(parsed, ConfigValue::sequence(["a", "b"]));
/// ```
pub trait ManifestParser: Send + Sync {
    /// Parses document content into a raw `ConfigValue` tree.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw content of the manifest
    ///
    /// # Returns
    ///
    /// * `Ok(ConfigValue)` - The parsed, unexpanded document
    /// * `Err(ManifestError)` - An error occurred during parsing
    fn parse(&self, content: &str) -> Result<ConfigValue>;

    /// Returns the file extensions supported by this parser.
    ///
    /// Extensions are given without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Returns `true` if this parser handles files with the given extension.
    fn supports_extension(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(extension))
    }
}

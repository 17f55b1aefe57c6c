// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the manifest crate.
//!
//! This module defines the errors that can occur while expanding a configuration
//! document, reading manifest sections, or talking to a function provider.
//! All errors use `thiserror` for proper error handling and conversion.

use thiserror::Error;

/// The main error type for manifest operations.
///
/// Expansion errors (`MalformedKey`, `StructuralConflict`, `NestingTooDeep`) are
/// raised at the point of detection and are never recovered from inside the crate.
/// The enum is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use fnmanifest::domain::errors::ManifestError;
///
/// fn lookup() -> Result<(), ManifestError> {
///     Err(ManifestError::SectionNotFound {
///         section: "FunctionConfiguration".to_string(),
///     })
/// }
///
/// assert!(lookup().is_err());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ManifestError {
    /// A key is empty or contains an empty dotted segment.
    #[error("Malformed key '{key}' at {path}: keys and their dotted segments must be non-empty")]
    MalformedKey {
        /// The offending key
        key: String,
        /// Document path of the mapping holding the key
        path: String,
    },

    /// Expanding a dotted key would treat a non-mapping value as a mapping,
    /// or would replace a mapping with a non-mapping value.
    #[error("Structural conflict for key '{key}' at {path}: segment '{segment}' {reason}")]
    StructuralConflict {
        /// The offending key
        key: String,
        /// The segment at which the collision happened
        segment: String,
        /// Document path of the mapping holding the key
        path: String,
        /// Which collision rule was violated
        reason: ConflictReason,
    },

    /// The document nests deeper than the expander allows.
    #[error("Document nesting exceeds the limit of {limit} levels at {path}")]
    NestingTooDeep {
        /// Document path where the limit was hit
        path: String,
        /// The configured limit
        limit: usize,
    },

    /// A required manifest section is missing.
    #[error("Manifest section not found: {section}")]
    SectionNotFound {
        /// The section that was not found
        section: String,
    },

    /// A manifest section exists but has the wrong shape.
    #[error("Manifest section '{section}' is invalid: expected {expected}")]
    InvalidSection {
        /// The section with the wrong shape
        section: String,
        /// Description of the expected shape
        expected: String,
    },

    /// Failed to parse a manifest document.
    #[error("Failed to parse manifest: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error occurred while reading a manifest or artifact source.
    #[error("Source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider has no function with the given name.
    #[error("Function not found: {function_name}")]
    FunctionNotFound {
        /// The function that was not found
        function_name: String,
    },

    /// A provider call failed.
    #[error("Provider operation '{operation}' failed: {message}")]
    ProviderError {
        /// The provider operation that failed
        operation: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The rule violated by a [`ManifestError::StructuralConflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// An intermediate segment already holds a non-mapping value.
    NotAMapping,
    /// A non-mapping value would replace an existing mapping.
    ReplacesMapping,
}

impl std::fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictReason::NotAMapping => write!(f, "already holds a non-mapping value"),
            ConflictReason::ReplacesMapping => {
                write!(f, "already holds a mapping that a non-mapping value would replace")
            }
        }
    }
}

impl ManifestError {
    /// Creates a `ProviderError` from any error returned by a provider client.
    pub fn provider<E>(operation: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ManifestError::ProviderError {
            operation: operation.into(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Returns `true` for errors raised by dotted-key expansion.
    pub fn is_expansion_error(&self) -> bool {
        matches!(
            self,
            ManifestError::MalformedKey { .. }
                | ManifestError::StructuralConflict { .. }
                | ManifestError::NestingTooDeep { .. }
        )
    }
}

/// A specialized Result type for manifest operations.
pub type Result<T> = std::result::Result<T, ManifestError>;

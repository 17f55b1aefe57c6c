// SPDX-License-Identifier: MIT OR Apache-2.0

//! Packaged function artifact.
//!
//! Reads the bytes of an already packaged function archive. Packaging itself is
//! left to external tooling.

use crate::adapters::display_name;
use crate::domain::{ManifestError, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed artifact size (250MB)
pub const MAX_ARTIFACT_SIZE: u64 = 250 * 1024 * 1024;

const SOURCE_NAME: &str = "artifact";

/// The code bytes uploaded when creating or updating a function.
///
/// # Examples
///
/// ```rust
/// use fnmanifest::adapters::Artifact;
///
/// let artifact = Artifact::from_bytes(b"PK\x03\x04".to_vec()).unwrap();
/// assert_eq!(artifact.len(), 4);
/// assert!(Artifact::from_bytes(Vec::new()).is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    path: Option<PathBuf>,
    bytes: Vec<u8>,
}

impl Artifact {
    /// Reads an artifact from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let metadata = fs::metadata(path).map_err(|e| ManifestError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!("Failed to read artifact metadata: {}", display_name(path)),
            source: Some(Box::new(e)),
        })?;

        if metadata.len() > MAX_ARTIFACT_SIZE {
            return Err(ManifestError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: format!(
                    "Artifact too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_ARTIFACT_SIZE
                ),
                source: None,
            });
        }

        let bytes = fs::read(path).map_err(|e| ManifestError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!("Failed to read artifact: {}", display_name(path)),
            source: Some(Box::new(e)),
        })?;

        let mut artifact = Self::from_bytes(bytes)?;
        artifact.path = Some(path.to_path_buf());
        tracing::debug!(
            "Read artifact '{}' ({} bytes)",
            display_name(path),
            artifact.len()
        );
        Ok(artifact)
    }

    /// Wraps in-memory artifact bytes, which must not be empty.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(ManifestError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Artifact is empty".to_string(),
                source: None,
            });
        }
        Ok(Self { path: None, bytes })
    }

    /// The file the artifact was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The artifact bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the artifact in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; empty artifacts are rejected on construction.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("path", &self.path)
            .field("len", &self.bytes.len())
            .finish()
    }
}

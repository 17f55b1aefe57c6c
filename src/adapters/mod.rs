// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing parser and file implementations.
//!
//! This module contains concrete implementations of the ports defined in the
//! ports layer, plus the file readers used to load manifests and artifacts.

pub mod artifact;
#[cfg(feature = "yaml")]
pub mod yaml_file;

// Re-export adapters based on feature flags
pub use artifact::Artifact;
#[cfg(feature = "yaml")]
pub use yaml_file::{ManifestFile, YamlParser};

use std::path::Path;

/// File name used in error messages, so full paths are not leaked.
pub(crate) fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the configuration document model, dotted-key expansion,
//! and typed manifest sections. It performs no I/O and knows nothing about
//! file formats or providers.

pub mod config_value;
pub mod errors;
pub mod expander;
pub mod key_path;
pub mod manifest;

// Re-export commonly used types
pub use config_value::{ConfigMap, ConfigValue};
pub use errors::{ConflictReason, ManifestError, Result};
pub use expander::{expand, Expander};
pub use key_path::{DocumentPath, DottedKey};
pub use manifest::{Environment, FunctionConfiguration, Manifest, StorageTrigger};

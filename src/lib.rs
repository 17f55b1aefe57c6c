// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest expansion and deployment orchestration for serverless functions.
//!
//! Deployment manifests are often written with flat, dot-delimited keys such as
//! `Environment.Variables.STAGE`, while provider calls expect nested mappings.
//! This crate expands such manifests, reads their function and trigger sections,
//! and drives a function provider through deployment.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: The document model (`ConfigValue`), dotted-key expansion
//!   (`Expander`), manifest sections and errors
//! - **Ports**: Trait definitions for external collaborators (`ManifestParser`,
//!   `FunctionProvider`, `NotificationRegistrar`)
//! - **Adapters**: The YAML parser and the manifest and artifact file readers
//! - **Service**: `DeploymentService`, which orchestrates a deployment
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML manifest support (default)
//! - `cli`: Build the `fnmanifest` command-line tool (default)
//!
//! # Quick Start
//!
//! ```rust
//! use fnmanifest::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let raw = YamlParser::new().parse(
//!     "FunctionConfiguration.FunctionName: thumbnailer\n\
//!      FunctionConfiguration.Environment.Variables.STAGE: prod\n",
//! )?;
//! let manifest = Manifest::from_raw(raw)?;
//!
//! let function = manifest.function_configuration()?;
//! assert_eq!(function.function_name(), "thumbnailer");
//! assert!(function.parameters().get("Environment").is_some());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        expand, ConfigMap, ConfigValue, Expander, Manifest, ManifestError, Result,
    };
    pub use crate::ports::{FunctionProvider, Invocation, ManifestParser, NotificationRegistrar};
    pub use crate::service::{DeploymentPlan, DeploymentService};

    pub use crate::adapters::Artifact;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::{ManifestFile, YamlParser};
}

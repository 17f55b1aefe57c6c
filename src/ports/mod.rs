// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) for the crate's external
//! collaborators: document parsers and the function provider. They are
//! implemented by adapters, or by users for a concrete cloud SDK.

pub mod parser;
pub mod provider;

// Re-export commonly used types
pub use parser::ManifestParser;
pub use provider::{FunctionProvider, Invocation, NotificationRegistrar};

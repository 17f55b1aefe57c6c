// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing deployment orchestration.
//!
//! This module drives the provider ports with the sections of an expanded
//! manifest.

pub mod deployment_service;

// Re-export commonly used types
pub use deployment_service::{
    DeployOutcome, DeploymentPlan, DeploymentReport, DeploymentService, DeploymentServiceBuilder,
};

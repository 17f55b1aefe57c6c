// SPDX-License-Identifier: MIT OR Apache-2.0

//! Function provider trait definitions.
//!
//! These ports describe the few provider calls deployment needs. Implementations
//! wrap a concrete cloud SDK client; the crate itself ships none.

use crate::domain::{ConfigMap, Result};

/// The response of a function invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    /// The status code reported by the provider.
    pub status_code: i32,
    /// The raw payload returned by the function.
    pub payload: Vec<u8>,
}

impl Invocation {
    /// Returns the payload as UTF-8 text, replacing invalid sequences.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Compute side of a function provider.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a deployment service can be shared
/// between threads.
pub trait FunctionProvider: Send + Sync {
    /// Replaces the code of an existing function.
    ///
    /// Must return [`crate::domain::ManifestError::FunctionNotFound`] when no
    /// function with that name exists, so callers can fall back to creating it.
    fn update_function_code(&self, function_name: &str, code: &[u8]) -> Result<()>;

    /// Creates a function from its configuration mapping and code.
    fn create_function(&self, configuration: &ConfigMap, code: &[u8]) -> Result<()>;

    /// Blocks until the provider reports the function as updated.
    fn wait_until_updated(&self, function_name: &str) -> Result<()>;

    /// Returns the function's ARN.
    fn function_arn(&self, function_name: &str) -> Result<String>;

    /// Invokes the function with an empty payload.
    fn invoke(&self, function_name: &str) -> Result<Invocation>;
}

/// Storage side of a provider: registers event notifications on a bucket.
pub trait NotificationRegistrar: Send + Sync {
    /// Replaces the notification configuration of `bucket`.
    fn put_notification_configuration(&self, bucket: &str, configuration: &ConfigMap) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_text() {
        let invocation = Invocation {
            status_code: 200,
            payload: b"{\"ok\":true}".to_vec(),
        };
        assert_eq!(invocation.payload_text(), "{\"ok\":true}");
    }

    #[test]
    fn test_payload_text_lossy() {
        let invocation = Invocation {
            status_code: 200,
            payload: vec![0x66, 0xff, 0x6f],
        };
        assert_eq!(invocation.payload_text(), "f\u{fffd}o");
    }
}

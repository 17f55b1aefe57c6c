// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for integration tests.

#![allow(dead_code)]

use fnmanifest::domain::{ConfigMap, ManifestError, Result};
use fnmanifest::ports::{FunctionProvider, Invocation, NotificationRegistrar};
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// A provider call observed by [`RecordingProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Update(String),
    Create(String),
    Wait(String),
    Arn(String),
    Invoke(String),
    PutNotification(String),
}

#[derive(Debug, Default)]
struct State {
    functions: HashMap<String, (ConfigMap, Vec<u8>)>,
    notifications: HashMap<String, ConfigMap>,
    calls: Vec<Call>,
    failing_operation: Option<String>,
}

/// An in-memory provider that records every call.
///
/// Clones share state, so one handle can be boxed into a service while another
/// is kept for assertions.
#[derive(Clone, Debug, Default)]
pub struct RecordingProvider {
    state: Arc<Mutex<State>>,
}

impl RecordingProvider {
    /// Creates a provider with no functions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-registers an existing function.
    pub fn with_function(self, function_name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .functions
            .insert(function_name.to_string(), (ConfigMap::new(), Vec::new()));
        self
    }

    /// Makes the named operation fail with a provider error.
    pub fn failing(self, operation: &str) -> Self {
        self.state.lock().unwrap().failing_operation = Some(operation.to_string());
        self
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// The configuration a function was created with.
    pub fn created_configuration(&self, function_name: &str) -> Option<ConfigMap> {
        self.state
            .lock()
            .unwrap()
            .functions
            .get(function_name)
            .map(|(configuration, _)| configuration.clone())
    }

    /// The code currently stored for a function.
    pub fn code(&self, function_name: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .functions
            .get(function_name)
            .map(|(_, code)| code.clone())
    }

    /// The notification configuration last put on a bucket.
    pub fn notification(&self, bucket: &str) -> Option<ConfigMap> {
        self.state.lock().unwrap().notifications.get(bucket).cloned()
    }

    fn record(&self, operation: &str, call: Call) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing_operation.as_deref() == Some(operation) {
            return Err(ManifestError::ProviderError {
                operation: operation.to_string(),
                message: "injected failure".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}

impl FunctionProvider for RecordingProvider {
    fn update_function_code(&self, function_name: &str, code: &[u8]) -> Result<()> {
        self.record("update", Call::Update(function_name.to_string()))?;
        let mut state = self.state.lock().unwrap();
        match state.functions.get_mut(function_name) {
            Some((_, stored)) => {
                *stored = code.to_vec();
                Ok(())
            }
            None => Err(ManifestError::FunctionNotFound {
                function_name: function_name.to_string(),
            }),
        }
    }

    fn create_function(&self, configuration: &ConfigMap, code: &[u8]) -> Result<()> {
        let name = configuration
            .get("FunctionName")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        self.record("create", Call::Create(name.clone()))?;
        self.state
            .lock()
            .unwrap()
            .functions
            .insert(name, (configuration.clone(), code.to_vec()));
        Ok(())
    }

    fn wait_until_updated(&self, function_name: &str) -> Result<()> {
        self.record("wait", Call::Wait(function_name.to_string()))
    }

    fn function_arn(&self, function_name: &str) -> Result<String> {
        self.record("arn", Call::Arn(function_name.to_string()))?;
        Ok(format!("arn:test:function:{}", function_name))
    }

    fn invoke(&self, function_name: &str) -> Result<Invocation> {
        self.record("invoke", Call::Invoke(function_name.to_string()))?;
        Ok(Invocation {
            status_code: 200,
            payload: format!("{{\"function\":\"{}\"}}", function_name).into_bytes(),
        })
    }
}

impl NotificationRegistrar for RecordingProvider {
    fn put_notification_configuration(
        &self,
        bucket: &str,
        configuration: &ConfigMap,
    ) -> Result<()> {
        self.record("notify", Call::PutNotification(bucket.to_string()))?;
        self.state
            .lock()
            .unwrap()
            .notifications
            .insert(bucket.to_string(), configuration.clone());
        Ok(())
    }
}

/// Creates a temporary YAML manifest with the given content.
///
/// Returns a NamedTempFile that will be automatically deleted when dropped.
pub fn create_temp_manifest(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

/// A manifest in the flat, dotted style the expander exists for.
pub const SAMPLE_MANIFEST: &str = r#"
FunctionConfiguration:
  FunctionName: thumbnailer
  Runtime: python3.12
  Handler: app.handler
  Role: arn:test:role/thumbnailer
  MemorySize: 256
  Environment.Variables.STAGE: prod
  Environment.Variables.MAX_WIDTH: "1024"
  Tags.team: media
Environments:
  - Name: prod
    Triggers:
      - Bucket: uploads
        NotificationConfiguration.LambdaFunctionConfigurations:
          - Events: ["s3:ObjectCreated:*"]
            Filter.Key.FilterRules:
              - Name: suffix
                Value: .jpg
      - Bucket: archive
        NotificationConfiguration.LambdaFunctionConfigurations:
          - Events: ["s3:ObjectRemoved:*"]
"#;

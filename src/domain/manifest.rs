// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed access to the sections of an expanded deployment manifest.
//!
//! A manifest has two top-level sections:
//!
//! ```yaml
//! FunctionConfiguration:
//!   FunctionName: thumbnailer
//!   Runtime: python3.12
//! Environments:
//!   - Triggers:
//!       - Bucket: uploads
//!         NotificationConfiguration:
//!           LambdaFunctionConfigurations:
//!             - Events: ["s3:ObjectCreated:*"]
//! ```
//!
//! Section contents are forwarded to provider calls unmodified; this module only
//! checks the few keys orchestration needs to read.

use crate::domain::config_value::{ConfigMap, ConfigValue};
use crate::domain::errors::{ManifestError, Result};
use crate::domain::expander::Expander;

/// Top-level section holding the function creation parameters.
pub const FUNCTION_CONFIGURATION: &str = "FunctionConfiguration";
/// Top-level section holding the list of environments.
pub const ENVIRONMENTS: &str = "Environments";
/// Key of the function name inside the function configuration.
pub const FUNCTION_NAME: &str = "FunctionName";
/// Key of the trigger list inside an environment.
pub const TRIGGERS: &str = "Triggers";
/// Key of the bucket name inside a trigger.
pub const BUCKET: &str = "Bucket";
/// Key of the notification configuration inside a trigger.
pub const NOTIFICATION_CONFIGURATION: &str = "NotificationConfiguration";
/// Key of the function notification list inside a notification configuration.
pub const FUNCTION_CONFIGURATIONS: &str = "LambdaFunctionConfigurations";
/// Key receiving the deployed function's ARN in each function notification.
pub const FUNCTION_ARN: &str = "LambdaFunctionArn";

/// An expanded deployment manifest.
///
/// # Examples
///
/// ```
/// use fnmanifest::domain::config_value::ConfigValue;
/// use fnmanifest::domain::manifest::Manifest;
///
/// let raw = ConfigValue::mapping([
///     ("FunctionConfiguration.FunctionName", "thumbnailer"),
///     ("FunctionConfiguration.Timeout", "30"),
/// ]);
/// let manifest = Manifest::from_raw(raw).unwrap();
/// let function = manifest.function_configuration().unwrap();
/// assert_eq!(function.function_name(), "thumbnailer");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Manifest {
    root: ConfigMap,
}

impl Manifest {
    /// Expands a raw document with the default expander and wraps it.
    pub fn from_raw(raw: ConfigValue) -> Result<Self> {
        Self::from_raw_with(raw, &Expander::new())
    }

    /// Expands a raw document with the given expander and wraps it.
    pub fn from_raw_with(raw: ConfigValue, expander: &Expander) -> Result<Self> {
        Self::from_expanded(expander.expand(raw)?)
    }

    /// Wraps an already expanded document.
    ///
    /// The document root must be a mapping.
    pub fn from_expanded(document: ConfigValue) -> Result<Self> {
        match document {
            ConfigValue::Mapping(root) => Ok(Self { root }),
            other => Err(ManifestError::InvalidSection {
                section: "$".to_string(),
                expected: format!("a mapping at the document root, found {}", other.kind()),
            }),
        }
    }

    /// The whole expanded document.
    pub fn root(&self) -> &ConfigMap {
        &self.root
    }

    /// Returns a top-level section by name.
    pub fn section(&self, name: &str) -> Result<&ConfigValue> {
        self.root
            .get(name)
            .ok_or_else(|| ManifestError::SectionNotFound {
                section: name.to_string(),
            })
    }

    /// Reads the `FunctionConfiguration` section.
    pub fn function_configuration(&self) -> Result<FunctionConfiguration> {
        let section = expect_mapping(
            self.section(FUNCTION_CONFIGURATION)?,
            FUNCTION_CONFIGURATION,
        )?;
        FunctionConfiguration::new(section.clone())
    }

    /// Reads the `Environments` section.
    pub fn environments(&self) -> Result<&[ConfigValue]> {
        expect_sequence(self.section(ENVIRONMENTS)?, ENVIRONMENTS)
    }

    /// Reads one entry of the `Environments` section.
    pub fn environment(&self, index: usize) -> Result<Environment> {
        let name = format!("{}[{}]", ENVIRONMENTS, index);
        let entry = self
            .environments()?
            .get(index)
            .ok_or_else(|| ManifestError::SectionNotFound {
                section: name.clone(),
            })?;
        Ok(Environment {
            name: name.clone(),
            values: expect_mapping(entry, &name)?.clone(),
        })
    }
}

/// The function creation parameters of a manifest.
///
/// The mapping is kept whole so it can be passed to the provider as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionConfiguration {
    function_name: String,
    parameters: ConfigMap,
}

impl FunctionConfiguration {
    /// Wraps a function configuration mapping, which must name the function.
    pub fn new(parameters: ConfigMap) -> Result<Self> {
        let function_name = parameters
            .get(FUNCTION_NAME)
            .and_then(ConfigValue::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ManifestError::InvalidSection {
                section: FUNCTION_CONFIGURATION.to_string(),
                expected: format!("a non-empty string '{}'", FUNCTION_NAME),
            })?
            .to_string();
        Ok(Self {
            function_name,
            parameters,
        })
    }

    /// The function name.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// All function creation parameters, including the name.
    pub fn parameters(&self) -> &ConfigMap {
        &self.parameters
    }
}

/// One entry of the `Environments` section.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    name: String,
    values: ConfigMap,
}

impl Environment {
    /// The environment's location in the manifest, e.g. `Environments[0]`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The environment mapping.
    pub fn values(&self) -> &ConfigMap {
        &self.values
    }

    /// Reads every trigger of this environment.
    ///
    /// An environment without a `Triggers` key has no triggers.
    pub fn triggers(&self) -> Result<Vec<StorageTrigger>> {
        let Some(triggers) = self.values.get(TRIGGERS) else {
            return Ok(Vec::new());
        };
        let section = format!("{}.{}", self.name, TRIGGERS);
        expect_sequence(triggers, &section)?
            .iter()
            .enumerate()
            .map(|(index, trigger)| {
                let name = format!("{}[{}]", section, index);
                StorageTrigger::new(expect_mapping(trigger, &name)?.clone(), name)
            })
            .collect()
    }

    /// Reads one trigger of this environment.
    pub fn trigger(&self, index: usize) -> Result<StorageTrigger> {
        self.triggers()?
            .into_iter()
            .nth(index)
            .ok_or_else(|| ManifestError::SectionNotFound {
                section: format!("{}.{}[{}]", self.name, TRIGGERS, index),
            })
    }
}

/// A storage-event trigger: a bucket and the notification configuration to put on it.
#[derive(Clone, Debug, PartialEq)]
pub struct StorageTrigger {
    name: String,
    bucket: String,
    notification: ConfigMap,
}

impl StorageTrigger {
    fn new(values: ConfigMap, name: String) -> Result<Self> {
        let bucket = values
            .get(BUCKET)
            .and_then(ConfigValue::as_str)
            .filter(|bucket| !bucket.is_empty())
            .ok_or_else(|| ManifestError::InvalidSection {
                section: name.clone(),
                expected: format!("a non-empty string '{}'", BUCKET),
            })?
            .to_string();
        let notification_section = format!("{}.{}", name, NOTIFICATION_CONFIGURATION);
        let notification = values
            .get(NOTIFICATION_CONFIGURATION)
            .ok_or_else(|| ManifestError::SectionNotFound {
                section: notification_section.clone(),
            })
            .and_then(|value| expect_mapping(value, &notification_section))?
            .clone();
        Ok(Self {
            name,
            bucket,
            notification,
        })
    }

    /// The trigger's location in the manifest.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bucket the notification configuration is put on.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The notification configuration.
    pub fn notification_configuration(&self) -> &ConfigMap {
        &self.notification
    }

    /// Points every function notification at `function_arn`.
    ///
    /// A configuration without function notifications is left unchanged.
    pub fn bind_function_arn(&mut self, function_arn: &str) -> Result<()> {
        let section = format!(
            "{}.{}.{}",
            self.name, NOTIFICATION_CONFIGURATION, FUNCTION_CONFIGURATIONS
        );
        let Some(entries) = self.notification.get_mut(FUNCTION_CONFIGURATIONS) else {
            return Ok(());
        };
        let entries = entries
            .as_sequence_mut()
            .ok_or_else(|| ManifestError::InvalidSection {
                section: section.clone(),
                expected: "a sequence".to_string(),
            })?;

        for (index, entry) in entries.iter_mut().enumerate() {
            let entry = entry
                .as_mapping_mut()
                .ok_or_else(|| ManifestError::InvalidSection {
                    section: format!("{}[{}]", section, index),
                    expected: "a mapping".to_string(),
                })?;
            entry.insert(FUNCTION_ARN, ConfigValue::from(function_arn));
        }
        Ok(())
    }
}

fn expect_mapping<'v>(value: &'v ConfigValue, section: &str) -> Result<&'v ConfigMap> {
    value.as_mapping().ok_or_else(|| ManifestError::InvalidSection {
        section: section.to_string(),
        expected: format!("a mapping, found {}", value.kind()),
    })
}

fn expect_sequence<'v>(value: &'v ConfigValue, section: &str) -> Result<&'v [ConfigValue]> {
    value.as_sequence().ok_or_else(|| ManifestError::InvalidSection {
        section: section.to_string(),
        expected: format!("a sequence, found {}", value.kind()),
    })
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deployment orchestration.
//!
//! This module provides `DeploymentService`, which drives the provider ports
//! through the deploy, invoke and trigger registration sequence. All inputs are
//! passed in explicitly; the service keeps no state besides its provider clients.

use crate::adapters::Artifact;
use crate::domain::{FunctionConfiguration, Manifest, ManifestError, Result, StorageTrigger};
use crate::ports::{FunctionProvider, Invocation, NotificationRegistrar};

/// How a deployment reached the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeployOutcome {
    /// The function existed and its code was replaced.
    Updated,
    /// The function did not exist and was created.
    Created,
}

/// Everything a full deployment run needs.
///
/// # Examples
///
/// ```rust
/// use fnmanifest::adapters::Artifact;
/// use fnmanifest::domain::{ConfigValue, Manifest};
/// use fnmanifest::service::DeploymentPlan;
///
/// let manifest = Manifest::from_raw(ConfigValue::mapping([
///     ("FunctionConfiguration.FunctionName", "thumbnailer"),
/// ]))
/// .unwrap();
/// let artifact = Artifact::from_bytes(b"code".to_vec()).unwrap();
///
/// let plan = DeploymentPlan::new(manifest, artifact).with_redeploy(true);
/// assert_eq!(plan.environment_index(), Some(0));
/// ```
#[derive(Clone, Debug)]
pub struct DeploymentPlan {
    manifest: Manifest,
    artifact: Artifact,
    environment_index: Option<usize>,
    redeploy: bool,
}

impl DeploymentPlan {
    /// Creates a plan for the first environment, without redeploying.
    pub fn new(manifest: Manifest, artifact: Artifact) -> Self {
        Self {
            manifest,
            artifact,
            environment_index: Some(0),
            redeploy: false,
        }
    }

    /// Selects which entry of `Environments` provides the triggers.
    pub fn with_environment(mut self, index: usize) -> Self {
        self.environment_index = Some(index);
        self
    }

    /// Deploys and invokes without registering any trigger.
    pub fn without_triggers(mut self) -> Self {
        self.environment_index = None;
        self
    }

    /// Repeats the deploy and invoke steps once, exercising the update path.
    pub fn with_redeploy(mut self, redeploy: bool) -> Self {
        self.redeploy = redeploy;
        self
    }

    /// The manifest being deployed.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The artifact being deployed.
    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    /// The selected environment, or `None` when triggers are disabled.
    pub fn environment_index(&self) -> Option<usize> {
        self.environment_index
    }
}

/// The result of a full deployment run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentReport {
    /// The deployed function's name.
    pub function_name: String,
    /// The deployed function's ARN.
    pub function_arn: String,
    /// Outcome of every deploy step, in order.
    pub outcomes: Vec<DeployOutcome>,
    /// Response of every verification invoke, in order.
    pub invocations: Vec<Invocation>,
    /// Buckets whose notification configuration was replaced.
    pub registered_buckets: Vec<String>,
}

/// Orchestrates deployments against a function provider.
///
/// # Examples
///
/// ```rust,no_run
/// use fnmanifest::adapters::{Artifact, ManifestFile};
/// use fnmanifest::ports::{FunctionProvider, NotificationRegistrar};
/// use fnmanifest::service::{DeploymentPlan, DeploymentService};
///
/// fn deploy(
///     functions: Box<dyn FunctionProvider>,
///     notifications: Box<dyn NotificationRegistrar>,
/// ) -> fnmanifest::domain::Result<()> {
///     let service = DeploymentService::builder()
///         .with_function_provider(functions)
///         .with_notification_registrar(notifications)
///         .build()?;
///
///     let manifest = ManifestFile::from_file("manifest.yaml")?.into_manifest();
///     let artifact = Artifact::from_file("function.zip")?;
///     let report = service.run(&DeploymentPlan::new(manifest, artifact))?;
///     println!("deployed {}", report.function_arn);
///     Ok(())
/// }
/// ```
pub struct DeploymentService {
    functions: Box<dyn FunctionProvider>,
    notifications: Box<dyn NotificationRegistrar>,
}

impl DeploymentService {
    /// Creates a service from its provider clients.
    pub fn new(
        functions: Box<dyn FunctionProvider>,
        notifications: Box<dyn NotificationRegistrar>,
    ) -> Self {
        Self {
            functions,
            notifications,
        }
    }

    /// Creates a new deployment service builder.
    pub fn builder() -> DeploymentServiceBuilder {
        DeploymentServiceBuilder::new()
    }

    /// Uploads the artifact, creating the function if it does not exist yet.
    ///
    /// Waits until the provider reports the function as updated before returning.
    pub fn deploy(
        &self,
        function: &FunctionConfiguration,
        artifact: &Artifact,
    ) -> Result<DeployOutcome> {
        let name = function.function_name();

        let outcome = match self.functions.update_function_code(name, artifact.bytes()) {
            Ok(()) => {
                tracing::info!("Function code updated: {}", name);
                DeployOutcome::Updated
            }
            Err(ManifestError::FunctionNotFound { .. }) => {
                self.functions
                    .create_function(function.parameters(), artifact.bytes())?;
                tracing::info!("Function created: {}", name);
                DeployOutcome::Created
            }
            Err(e) => return Err(e),
        };

        self.functions.wait_until_updated(name)?;
        tracing::debug!("Function ready: {}", name);
        Ok(outcome)
    }

    /// Invokes the function once and logs its response.
    pub fn invoke(&self, function_name: &str) -> Result<Invocation> {
        let invocation = self.functions.invoke(function_name)?;
        tracing::info!(
            "Invoked {}: status {}, payload {}",
            function_name,
            invocation.status_code,
            invocation.payload_text()
        );
        Ok(invocation)
    }

    /// Returns the function's ARN.
    pub fn function_arn(&self, function_name: &str) -> Result<String> {
        self.functions.function_arn(function_name)
    }

    /// Points the trigger at the function and registers it on its bucket.
    pub fn register_trigger(&self, function_arn: &str, mut trigger: StorageTrigger) -> Result<()> {
        trigger.bind_function_arn(function_arn)?;
        tracing::debug!(
            "Registering trigger {} on bucket {}",
            trigger.name(),
            trigger.bucket()
        );
        self.notifications.put_notification_configuration(
            trigger.bucket(),
            trigger.notification_configuration(),
        )?;
        tracing::info!("Trigger registered on bucket {}", trigger.bucket());
        Ok(())
    }

    /// Runs a full deployment.
    ///
    /// Every manifest section the run needs is read before the first provider
    /// call, so an invalid manifest never results in a partial deployment.
    pub fn run(&self, plan: &DeploymentPlan) -> Result<DeploymentReport> {
        let function = plan.manifest.function_configuration()?;
        let triggers = match plan.environment_index {
            Some(index) => plan.manifest.environment(index)?.triggers()?,
            None => Vec::new(),
        };

        let rounds = if plan.redeploy { 2 } else { 1 };
        let mut outcomes = Vec::with_capacity(rounds);
        let mut invocations = Vec::with_capacity(rounds);
        for _ in 0..rounds {
            outcomes.push(self.deploy(&function, &plan.artifact)?);
            invocations.push(self.invoke(function.function_name())?);
        }

        let function_arn = self.function_arn(function.function_name())?;

        let mut registered_buckets = Vec::with_capacity(triggers.len());
        for trigger in triggers {
            let bucket = trigger.bucket().to_string();
            self.register_trigger(&function_arn, trigger)?;
            registered_buckets.push(bucket);
        }

        Ok(DeploymentReport {
            function_name: function.function_name().to_string(),
            function_arn,
            outcomes,
            invocations,
            registered_buckets,
        })
    }
}

/// Builder for constructing a `DeploymentService`.
#[derive(Default)]
pub struct DeploymentServiceBuilder {
    functions: Option<Box<dyn FunctionProvider>>,
    notifications: Option<Box<dyn NotificationRegistrar>>,
}

impl DeploymentServiceBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compute provider client.
    pub fn with_function_provider(mut self, functions: Box<dyn FunctionProvider>) -> Self {
        self.functions = Some(functions);
        self
    }

    /// Sets the storage notification client.
    pub fn with_notification_registrar(
        mut self,
        notifications: Box<dyn NotificationRegistrar>,
    ) -> Self {
        self.notifications = Some(notifications);
        self
    }

    /// Builds the service.
    ///
    /// Both provider clients are required.
    pub fn build(self) -> Result<DeploymentService> {
        let functions = self.functions.ok_or_else(|| missing_client("function provider"))?;
        let notifications = self
            .notifications
            .ok_or_else(|| missing_client("notification registrar"))?;
        Ok(DeploymentService::new(functions, notifications))
    }
}

fn missing_client(client: &str) -> ManifestError {
    ManifestError::ProviderError {
        operation: "build".to_string(),
        message: format!("no {} configured", client),
        source: None,
    }
}

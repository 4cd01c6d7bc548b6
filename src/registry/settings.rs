use crate::error::{MinervaError, MinervaResult};
use crate::registry::model::ModelHandle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The versioning/artifact-location subset of inbound model settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelParameters {
    pub version: Option<String>,
    pub uri: Option<String>,
}

/// The JSON-shaped, wire-level configuration for one model. Deserialized
/// directly from the control-plane `load` request; `implementation` names a
/// constructor registered with an [`ImplementationRegistry`], mirroring the
/// way the original settings.implementation was "a constructor reference".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSettingsConfig {
    pub name: String,
    #[serde(default)]
    pub parameters: ModelParameters,
    #[serde(default)]
    pub max_batch_size: Option<usize>,
    pub implementation: String,
    /// Runtime-specific extensions the core does not interpret.
    #[serde(default)]
    pub extra: serde_json::Value,
}

/// A constructor resolved from `implementation`, yielding a freshly
/// constructed (not-yet-loaded) [`Model`](crate::registry::model::Model).
/// Mirrors `model_initialiser(settings) -> MLModel` from the source system,
/// generalized to a named registry instead of invoking a class reference
/// directly, since Rust has no equivalent to passing a class as data.
pub trait ModelImplementation: Send + Sync {
    fn construct(&self, settings: &ModelSettings) -> MinervaResult<ModelHandle>;
}

/// The fully resolved settings handed to hooks, the model-context scope, and
/// `Model::construct`: the wire config plus the resolved constructor.
#[derive(Clone)]
pub struct ModelSettings {
    pub config: ModelSettingsConfig,
    pub implementation: Arc<dyn ModelImplementation>,
}

impl fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSettings")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ModelSettings {
    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn version(&self) -> Option<&str> {
        self.config.parameters.version.as_deref()
    }
}

/// Resolves the wire-level `implementation` name to a registered
/// [`ModelImplementation`] constructor, turning a [`ModelSettingsConfig`]
/// into the fully resolved [`ModelSettings`] the registry operates on. The
/// control plane's `load` handler is the one place this is needed: by the
/// time a request reaches [`SingleModelRegistry`](crate::registry::single::SingleModelRegistry),
/// the constructor reference has already been resolved.
#[derive(Clone, Default)]
pub struct ImplementationRegistry {
    implementations: HashMap<String, Arc<dyn ModelImplementation>>,
}

impl ImplementationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, implementation: Arc<dyn ModelImplementation>) {
        self.implementations.insert(name.into(), implementation);
    }

    pub fn resolve(&self, config: ModelSettingsConfig) -> MinervaResult<ModelSettings> {
        let implementation = self
            .implementations
            .get(&config.implementation)
            .cloned()
            .ok_or_else(|| {
                MinervaError::InvalidRequest(format!(
                    "unknown model implementation: {}",
                    config.implementation
                ))
            })?;

        Ok(ModelSettings {
            config,
            implementation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_deserializes_with_defaults() {
        let json = r#"{"name": "iris", "implementation": "sklearn"}"#;
        let config: ModelSettingsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.name, "iris");
        assert!(config.parameters.version.is_none());
        assert!(config.max_batch_size.is_none());
    }

    #[test]
    fn config_deserializes_version_and_uri() {
        let json = r#"{
            "name": "iris",
            "parameters": {"version": "1", "uri": "/models/iris"},
            "maxBatchSize": 8,
            "implementation": "sklearn"
        }"#;
        let config: ModelSettingsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.parameters.version.as_deref(), Some("1"));
        assert_eq!(config.max_batch_size, Some(8));
    }

    #[test]
    fn implementation_registry_resolves_a_registered_name() {
        use crate::registry::test_support::MockImplementation;

        let mut registry = ImplementationRegistry::new();
        registry.register("mock", Arc::new(MockImplementation::default()));

        let config: ModelSettingsConfig =
            serde_json::from_str(r#"{"name": "iris", "implementation": "mock"}"#).unwrap();
        let settings = registry.resolve(config).unwrap();
        assert_eq!(settings.name(), "iris");
    }

    #[test]
    fn implementation_registry_rejects_an_unknown_name() {
        let registry = ImplementationRegistry::new();
        let config: ModelSettingsConfig =
            serde_json::from_str(r#"{"name": "iris", "implementation": "missing"}"#).unwrap();

        let err = registry.resolve(config).unwrap_err();
        assert!(matches!(err, MinervaError::InvalidRequest(_)));
    }
}

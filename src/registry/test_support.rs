//! A mock [`Model`] and settings builder used by this crate's own unit and
//! integration tests, in the spirit of the inference backend's
//! `MockBackend` used elsewhere for testing without real runtime weights.
//! Gated behind `cfg(test)`/the `test-util` feature (see `registry::mod`)
//! so it never ships as part of the crate's default public surface; the
//! `test-util` feature is enabled for integration tests under `tests/` via
//! the self-referencing `dev-dependencies` entry in `Cargo.toml`.

use crate::dataplane::payload::{InferenceRequest, InferenceResponse, ModelMetadata};
use crate::error::{MinervaError, MinervaResult};
use crate::registry::model::{Model, ModelHandle, ReadyFlag};
use crate::registry::settings::{
    ModelImplementation, ModelParameters, ModelSettings, ModelSettingsConfig,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub struct MockModel {
    settings: ModelSettings,
    ready: ReadyFlag,
    pub fail_load: bool,
    pub fail_unload: bool,
    pub load_calls: AtomicUsize,
    pub unload_calls: AtomicUsize,
    pub predict_calls: AtomicUsize,
}

impl MockModel {
    pub fn new(settings: ModelSettings) -> Arc<Self> {
        Arc::new(Self {
            settings,
            ready: ReadyFlag::new(false),
            fail_load: false,
            fail_unload: false,
            load_calls: AtomicUsize::new(0),
            unload_calls: AtomicUsize::new(0),
            predict_calls: AtomicUsize::new(0),
        })
    }

    pub fn failing_load(settings: ModelSettings) -> Arc<Self> {
        let mut m = Self::new(settings);
        Arc::get_mut(&mut m).unwrap().fail_load = true;
        m
    }

    pub fn failing_unload(settings: ModelSettings) -> Arc<Self> {
        let mut m = Self::new(settings);
        Arc::get_mut(&mut m).unwrap().fail_unload = true;
        m
    }
}

#[async_trait]
impl Model for MockModel {
    fn name(&self) -> &str {
        self.settings.name()
    }

    fn version(&self) -> Option<&str> {
        self.settings.version()
    }

    fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    fn set_ready(&self, ready: bool) {
        self.ready.set(ready);
    }

    async fn load(&self) -> MinervaResult<bool> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_load {
            return Err(MinervaError::ServerError("mock load failure".to_string()));
        }
        Ok(true)
    }

    async fn unload(&self) -> MinervaResult<bool> {
        self.unload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_unload {
            return Err(MinervaError::ServerError(
                "mock unload failure".to_string(),
            ));
        }
        Ok(true)
    }

    async fn predict(&self, request: InferenceRequest) -> MinervaResult<InferenceResponse> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        Ok(InferenceResponse {
            id: request.id.unwrap_or_default(),
            model_name: Some(self.name().to_string()),
            model_version: self.version().map(|v| v.to_string()),
            ..Default::default()
        })
    }

    async fn metadata(&self) -> MinervaResult<ModelMetadata> {
        Ok(ModelMetadata {
            name: self.name().to_string(),
            versions: self.version().map(|v| vec![v.to_string()]).unwrap_or_default(),
            platform: "mock".to_string(),
        })
    }
}

/// A constructor that always builds a [`MockModel`], optionally primed to
/// fail its own `load()`/`unload()` step, or to fail at construction time
/// (simulating an initialiser fault).
pub struct MockImplementation {
    pub fail_construct: bool,
    pub fail_load: bool,
    pub fail_unload: bool,
}

impl Default for MockImplementation {
    fn default() -> Self {
        Self {
            fail_construct: false,
            fail_load: false,
            fail_unload: false,
        }
    }
}

impl ModelImplementation for MockImplementation {
    fn construct(&self, settings: &ModelSettings) -> MinervaResult<ModelHandle> {
        if self.fail_construct {
            return Err(MinervaError::ServerError(
                "mock construct failure".to_string(),
            ));
        }
        let model: Arc<MockModel> = if self.fail_load {
            MockModel::failing_load(settings.clone())
        } else if self.fail_unload {
            MockModel::failing_unload(settings.clone())
        } else {
            MockModel::new(settings.clone())
        };
        Ok(model)
    }
}

pub fn mock_settings(name: &str, version: Option<&str>) -> ModelSettings {
    mock_settings_with(name, version, MockImplementation::default())
}

pub fn mock_settings_with(
    name: &str,
    version: Option<&str>,
    implementation: MockImplementation,
) -> ModelSettings {
    ModelSettings {
        config: ModelSettingsConfig {
            name: name.to_string(),
            parameters: ModelParameters {
                version: version.map(|v| v.to_string()),
                uri: None,
            },
            max_batch_size: None,
            implementation: "mock".to_string(),
            extra: serde_json::Value::Null,
        },
        implementation: Arc::new(implementation),
    }
}

/// A ready-to-use handle for tests that only need a live `Model`, not a
/// full registry load path.
pub fn mock_handle(name: &str, version: Option<&str>) -> ModelHandle {
    let settings = mock_settings(name, version);
    let model = MockModel::new(settings);
    model.set_ready(true);
    model
}

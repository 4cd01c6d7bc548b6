use crate::dataplane::payload::{InferenceRequest, InferenceResponse, ModelMetadata};
use crate::error::MinervaResult;
use crate::registry::settings::ModelSettings;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An opaque, stateful compute unit identified by `(name, version?)`.
///
/// `name` is fixed for the lifetime of the value. `version` is likewise fixed
/// per instance; a load hook that needs to change the effective version does
/// so by returning a *different* `ModelHandle`, not by mutating this one in
/// place (see [`crate::registry::hooks::LoadHook`]).
///
/// `ready` is the one piece of interior-mutable state the registry writes
/// directly, because readers (`ready()`, `modelReady`) must observe it
/// without going through a registry-held lock.
#[async_trait]
pub trait Model: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> Option<&str>;

    fn settings(&self) -> &ModelSettings;

    fn is_ready(&self) -> bool;

    fn set_ready(&self, ready: bool);

    /// Perform the model's own load step (open a file handle, warm a cache,
    /// spin up a runtime session, ...). Returns the readiness the model
    /// reports for itself; the registry writes this into `ready`.
    async fn load(&self) -> MinervaResult<bool>;

    /// Perform the model's own unload step. Returns `true` if the unload
    /// succeeded; the registry writes the negation into `ready`.
    async fn unload(&self) -> MinervaResult<bool>;

    async fn predict(&self, request: InferenceRequest) -> MinervaResult<InferenceResponse>;

    async fn metadata(&self) -> MinervaResult<ModelMetadata>;
}

pub type ModelHandle = Arc<dyn Model>;

/// Base readiness flag shared by `Model` implementations via composition,
/// so concrete models don't each reimplement the atomic bookkeeping.
#[derive(Debug, Default)]
pub struct ReadyFlag(AtomicBool);

impl ReadyFlag {
    pub fn new(ready: bool) -> Self {
        Self(AtomicBool::new(ready))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, ready: bool) {
        self.0.store(ready, Ordering::SeqCst);
    }
}

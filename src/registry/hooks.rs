use crate::error::MinervaResult;
use crate::registry::model::ModelHandle;
use async_trait::async_trait;
use std::sync::Arc;

/// Runs at first-load, after the model is provisionally registered but
/// before `Model::load` is invoked. May return a replacement handle (same
/// identity, possibly rewrapped) — the registry re-registers under whatever
/// version the final handle reports.
#[async_trait]
pub trait LoadHook: Send + Sync {
    async fn call(&self, model: ModelHandle) -> MinervaResult<ModelHandle>;
}

/// Runs at unload, concurrently with its siblings; a failure is captured and
/// logged rather than aborting the others or the unload itself (§5, §7).
#[async_trait]
pub trait UnloadHook: Send + Sync {
    async fn call(&self, model: ModelHandle) -> MinervaResult<()>;
}

/// REDESIGN FLAG (§9): the original implementation dispatched reload hooks by
/// comparing a hook's declared name against the string `"load_batching"` to
/// decide whether it wanted `(new)` or `(old, new)`. Here that is a typed
/// choice instead of a name comparison: a hook is either an [`InitHook`],
/// called with only the new model (for hooks, like a batching wrapper, that
/// must initialize fresh rather than transfer state), or a [`ReplaceHook`],
/// called with both models.
#[async_trait]
pub trait InitReloadHook: Send + Sync {
    async fn call(&self, new_model: ModelHandle) -> MinervaResult<ModelHandle>;
}

#[async_trait]
pub trait ReplaceReloadHook: Send + Sync {
    async fn call(&self, old_model: ModelHandle, new_model: ModelHandle)
    -> MinervaResult<ModelHandle>;
}

#[derive(Clone)]
pub enum ReloadHook {
    Init(Arc<dyn InitReloadHook>),
    Replace(Arc<dyn ReplaceReloadHook>),
}

impl ReloadHook {
    pub async fn call(
        &self,
        old_model: &ModelHandle,
        new_model: ModelHandle,
    ) -> MinervaResult<ModelHandle> {
        match self {
            ReloadHook::Init(hook) => hook.call(new_model).await,
            ReloadHook::Replace(hook) => hook.call(Arc::clone(old_model), new_model).await,
        }
    }
}

/// The three immutable hook lists a [`SingleModelRegistry`](crate::registry::single::SingleModelRegistry)
/// is constructed with.
#[derive(Clone, Default)]
pub struct ModelHooks {
    pub on_load: Vec<Arc<dyn LoadHook>>,
    pub on_reload: Vec<ReloadHook>,
    pub on_unload: Vec<Arc<dyn UnloadHook>>,
}

use crate::error::{MinervaError, MinervaResult};
use crate::registry::hooks::ModelHooks;
use crate::registry::model::{Model, ModelHandle};
use crate::registry::ordering::{compare_versions, is_newer_or_versionless};
use crate::registry::settings::ModelSettings;
use crate::registry::context::with_model_context;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// State that every reader (`getModel`, `getModels`, `ready()`) needs a
/// consistent snapshot of. Mutations go through short-lived write-lock
/// critical sections only; `Model::load`/`unload`/hooks run outside the
/// lock so a long-running load never blocks a concurrent `infer` against a
/// different version of the same name.
struct Inner {
    versions: HashMap<String, ModelHandle>,
    default: Option<ModelHandle>,
}

impl Inner {
    fn new() -> Self {
        Self {
            versions: HashMap::new(),
            default: None,
        }
    }

    /// §4.1 default-pointer policy, incremental branch (`_register`).
    fn register(&mut self, model: ModelHandle) {
        if let Some(v) = model.version() {
            self.versions.insert(v.to_string(), Arc::clone(&model));
        }
        self.refresh_default(model);
    }

    fn refresh_default(&mut self, candidate: ModelHandle) {
        match &self.default {
            None => {
                self.default = Some(candidate);
            }
            Some(current) => {
                if candidate.version().is_none() {
                    self.default = Some(candidate);
                } else if current.version().is_none() {
                    // current default is version-less: it stays pinned.
                } else if is_newer_or_versionless(candidate.version(), current.version()) {
                    self.default = Some(candidate);
                }
            }
        }
    }

    fn clear_default(&mut self) {
        self.default = None;
    }

    /// §4.1 default-pointer policy, `clearDefault` + `_findDefault` branch:
    /// maximum live version under §3 ordering, or `None`.
    fn find_default(&self) -> Option<ModelHandle> {
        self.versions
            .values()
            .cloned()
            .max_by(|a, b| compare_versions(a.version(), b.version()))
    }

    fn current_default(&self) -> Option<ModelHandle> {
        self.default.clone().or_else(|| self.find_default())
    }

    fn find_model(&self, version: Option<&str>) -> Option<ModelHandle> {
        match version {
            Some(v) => self.versions.get(v).cloned(),
            None => self.current_default(),
        }
    }

    fn get_models(&self) -> Vec<ModelHandle> {
        let mut models: Vec<ModelHandle> = self.versions.values().cloned().collect();
        if let Some(default) = self.current_default() {
            if default.version().is_none() {
                models.push(default);
            }
        }
        models
    }

    fn remove_version(&mut self, version: &str) {
        self.versions.remove(version);
    }

    fn is_empty(&self) -> bool {
        self.versions.is_empty() && self.current_default().is_none()
    }
}

/// Per-name container managing the set of live versions plus a "default"
/// selection (§4.1). All load/reload/unload transitions for one model name
/// funnel through here.
pub struct SingleModelRegistry {
    name: String,
    state: RwLock<Inner>,
    /// Serializes `load`/`unload`/`unload_version` against each other
    /// (single-writer-within-a-name, §5). Never held across `Model::load`,
    /// `Model::unload`, or hook invocations' own internal compute — only
    /// across the handful of state-mutating steps between them.
    admin_lock: Mutex<()>,
    hooks: ModelHooks,
}

impl SingleModelRegistry {
    pub fn new(name: impl Into<String>, hooks: ModelHooks) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(Inner::new()),
            admin_lock: Mutex::new(()),
            hooks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn load(&self, settings: ModelSettings) -> MinervaResult<ModelHandle> {
        let _guard = self.admin_lock.lock().await;
        let version = settings.version().map(|v| v.to_string());

        let previous = {
            let state = self.state.read().await;
            state.find_model(version.as_deref())
        };

        let new_model = settings
            .implementation
            .construct(&settings)
            .map_err(|e| MinervaError::LoadFailed {
                name: self.name.clone(),
                source: Box::new(e),
            })?;

        with_model_context(settings, async {
            match previous {
                Some(old_model) => self.reload_model(old_model, new_model.clone()).await,
                None => self.load_model(new_model.clone()).await,
            }
        })
        .await?;

        Ok(new_model)
    }

    async fn load_model(&self, model: ModelHandle) -> MinervaResult<()> {
        // Step 2: register before loading so readers see it as "loading".
        {
            let mut state = self.state.write().await;
            state.register(Arc::clone(&model));
        }

        let (final_model, result) = self.run_load_hooks_then_load(model).await;

        match result {
            Ok(()) => {
                tracing::info!(model = self.name, "loaded model successfully");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    model = self.name,
                    error = %e,
                    "model failed to load, rolling back registration"
                );
                // Roll back whatever is actually registered right now, which
                // may be a hook-rewrapped handle under a different version
                // than the one first provisioned at step 2.
                self.unload_model(final_model).await;
                Err(MinervaError::LoadFailed {
                    name: self.name.clone(),
                    source: Box::new(e),
                })
            }
        }
    }

    /// Runs the `onLoad` hooks and then `Model::load`, always returning the
    /// latest handle alongside the result so the caller can roll back the
    /// object that is actually registered, whatever its version, rather than
    /// the pre-hook provisional one.
    async fn run_load_hooks_then_load(
        &self,
        provisional: ModelHandle,
    ) -> (ModelHandle, MinervaResult<()>) {
        let provisional_version = provisional.version().map(|v| v.to_string());
        let original_provisional = Arc::clone(&provisional);
        let mut current = provisional;

        // Step 3: onLoad hooks run sequentially, each may rewrap the model
        // (same identity, possibly under a different version).
        for hook in &self.hooks.on_load {
            match hook.call(Arc::clone(&current)).await {
                Ok(rewrapped) => current = rewrapped,
                Err(e) => return (current, Err(e)),
            }
        }

        // Re-register so the final, possibly-rewrapped object (and its
        // possibly-rewritten version) is what readers see before `load()`.
        // If a hook changed the version, drop the stale provisional entry
        // registered at step 2 so it doesn't linger as an unreachable ghost.
        // If that stale entry was also the current default, the default
        // pointer must be cleared and recomputed from the surviving
        // versions first (§9's ordering hazard) — otherwise `default` would
        // keep referencing a handle no longer present in `versions` (e.g. a
        // hook that rewrites "5" down to "2").
        {
            let mut state = self.state.write().await;
            if provisional_version.as_deref() != current.version() {
                if let Some(old) = provisional_version.as_deref() {
                    let evicting_default = state
                        .default
                        .as_ref()
                        .map(|d| Arc::ptr_eq(d, &original_provisional))
                        .unwrap_or(false);
                    state.remove_version(old);
                    if evicting_default {
                        state.clear_default();
                        if let Some(recomputed) = state.find_default() {
                            state.default = Some(recomputed);
                        }
                    }
                }
            }
            state.register(Arc::clone(&current));
        }

        // Step 4.
        let ready = match current.load().await {
            Ok(ready) => ready,
            Err(e) => return (current, Err(e)),
        };
        current.set_ready(ready);
        (current, Ok(()))
    }

    async fn reload_model(&self, old_model: ModelHandle, new_model: ModelHandle) -> MinervaResult<()> {
        let mut current = new_model;
        for hook in &self.hooks.on_reload {
            current = hook.call(&old_model, current).await?;
        }
        let new_model = current;

        // Step: load the replacement *before* unloading the old one, so at
        // least one instance of this version is ready throughout the swap.
        let ready = new_model.load().await?;
        new_model.set_ready(ready);

        {
            let mut state = self.state.write().await;
            state.register(Arc::clone(&new_model));
            if let Some(default) = &state.default {
                if Arc::ptr_eq(default, &old_model) {
                    state.clear_default();
                }
            }
        }

        let unloaded = old_model.unload().await?;
        old_model.set_ready(!unloaded);

        tracing::info!(model = self.name, "reloaded model successfully");
        Ok(())
    }

    pub async fn unload(&self) {
        let _guard = self.admin_lock.lock().await;
        let models = {
            let state = self.state.read().await;
            state.get_models()
        };

        join_all(models.into_iter().map(|m| self.unload_model(m))).await;

        let mut state = self.state.write().await;
        state.versions.clear();
        state.clear_default();

        tracing::info!(model = self.name, "unloaded all versions successfully");
    }

    pub async fn unload_version(&self, version: Option<&str>) -> MinervaResult<()> {
        let _guard = self.admin_lock.lock().await;
        let model = {
            let state = self.state.read().await;
            state.find_model(version)
        }
        .ok_or_else(|| MinervaError::ModelNotFound {
            name: self.name.clone(),
            version: version.map(|v| v.to_string()),
        })?;

        self.unload_model(model).await;
        Ok(())
    }

    /// Unload of one Model (§4.1): `onUnload` hooks run concurrently with
    /// failures captured rather than aborting the others; never fails
    /// itself (administrative unload is best-effort, §7).
    async fn unload_model(&self, model: ModelHandle) {
        let settings = model.settings().clone();
        let model_for_ctx = Arc::clone(&model);

        with_model_context(settings, async move {
            let hook_results = join_all(
                self.hooks
                    .on_unload
                    .iter()
                    .map(|hook| hook.call(Arc::clone(&model_for_ctx))),
            )
            .await;

            for result in hook_results {
                if let Err(e) = result {
                    tracing::warn!(
                        model = self.name,
                        error = %e,
                        "onUnload hook failed; continuing unload"
                    );
                }
            }

            {
                let mut state = self.state.write().await;
                if let Some(v) = model_for_ctx.version() {
                    state.remove_version(v);
                }
                if let Some(default) = &state.default {
                    if Arc::ptr_eq(default, &model_for_ctx) {
                        state.clear_default();
                    }
                }
            }

            let unloaded = model_for_ctx.unload().await;
            let model_ready = match unloaded {
                Ok(ok) => !ok,
                Err(e) => {
                    tracing::warn!(model = self.name, error = %e, "model unload step failed");
                    false
                }
            };
            model_for_ctx.set_ready(model_ready);

            match model_for_ctx.version() {
                Some(v) => tracing::info!(model = self.name, version = v, "unloaded version"),
                None => tracing::info!(model = self.name, "unloaded unversioned model"),
            }
        })
        .await;
    }

    pub async fn get_model(&self, version: Option<&str>) -> MinervaResult<ModelHandle> {
        let state = self.state.read().await;
        state
            .find_model(version)
            .ok_or_else(|| MinervaError::ModelNotFound {
                name: self.name.clone(),
                version: version.map(|v| v.to_string()),
            })
    }

    pub async fn get_models(&self) -> Vec<ModelHandle> {
        let state = self.state.read().await;
        state.get_models()
    }

    pub async fn is_empty(&self) -> bool {
        let state = self.state.read().await;
        state.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::test_support::{mock_settings, mock_settings_with, MockImplementation};

    fn registry(name: &str) -> SingleModelRegistry {
        SingleModelRegistry::new(name, ModelHooks::default())
    }

    #[tokio::test]
    async fn first_load_then_reload_same_version_keeps_it_reachable() {
        let reg = registry("m");
        reg.load(mock_settings("m", Some("1"))).await.unwrap();
        let first = reg.get_model(Some("1")).await.unwrap();
        assert!(first.is_ready());

        reg.load(mock_settings("m", Some("1"))).await.unwrap();
        let second = reg.get_model(Some("1")).await.unwrap();
        assert!(second.is_ready());
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn s1_first_load_default_selection() {
        let reg = registry("m");
        reg.load(mock_settings("m", Some("1"))).await.unwrap();
        reg.load(mock_settings("m", Some("2"))).await.unwrap();

        let default = reg.get_model(None).await.unwrap();
        assert_eq!(default.version(), Some("2"));
        assert_eq!(reg.get_model(Some("1")).await.unwrap().version(), Some("1"));

        let all = reg.get_models().await;
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn s2_non_integer_versions_compare_lexicographically() {
        let reg = registry("m");
        reg.load(mock_settings("m", Some("a"))).await.unwrap();
        reg.load(mock_settings("m", Some("b"))).await.unwrap();

        assert_eq!(reg.get_model(None).await.unwrap().version(), Some("b"));
    }

    #[tokio::test]
    async fn s3_versionless_default_wins() {
        let reg = registry("m");
        reg.load(mock_settings("m", Some("1"))).await.unwrap();
        reg.load(mock_settings("m", None)).await.unwrap();

        assert!(reg.get_model(None).await.unwrap().version().is_none());
        assert_eq!(reg.get_models().await.len(), 2);
    }

    #[tokio::test]
    async fn s5_failed_load_rolls_back() {
        let reg = registry("m");
        let settings = mock_settings_with(
            "m",
            Some("1"),
            MockImplementation {
                fail_construct: false,
                fail_load: true,
                fail_unload: false,
            },
        );

        let err = reg.load(settings).await.unwrap_err();
        assert!(matches!(err, MinervaError::LoadFailed { .. }));

        let not_found = reg.get_model(Some("1")).await.unwrap_err();
        assert!(matches!(not_found, MinervaError::ModelNotFound { .. }));
        assert!(reg.is_empty().await);
    }

    #[tokio::test]
    async fn unload_clears_everything() {
        let reg = registry("m");
        reg.load(mock_settings("m", Some("1"))).await.unwrap();
        reg.load(mock_settings("m", Some("2"))).await.unwrap();

        reg.unload().await;

        assert!(reg.is_empty().await);
        assert!(reg.get_model(Some("1")).await.is_err());
    }

    #[tokio::test]
    async fn unload_version_removes_only_that_version() {
        let reg = registry("m");
        reg.load(mock_settings("m", Some("1"))).await.unwrap();
        reg.load(mock_settings("m", Some("2"))).await.unwrap();

        reg.unload_version(Some("1")).await.unwrap();

        assert!(reg.get_model(Some("1")).await.is_err());
        assert_eq!(reg.get_model(Some("2")).await.unwrap().version(), Some("2"));
    }

    #[tokio::test]
    async fn unload_version_missing_fails_with_not_found() {
        let reg = registry("m");
        let err = reg.unload_version(Some("nope")).await.unwrap_err();
        assert!(matches!(err, MinervaError::ModelNotFound { .. }));
    }
}

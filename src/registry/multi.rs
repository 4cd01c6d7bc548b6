use crate::error::{MinervaError, MinervaResult};
use crate::registry::hooks::ModelHooks;
use crate::registry::model::ModelHandle;
use crate::registry::settings::ModelSettings;
use crate::registry::single::SingleModelRegistry;
use dashmap::DashMap;
use std::sync::Arc;

/// Thin name-router (§4.2): maps each model name to its own
/// [`SingleModelRegistry`], creating one on first sight of a name and
/// removing it once it goes empty. The map itself is a [`DashMap`], so
/// concurrent operations against *different* names never contend; only
/// operations against the *same* name are serialized, inside the child.
pub struct MultiModelRegistry {
    models: DashMap<String, Arc<SingleModelRegistry>>,
    hooks: ModelHooks,
}

impl MultiModelRegistry {
    pub fn new(hooks: ModelHooks) -> Self {
        Self {
            models: DashMap::new(),
            hooks,
        }
    }

    fn child(&self, name: &str) -> Option<Arc<SingleModelRegistry>> {
        self.models.get(name).map(|entry| Arc::clone(entry.value()))
    }

    fn child_or_create(&self, name: &str) -> Arc<SingleModelRegistry> {
        Arc::clone(
            self.models
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(SingleModelRegistry::new(name, self.hooks.clone())))
                .value(),
        )
    }

    pub async fn load(&self, settings: ModelSettings) -> MinervaResult<ModelHandle> {
        let name = settings.name().to_string();
        let registry = self.child_or_create(&name);
        registry.load(settings).await
    }

    pub async fn unload(&self, name: &str) -> MinervaResult<()> {
        let registry = self
            .child(name)
            .ok_or_else(|| MinervaError::ModelNotFound {
                name: name.to_string(),
                version: None,
            })?;

        registry.unload().await;
        self.models.remove(name);
        Ok(())
    }

    pub async fn unload_version(&self, name: &str, version: Option<&str>) -> MinervaResult<()> {
        let registry = self
            .child(name)
            .ok_or_else(|| MinervaError::ModelNotFound {
                name: name.to_string(),
                version: version.map(|v| v.to_string()),
            })?;

        registry.unload_version(version).await?;

        if registry.is_empty().await {
            self.models.remove(name);
        }
        Ok(())
    }

    pub async fn get_model(&self, name: &str, version: Option<&str>) -> MinervaResult<ModelHandle> {
        let registry = self
            .child(name)
            .ok_or_else(|| MinervaError::ModelNotFound {
                name: name.to_string(),
                version: version.map(|v| v.to_string()),
            })?;

        registry.get_model(version).await
    }

    /// Snapshot of one name's versions, or of every registered name's, when
    /// `name` is `None`.
    pub async fn get_models(&self, name: Option<&str>) -> MinervaResult<Vec<ModelHandle>> {
        match name {
            Some(name) => {
                let registry = self
                    .child(name)
                    .ok_or_else(|| MinervaError::ModelNotFound {
                        name: name.to_string(),
                        version: None,
                    })?;
                Ok(registry.get_models().await)
            }
            None => {
                let registries: Vec<Arc<SingleModelRegistry>> =
                    self.models.iter().map(|entry| Arc::clone(entry.value())).collect();

                let mut all = Vec::new();
                for registry in registries {
                    all.extend(registry.get_models().await);
                }
                Ok(all)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::model::Model;
    use crate::registry::test_support::mock_settings;

    fn registry() -> MultiModelRegistry {
        MultiModelRegistry::new(ModelHooks::default())
    }

    #[tokio::test]
    async fn load_creates_a_child_on_first_sight_of_a_name() {
        let registry = registry();
        registry.load(mock_settings("iris", Some("1"))).await.unwrap();

        let model = registry.get_model("iris", Some("1")).await.unwrap();
        assert_eq!(model.name(), "iris");
    }

    #[tokio::test]
    async fn unknown_name_fails_with_not_found() {
        let registry = registry();
        let err = registry.get_model("missing", None).await.unwrap_err();
        assert!(matches!(err, MinervaError::ModelNotFound { .. }));
    }

    #[tokio::test]
    async fn unload_removes_the_child_entirely() {
        let registry = registry();
        registry.load(mock_settings("iris", Some("1"))).await.unwrap();
        registry.unload("iris").await.unwrap();

        let err = registry.get_model("iris", None).await.unwrap_err();
        assert!(matches!(err, MinervaError::ModelNotFound { .. }));
    }

    #[tokio::test]
    async fn unload_version_removes_child_only_once_empty() {
        let registry = registry();
        registry.load(mock_settings("iris", Some("1"))).await.unwrap();
        registry.load(mock_settings("iris", Some("2"))).await.unwrap();

        registry.unload_version("iris", Some("1")).await.unwrap();
        assert!(registry.get_model("iris", Some("2")).await.is_ok());

        registry.unload_version("iris", Some("2")).await.unwrap();
        let err = registry.get_model("iris", None).await.unwrap_err();
        assert!(matches!(err, MinervaError::ModelNotFound { .. }));
    }

    #[tokio::test]
    async fn get_models_without_a_name_concatenates_every_child() {
        let registry = registry();
        registry.load(mock_settings("iris", Some("1"))).await.unwrap();
        registry.load(mock_settings("mnist", Some("1"))).await.unwrap();

        let all = registry.get_models(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}

//! The data-plane façade (§4.3): resolves `(name, version?) -> Model`,
//! drives the inference middleware chain, and updates the §6 metrics around
//! every `predict` call. This is the only component transport servers talk
//! to.

pub mod payload;

use crate::error::{MinervaError, MinervaResult};
use crate::middleware::{CloudEventsMiddleware, InferenceMiddlewareChain};
use crate::observability::DataPlaneMetrics;
use crate::registry::{with_model_context, Model, MultiModelRegistry};
use payload::{InferenceRequest, InferenceResponse, ModelMetadata, ServerMetadata};
use std::sync::Arc;

pub struct DataPlane {
    registry: Arc<MultiModelRegistry>,
    middleware: InferenceMiddlewareChain,
    metrics: Arc<DataPlaneMetrics>,
    server_name: String,
    server_version: String,
}

impl DataPlane {
    pub fn new(
        registry: Arc<MultiModelRegistry>,
        metrics: Arc<DataPlaneMetrics>,
        server_name: impl Into<String>,
        server_version: impl Into<String>,
    ) -> Self {
        let server_name = server_name.into();
        let cloud_events = Arc::new(CloudEventsMiddleware::new(server_name.clone()));
        let middleware = InferenceMiddlewareChain::new().push(cloud_events.clone(), cloud_events);

        Self {
            registry,
            middleware,
            metrics,
            server_name,
            server_version: server_version.into(),
        }
    }

    pub async fn live(&self) -> bool {
        true
    }

    /// Logical AND of `ready` over every live model; an empty registry is
    /// vacuously ready (§4.3).
    pub async fn ready(&self) -> bool {
        let models = self.registry.get_models(None).await.unwrap_or_default();
        models.iter().all(|model| model.is_ready())
    }

    pub async fn model_ready(&self, name: &str, version: Option<&str>) -> MinervaResult<bool> {
        let model = self.registry.get_model(name, version).await?;
        Ok(model.is_ready())
    }

    pub fn metadata(&self) -> ServerMetadata {
        ServerMetadata {
            name: self.server_name.clone(),
            version: self.server_version.clone(),
            extensions: Vec::new(),
        }
    }

    pub async fn model_metadata(&self, name: &str, version: Option<&str>) -> MinervaResult<ModelMetadata> {
        let model = self.registry.get_model(name, version).await?;
        model.metadata().await
    }

    /// §4.3 infer algorithm, steps 1-11.
    pub async fn infer(
        &self,
        mut request: InferenceRequest,
        name: &str,
        version: Option<&str>,
    ) -> MinervaResult<InferenceResponse> {
        let timer = self.metrics.start_duration_timer(name, version); // step 1
        self.metrics.inc_total(name, version); // step 3

        let result = self.infer_inner(&mut request, name, version).await;
        timer.observe_duration();

        match result {
            Ok(response) => {
                self.metrics.inc_success(name, version); // step 11
                Ok(response)
            }
            Err(e) => {
                self.metrics.inc_failure(name, version); // step 2
                Err(e)
            }
        }
    }

    async fn infer_inner(
        &self,
        request: &mut InferenceRequest,
        name: &str,
        version: Option<&str>,
    ) -> MinervaResult<InferenceResponse> {
        self.metrics.set_sla(name, version, request.sla()); // step 4

        if request.id.is_none() {
            request.id = Some(uuid::Uuid::new_v4().to_string()); // step 5
        }

        let model = self.registry.get_model(name, version).await?; // step 6
        if !model.is_ready() {
            return Err(MinervaError::ModelNotReady {
                name: name.to_string(),
                version: version.map(|v| v.to_string()),
            });
        }

        let settings = model.settings().clone();
        self.middleware.apply_request(request, &settings).await?; // step 7

        let mut response =
            with_model_context(settings.clone(), model.predict(request.clone())).await?; // step 8

        response.id = request.id.clone().unwrap_or_default(); // step 9

        self.middleware.apply_response(&mut response, &settings).await?; // step 10

        Ok(response)
    }
}

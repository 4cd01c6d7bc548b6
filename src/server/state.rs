use crate::dataplane::DataPlane;
use crate::observability::DataPlaneMetrics;
use crate::registry::{ImplementationRegistry, MultiModelRegistry};
use std::sync::Arc;

/// Everything an axum handler needs: the data plane (inference/readiness),
/// the raw registry (control-plane load/unload), and the implementation
/// registry used to resolve `load` requests' `implementation` field.
#[derive(Clone)]
pub struct ServerState {
    pub data_plane: Arc<DataPlane>,
    pub registry: Arc<MultiModelRegistry>,
    pub implementations: Arc<ImplementationRegistry>,
    pub metrics: Arc<DataPlaneMetrics>,
}

impl ServerState {
    pub fn new(
        registry: Arc<MultiModelRegistry>,
        metrics: Arc<DataPlaneMetrics>,
        implementations: Arc<ImplementationRegistry>,
        server_name: impl Into<String>,
        server_version: impl Into<String>,
    ) -> Self {
        let data_plane = Arc::new(DataPlane::new(
            Arc::clone(&registry),
            Arc::clone(&metrics),
            server_name,
            server_version,
        ));

        Self {
            data_plane,
            registry,
            implementations,
            metrics,
        }
    }
}

use crate::dataplane::payload::{InferenceRequest, InferenceResponse};
use crate::error::MinervaResult;
use crate::registry::settings::ModelSettings;
use async_trait::async_trait;
use std::sync::Arc;

/// A request-side middleware: `(payload, modelSettings) -> void`, may
/// mutate `request` in place. A failure aborts the remainder of the chain
/// and surfaces as a request failure (§4.4, §7 `InvalidRequest`).
#[async_trait]
pub trait RequestMiddleware: Send + Sync {
    async fn handle_request(
        &self,
        request: &mut InferenceRequest,
        settings: &ModelSettings,
    ) -> MinervaResult<()>;
}

/// A response-side middleware, run after `predict` returns.
#[async_trait]
pub trait ResponseMiddleware: Send + Sync {
    async fn handle_response(
        &self,
        response: &mut InferenceResponse,
        settings: &ModelSettings,
    ) -> MinervaResult<()>;
}

/// The ordered pair of request/response middleware sequences the data plane
/// runs around every `predict` call. A `CloudEventsMiddleware` is included
/// by construction (§4.4); additional middlewares may be composed on top by
/// the embedder via [`InferenceMiddlewareChain::push`].
#[derive(Clone, Default)]
pub struct InferenceMiddlewareChain {
    request: Vec<Arc<dyn RequestMiddleware>>,
    response: Vec<Arc<dyn ResponseMiddleware>>,
}

impl InferenceMiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        mut self,
        request: Arc<dyn RequestMiddleware>,
        response: Arc<dyn ResponseMiddleware>,
    ) -> Self {
        self.request.push(request);
        self.response.push(response);
        self
    }

    pub async fn apply_request(
        &self,
        request: &mut InferenceRequest,
        settings: &ModelSettings,
    ) -> MinervaResult<()> {
        for middleware in &self.request {
            middleware.handle_request(request, settings).await?;
        }
        Ok(())
    }

    pub async fn apply_response(
        &self,
        response: &mut InferenceResponse,
        settings: &ModelSettings,
    ) -> MinervaResult<()> {
        for middleware in &self.response {
            middleware.handle_response(response, settings).await?;
        }
        Ok(())
    }
}

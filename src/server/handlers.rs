use crate::dataplane::payload::InferenceRequest;
use crate::error::MinervaResult;
use crate::observability::{LivenessResponse, ReadinessResponse};
use crate::registry::{Model, ModelSettingsConfig};
use crate::server::state::ServerState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

pub async fn liveness() -> impl IntoResponse {
    Json(LivenessResponse::live())
}

pub async fn readiness(State(state): State<ServerState>) -> impl IntoResponse {
    if state.data_plane.ready().await {
        Json(ReadinessResponse::ready())
    } else {
        Json(ReadinessResponse::not_ready("one or more models are not ready"))
    }
}

pub async fn model_readiness(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> MinervaResult<Json<ReadinessResponse>> {
    let ready = state.data_plane.model_ready(&name, None).await?;
    Ok(Json(if ready {
        ReadinessResponse::ready()
    } else {
        ReadinessResponse::not_ready(format!("model '{name}' is not ready"))
    }))
}

fn request_headers(headers: &HeaderMap) -> std::collections::HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

pub async fn infer(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Json(mut request): Json<InferenceRequest>,
) -> MinervaResult<impl IntoResponse> {
    request.headers = request_headers(&headers);
    let response = state.data_plane.infer(request, &name, None).await?;
    Ok(response_with_headers(response))
}

pub async fn infer_versioned(
    State(state): State<ServerState>,
    Path((name, version)): Path<(String, String)>,
    headers: HeaderMap,
    Json(mut request): Json<InferenceRequest>,
) -> MinervaResult<impl IntoResponse> {
    request.headers = request_headers(&headers);
    let response = state.data_plane.infer(request, &name, Some(&version)).await?;
    Ok(response_with_headers(response))
}

fn response_with_headers(
    response: crate::dataplane::payload::InferenceResponse,
) -> impl IntoResponse {
    let mut header_map = HeaderMap::new();
    for (key, value) in &response.headers {
        if let (Ok(name), Ok(value)) = (
            axum::http::HeaderName::try_from(key.as_str()),
            axum::http::HeaderValue::try_from(value.as_str()),
        ) {
            header_map.insert(name, value);
        }
    }
    (header_map, Json(response))
}

pub async fn load_model(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Json(mut config): Json<ModelSettingsConfig>,
) -> MinervaResult<Json<ReadinessResponse>> {
    if config.name != name {
        config.name = name;
    }

    let settings = state.implementations.resolve(config)?;
    let model = state.registry.load(settings).await?;
    Ok(Json(if model.is_ready() {
        ReadinessResponse::ready()
    } else {
        ReadinessResponse::not_ready("model registered but not yet ready")
    }))
}

#[derive(Serialize)]
struct UnloadResponse {
    unloaded: bool,
}

pub async fn unload_model(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> MinervaResult<Json<UnloadResponse>> {
    state.registry.unload(&name).await?;
    Ok(Json(UnloadResponse { unloaded: true }))
}

pub async fn metrics(State(state): State<ServerState>) -> impl IntoResponse {
    let body = state.metrics.gather_text();
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

fn label(version: &Option<String>) -> &str {
    version.as_deref().unwrap_or("")
}

#[derive(Error, Debug)]
pub enum MinervaError {
    /// `(name, version?)` resolution failed: no such model/version is registered.
    #[error("model not found: {name} (version: {})", label(.version))]
    ModelNotFound { name: String, version: Option<String> },

    /// Resolved but `ready == false`.
    #[error("model not ready: {name} (version: {})", label(.version))]
    ModelNotReady { name: String, version: Option<String> },

    /// First-load failed: initialiser, an `onLoad` hook, or `Model::load` itself errored.
    #[error("failed to load model '{name}': {source}")]
    LoadFailed {
        name: String,
        #[source]
        source: Box<MinervaError>,
    },

    /// Middleware rejected the request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("server error: {0}")]
    ServerError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl IntoResponse for MinervaError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            MinervaError::ModelNotFound { .. } => {
                (StatusCode::NOT_FOUND, "model_not_found", self.to_string())
            }
            MinervaError::ModelNotReady { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "model_not_ready",
                self.to_string(),
            ),
            MinervaError::LoadFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "load_failed",
                self.to_string(),
            ),
            MinervaError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            MinervaError::ServerError(_)
            | MinervaError::IoError(_)
            | MinervaError::JsonError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                self.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "type": error_code,
                "code": error_code,
                "param": null
            }
        }));

        (status, body).into_response()
    }
}

pub type MinervaResult<T> = Result<T, MinervaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_not_found_renders_name_and_empty_version_label() {
        let err = MinervaError::ModelNotFound {
            name: "sklearn-model".to_string(),
            version: None,
        };
        assert_eq!(err.to_string(), "model not found: sklearn-model (version: )");
    }

    #[test]
    fn load_failed_wraps_source() {
        let inner = MinervaError::InvalidRequest("bad settings".to_string());
        let err = MinervaError::LoadFailed {
            name: "m".to_string(),
            source: Box::new(inner),
        };
        assert!(err.to_string().contains("bad settings"));
    }
}

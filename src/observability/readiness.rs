use serde::{Deserialize, Serialize};

/// Body for `/v2/health/ready` and `/v2/models/{name}/ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ReadinessResponse {
    pub fn ready() -> Self {
        Self {
            ready: true,
            reason: None,
        }
    }

    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self {
            ready: false,
            reason: Some(reason.into()),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Body for `/v2/health/live`: per §6, `live()` is unconditional — the
/// process answering the request is by definition live.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub live: bool,
}

impl LivenessResponse {
    pub fn live() -> Self {
        Self { live: true }
    }
}

//! Model-context scope (§4.5): publishes the currently-active model's
//! settings process-wide so downstream helpers (logging, telemetry) can
//! attribute work without threading settings through every call.
//!
//! Implemented as `tokio::task_local!` storage rather than a naked global
//! (§9 design note): `scope(...).await` gives re-entrant stacking and
//! guaranteed restoration on every exit path, including panics unwound
//! through the task, for free.

use crate::registry::settings::ModelSettings;
use std::future::Future;

tokio::task_local! {
    static CURRENT_MODEL_SETTINGS: ModelSettings;
}

/// Run `fut` with `settings` published as the active model context. Nested
/// calls stack: an inner `with_model_context` shadows the outer value for
/// its own future and the outer value reappears once it returns.
pub async fn with_model_context<F, T>(settings: ModelSettings, fut: F) -> T
where
    F: Future<Output = T>,
{
    CURRENT_MODEL_SETTINGS.scope(settings, fut).await
}

/// The settings of the innermost active model-context scope, if any.
pub fn current_model_settings() -> Option<ModelSettings> {
    CURRENT_MODEL_SETTINGS.try_with(|s| s.clone()).ok()
}

/// The name of the innermost active model-context scope, for log/telemetry
/// attribution at call sites that don't otherwise have it in scope.
pub fn current_model_name() -> Option<String> {
    CURRENT_MODEL_SETTINGS
        .try_with(|s| s.name().to_string())
        .ok()
}

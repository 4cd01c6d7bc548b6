//! The demonstration HTTP embedding (SPEC_FULL.md §10): a thin axum router
//! that exercises the data plane end to end. Transport servers are an
//! external collaborator per §1 — this is one concrete, minimal embedding,
//! not a protocol implementation.

pub mod handlers;
pub mod state;

pub use state::ServerState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// The KServe-V2-flavored subset of routes SPEC_FULL.md §10 names: health,
/// per-model readiness, infer (default and versioned), load/unload, and
/// `/metrics`.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/v2/health/live", get(handlers::liveness))
        .route("/v2/health/ready", get(handlers::readiness))
        .route("/v2/models/:name/ready", get(handlers::model_readiness))
        .route("/v2/models/:name/infer", post(handlers::infer))
        .route(
            "/v2/models/:name/versions/:version/infer",
            post(handlers::infer_versioned),
        )
        .route(
            "/v2/repository/models/:name/load",
            post(handlers::load_model),
        )
        .route(
            "/v2/repository/models/:name/unload",
            post(handlers::unload_model),
        )
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

//! The inference middleware chain (§4.4): ordered request-side and
//! response-side hooks the data plane runs around every `predict` call.
//! Unlike the registry's load/unload hooks, these see the wire-shaped
//! payload itself and may mutate it in place.

pub mod chain;
pub mod cloudevents;

pub use chain::{InferenceMiddlewareChain, RequestMiddleware, ResponseMiddleware};
pub use cloudevents::CloudEventsMiddleware;

//! The model registry (§2, §4.1-§4.2): lifecycle management for named,
//! versioned `Model` instances, from a single name's version set up through
//! the process-wide name-router.

pub mod context;
pub mod hooks;
pub mod model;
pub mod multi;
pub mod ordering;
pub mod settings;
pub mod single;

/// In-process mock `Model` used by this crate's own tests. Gated behind
/// `cfg(test)` or the `test-util` feature so it never ships as part of
/// `modelplane_lib`'s default public surface (the teacher keeps its own
/// test doubles out of shipped `src/` entirely, under `tests/`; this one
/// stays in `src/` only because integration tests need to share it, so it
/// is feature-gated instead).
#[cfg(any(test, feature = "test-util"))]
pub mod test_support;

pub use context::{current_model_name, current_model_settings, with_model_context};
pub use hooks::{InitReloadHook, LoadHook, ModelHooks, ReloadHook, ReplaceReloadHook, UnloadHook};
pub use model::{Model, ModelHandle, ReadyFlag};
pub use multi::MultiModelRegistry;
pub use settings::{
    ImplementationRegistry, ModelImplementation, ModelParameters, ModelSettings, ModelSettingsConfig,
};
pub use single::SingleModelRegistry;

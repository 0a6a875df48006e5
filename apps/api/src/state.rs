use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::VisionModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Vision model backend. `LlmClient` in production, a fake in tests.
    pub vision: Arc<dyn VisionModel>,
    pub config: Config,
}

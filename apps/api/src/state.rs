use std::sync::Arc;

use crate::llm_client::LlmClient;
use crate::store::Store;
use crate::upstream::UpstreamClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence. Postgres in production, in-memory in router tests.
    pub store: Arc<dyn Store>,
    pub upstream: UpstreamClient,
    pub llm: LlmClient,
}

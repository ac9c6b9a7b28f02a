use std::sync::Arc;

use crate::auth::SessionKeys;
use crate::resumes::store::ResumeStore;
use crate::templates::store::TemplateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable résumé store. Postgres in production, in-memory for tests.
    pub resumes: Arc<dyn ResumeStore>,
    pub templates: Arc<dyn TemplateStore>,
    /// Verifies bearer tokens issued by the sign-in provider.
    pub sessions: SessionKeys,
}

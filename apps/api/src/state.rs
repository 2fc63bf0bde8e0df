use std::sync::Arc;

use crate::analysis::SkillExtractor;
use crate::auth::AuthKeys;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Users, profiles, jobs and avatars. In-memory or PostgreSQL, chosen at startup.
    pub store: Arc<dyn Store>,
    /// Pluggable CV analyser. Default: LlmSkillExtractor.
    pub extractor: Arc<dyn SkillExtractor>,
    pub auth: AuthKeys,
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::auth::handlers as auth;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/me", get(auth::handle_me))
        // Jobs & candidate API
        .route("/api/jobs", get(matching::handle_list_jobs))
        .route("/api/candidate/parse", post(analysis::handle_parse))
        .route("/api/candidate/builds", post(matching::handle_builds))
        // Recruiter API
        .route(
            "/api/recruiter/avatars/:job_id",
            get(matching::handle_list_avatars),
        )
        .route(
            "/api/recruiter/avatar/:avatar_id",
            get(matching::handle_avatar_detail),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::render::handlers as render;
use crate::sources::handlers as sources;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume records
        .route("/api/v1/resumes", post(sources::handle_store_resume))
        .route("/api/v1/resumes/:id", get(sources::handle_get_resume))
        .route(
            "/api/v1/resumes/score-document",
            post(sources::handle_score_document),
        )
        // Tailoring
        .route("/api/v1/tailor", post(tailoring::handle_tailor))
        .route("/api/v1/tailor/score", post(tailoring::handle_score))
        .route("/api/v1/tailor/select", post(tailoring::handle_select))
        .route("/api/v1/tailor/render", post(tailoring::handle_render))
        .route("/api/v1/tailor/batch", post(tailoring::handle_tailor_batch))
        .route("/api/v1/tailored/:id", get(tailoring::handle_get_tailored))
        .route("/api/v1/tailored/:id/pdf", post(render::handle_compile_pdf))
        // Jobs
        .route("/api/v1/jobs/extract", post(jobs::handle_extract_jobs))
        .route("/api/v1/jobs/email", post(jobs::handle_draft_email))
        .with_state(state)
}

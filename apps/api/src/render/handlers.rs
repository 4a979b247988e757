//! Axum route handlers for the Render API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::render::storage::upload_pdf;
use crate::sources::store::{get_tailored, set_pdf_key};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PdfResponse {
    pub tailored_id: Uuid,
    pub s3_pdf_key: String,
}

/// Compiles `latex`, uploads the PDF and records its key on the tailored row.
pub async fn publish_pdf(
    state: &AppState,
    tailored_id: Uuid,
    latex: &str,
) -> Result<String, AppError> {
    let pdf = state.compiler.compile_pdf(latex).await?;
    let key = upload_pdf(&state.s3, &state.config.s3_bucket, tailored_id, pdf).await?;
    set_pdf_key(&state.db, tailored_id, &key).await?;
    Ok(key)
}

/// POST /api/v1/tailored/:id/pdf
///
/// Compiles the stored LaTeX of a tailored resume and uploads the PDF.
pub async fn handle_compile_pdf(
    State(state): State<AppState>,
    Path(tailored_id): Path<Uuid>,
) -> Result<Json<PdfResponse>, AppError> {
    let row = get_tailored(&state.db, tailored_id).await?;
    let s3_pdf_key = publish_pdf(&state, row.id, &row.latex_source).await?;

    Ok(Json(PdfResponse {
        tailored_id: row.id,
        s3_pdf_key,
    }))
}

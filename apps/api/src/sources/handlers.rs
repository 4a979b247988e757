//! Axum route handlers for stored records and uploaded documents.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::sources::document::{extract_text, DocumentKind};
use crate::sources::store::{decode_record, get_record_row, save_record};
use crate::state::AppState;
use crate::tailoring::matcher::MatchResult;
use crate::tailoring::models::{normalize_skills, ResumeRecord, ResumeRecordInput};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StoreResumeRequest {
    #[serde(default)]
    pub label: String,
    pub record: ResumeRecordInput,
}

#[derive(Debug, Serialize)]
pub struct StoredResumeResponse {
    pub id: Uuid,
    pub label: String,
    pub record: ResumeRecord,
    pub created_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
///
/// Validates and stores a resume record for later tailoring.
pub async fn handle_store_resume(
    State(state): State<AppState>,
    Json(request): Json<StoreResumeRequest>,
) -> Result<(StatusCode, Json<StoredResumeResponse>), AppError> {
    let record = ResumeRecord::try_from(request.record)?;
    let row = save_record(&state.db, request.label.trim(), &record).await?;

    Ok((
        StatusCode::CREATED,
        Json(StoredResumeResponse {
            id: row.id,
            label: row.label,
            record,
            created_at: row.created_at,
        }),
    ))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<StoredResumeResponse>, AppError> {
    let row = get_record_row(&state.db, resume_id).await?;
    let (id, label, created_at) = (row.id, row.label.clone(), row.created_at);
    let record = decode_record(row)?;

    Ok(Json(StoredResumeResponse {
        id,
        label,
        record,
        created_at,
    }))
}

/// POST /api/v1/resumes/score-document
///
/// Multipart upload with a `file` (pdf, txt, md, tex) and `target_skills`
/// (comma-separated or a JSON array). Scores the document's raw text.
pub async fn handle_score_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MatchResult>, AppError> {
    let mut document: Option<(DocumentKind, Bytes)> = None;
    let mut target_skills: Option<Vec<String>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let kind = DocumentKind::detect(field.file_name(), field.content_type())?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read file: {e}")))?;
                document = Some((kind, data));
            }
            Some("target_skills") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read target_skills: {e}")))?;
                target_skills = Some(parse_skill_list(&raw)?);
            }
            _ => {}
        }
    }

    let (kind, data) =
        document.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;
    let target_skills = target_skills
        .ok_or_else(|| AppError::Validation("missing 'target_skills' field".to_string()))?;

    let text = extract_text(kind, data).await?;
    let result = state
        .matcher
        .score_text(&text, &normalize_skills(&target_skills));

    info!(
        "Scored uploaded {:?} document: {:.2} ({} of {} skills)",
        kind,
        result.score,
        result.matched_skills.len(),
        result.matched_skills.len() + result.missing_skills.len()
    );
    Ok(Json(result))
}

/// Accepts `["rust", "go"]` or `rust, go`.
fn parse_skill_list(raw: &str) -> Result<Vec<String>, AppError> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        return serde_json::from_str(raw)
            .map_err(|e| AppError::Validation(format!("target_skills is not a JSON string array: {e}")));
    }
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect())
}

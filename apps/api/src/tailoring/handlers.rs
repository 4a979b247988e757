//! Axum route handlers for the Tailoring API.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::TailoredResumeRow;
use crate::render::handlers::publish_pdf;
use crate::sources::store::{get_tailored, load_record, save_tailored};
use crate::state::AppState;
use crate::tailoring::assembler::render;
use crate::tailoring::matcher::MatchResult;
use crate::tailoring::models::{ResumeRecord, ResumeRecordInput};
use crate::tailoring::pipeline::{tailor_batch, tailor_with, TailoredResume};
use crate::tailoring::selector::{
    select_by_judgments, select_relevant, RelevanceJudgments, SelectionResult,
};
use crate::tailoring::target::TargetContext;

/// Upper bound on targets per batch request.
const MAX_BATCH_TARGETS: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub record: ResumeRecordInput,
    pub target: TargetContext,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub record: ResumeRecordInput,
    pub target: TargetContext,
    /// Precomputed relevance; when present the skill rule is not applied.
    #[serde(default)]
    pub judgments: Option<RelevanceJudgments>,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub record: ResumeRecordInput,
}

/// Either an inline `record` or the id of a stored one.
#[derive(Debug, Deserialize)]
pub struct RecordSource {
    #[serde(default)]
    pub record: Option<ResumeRecordInput>,
    #[serde(default)]
    pub resume_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    #[serde(flatten)]
    pub source: RecordSource,
    pub target: TargetContext,
    #[serde(default)]
    pub compile_pdf: bool,
}

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub tailored_id: Uuid,
    pub s3_pdf_key: Option<String>,
    pub relevance_backend: &'static str,
    #[serde(flatten)]
    pub result: TailoredResume,
}

#[derive(Debug, Deserialize)]
pub struct BatchTailorRequest {
    #[serde(flatten)]
    pub source: RecordSource,
    pub targets: Vec<TargetContext>,
}

#[derive(Debug, Serialize)]
pub struct BatchTailorResponse {
    pub results: Vec<TailoredResume>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/tailor/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let record = ResumeRecord::try_from(request.record)?;
    Ok(Json(state.matcher.score_record(&record, &request.target)))
}

/// POST /api/v1/tailor/select
pub async fn handle_select(
    Json(request): Json<SelectRequest>,
) -> Result<Json<SelectionResult>, AppError> {
    let record = ResumeRecord::try_from(request.record)?;
    let result = match &request.judgments {
        Some(judgments) => select_by_judgments(&record, judgments),
        None => select_relevant(&record, &request.target),
    };
    Ok(Json(result))
}

/// POST /api/v1/tailor/render
///
/// Returns the LaTeX source of the record as given, without selection.
pub async fn handle_render(
    Json(request): Json<RenderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let record = ResumeRecord::try_from(request.record)?;
    Ok((
        [(header::CONTENT_TYPE, "application/x-tex; charset=utf-8")],
        render(&record),
    ))
}

/// POST /api/v1/tailor
///
/// Full pipeline: score → select (configured backend) → render → persist,
/// and optionally compile and upload the PDF.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    let (record, resume_id) = resolve_record(&state, request.source).await?;

    let result = tailor_with(
        state.relevance_selector.as_ref(),
        &state.matcher,
        &record,
        request.target,
    )
    .await?;

    let row = save_tailored(&state.db, resume_id, &result).await?;

    let s3_pdf_key = if request.compile_pdf {
        Some(publish_pdf(&state, row.id, &result.latex).await?)
    } else {
        None
    };

    Ok(Json(TailorResponse {
        tailored_id: row.id,
        s3_pdf_key,
        relevance_backend: state.relevance_selector.backend(),
        result,
    }))
}

/// POST /api/v1/tailor/batch
///
/// One record, many targets, tailored concurrently with the skill rule.
/// Results are returned in target order and are not persisted.
pub async fn handle_tailor_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchTailorRequest>,
) -> Result<Json<BatchTailorResponse>, AppError> {
    if request.targets.len() > MAX_BATCH_TARGETS {
        return Err(AppError::Validation(format!(
            "at most {MAX_BATCH_TARGETS} targets per batch, got {}",
            request.targets.len()
        )));
    }

    let (record, _) = resolve_record(&state, request.source).await?;
    let results = tailor_batch(state.matcher, record, request.targets).await?;

    Ok(Json(BatchTailorResponse { results }))
}

/// GET /api/v1/tailored/:id
pub async fn handle_get_tailored(
    State(state): State<AppState>,
    Path(tailored_id): Path<Uuid>,
) -> Result<Json<TailoredResumeRow>, AppError> {
    Ok(Json(get_tailored(&state.db, tailored_id).await?))
}

async fn resolve_record(
    state: &AppState,
    source: RecordSource,
) -> Result<(ResumeRecord, Option<Uuid>), AppError> {
    match (source.record, source.resume_id) {
        (Some(input), None) => Ok((ResumeRecord::try_from(input)?, None)),
        (None, Some(id)) => {
            info!("Tailoring stored resume {id}");
            Ok((load_record(&state.db, id).await?, Some(id)))
        }
        (Some(_), Some(_)) => Err(AppError::Validation(
            "provide either 'record' or 'resume_id', not both".to_string(),
        )),
        (None, None) => Err(AppError::Validation(
            "one of 'record' or 'resume_id' is required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_json() -> serde_json::Value {
        json!({
            "identity": {"name": "Ada"},
            "education": [],
            "experience": [{
                "organization": "Acme",
                "role": "Engineer",
                "skills": ["Rust"]
            }],
            "projects": [],
            "skills": {"Languages": ["Rust"]}
        })
    }

    #[tokio::test]
    async fn test_select_uses_judgments_when_supplied() {
        let request: SelectRequest = serde_json::from_value(json!({
            "record": record_json(),
            "target": {"target_skills": ["cobol"]},
            "judgments": {"experience": [0]}
        }))
        .unwrap();
        let Json(result) = handle_select(Json(request)).await.unwrap();
        assert!(!result.fell_back);
        assert_eq!(result.record.experience().len(), 1);
    }

    #[tokio::test]
    async fn test_select_falls_back_without_overlap() {
        let request: SelectRequest = serde_json::from_value(json!({
            "record": record_json(),
            "target": {"target_skills": ["cobol"]}
        }))
        .unwrap();
        let Json(result) = handle_select(Json(request)).await.unwrap();
        assert!(result.fell_back);
    }

    #[tokio::test]
    async fn test_invalid_record_rejected_before_rendering() {
        let mut record = record_json();
        record["experience"][0]["role"] = json!("   ");
        let request: RenderRequest = serde_json::from_value(json!({"record": record})).unwrap();
        let err = handle_render(Json(request)).await.err().unwrap();
        assert!(matches!(err, AppError::InvalidRecord(_)));
    }

    #[test]
    fn test_tailor_request_accepts_inline_or_stored_source() {
        let inline: TailorRequest = serde_json::from_value(json!({
            "record": record_json(),
            "target": {"company": "Acme", "role": "SRE", "target_skills": ["rust"]}
        }))
        .unwrap();
        assert!(inline.source.record.is_some());
        assert!(!inline.compile_pdf);

        let stored: TailorRequest = serde_json::from_value(json!({
            "resume_id": "00000000-0000-0000-0000-000000000000",
            "target": {"target_skills": []},
            "compile_pdf": true
        }))
        .unwrap();
        assert_eq!(stored.source.resume_id, Some(Uuid::nil()));
        assert!(stored.compile_pdf);
    }
}

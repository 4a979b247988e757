//! Axum route handlers for the Jobs API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::email::{draft_email, Candidate, DraftEmail};
use crate::jobs::extractor::{extract_jobs, JobPosting};
use crate::state::AppState;
use crate::tailoring::target::TargetContext;

#[derive(Debug, Deserialize)]
pub struct ExtractJobsRequest {
    /// Attached to every resulting target; the page rarely names it reliably.
    #[serde(default)]
    pub company: String,
    pub page_text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractedJob {
    pub posting: JobPosting,
    pub target: TargetContext,
}

#[derive(Debug, Serialize)]
pub struct ExtractJobsResponse {
    pub jobs: Vec<ExtractedJob>,
}

#[derive(Debug, Deserialize)]
pub struct DraftEmailRequest {
    pub candidate: Candidate,
    pub target: TargetContext,
    #[serde(default)]
    pub portfolio_links: Vec<String>,
}

/// POST /api/v1/jobs/extract
///
/// Extracts job postings from careers-page text and returns each one with the
/// target context it tailors to.
pub async fn handle_extract_jobs(
    State(state): State<AppState>,
    Json(request): Json<ExtractJobsRequest>,
) -> Result<Json<ExtractJobsResponse>, AppError> {
    if request.page_text.trim().is_empty() {
        return Err(AppError::Validation("page_text cannot be empty".to_string()));
    }

    let postings = extract_jobs(&request.page_text, &state.llm).await?;
    let company = request.company.trim();

    Ok(Json(ExtractJobsResponse {
        jobs: postings
            .into_iter()
            .map(|posting| ExtractedJob {
                target: posting.clone().into_target(company),
                posting,
            })
            .collect(),
    }))
}

/// POST /api/v1/jobs/email
///
/// Drafts an application email for one target. The email is returned, not sent.
pub async fn handle_draft_email(
    State(state): State<AppState>,
    Json(request): Json<DraftEmailRequest>,
) -> Result<Json<DraftEmail>, AppError> {
    validate_email_request(&request)?;
    let draft = draft_email(
        &request.candidate,
        &request.target,
        &request.portfolio_links,
        &state.llm,
    )
    .await?;
    Ok(Json(draft))
}

fn validate_email_request(request: &DraftEmailRequest) -> Result<(), AppError> {
    if request.candidate.name.trim().is_empty() {
        return Err(AppError::Validation("candidate.name cannot be empty".to_string()));
    }
    if request.target.role.trim().is_empty() {
        return Err(AppError::Validation("target.role cannot be empty".to_string()));
    }
    Ok(())
}

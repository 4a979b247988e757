//! Persisted resume records and tailoring results (PostgreSQL).

use anyhow::Context;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{StoredResumeRow, TailoredResumeRow};
use crate::tailoring::models::ResumeRecord;
use crate::tailoring::pipeline::TailoredResume;

/// Stores a validated record and returns the new row.
pub async fn save_record(
    pool: &PgPool,
    label: &str,
    record: &ResumeRecord,
) -> Result<StoredResumeRow, AppError> {
    let json = serde_json::to_value(record).context("failed to serialize resume record")?;

    let row = sqlx::query_as::<_, StoredResumeRow>(
        r#"
        INSERT INTO resume_records (id, label, record)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(label)
    .bind(json)
    .fetch_one(pool)
    .await?;

    info!("Stored resume record {} ({})", row.id, row.label);
    Ok(row)
}

pub async fn get_record_row(pool: &PgPool, id: Uuid) -> Result<StoredResumeRow, AppError> {
    sqlx::query_as::<_, StoredResumeRow>("SELECT * FROM resume_records WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// Loads a stored record and re-validates it.
pub async fn load_record(pool: &PgPool, id: Uuid) -> Result<ResumeRecord, AppError> {
    let row = get_record_row(pool, id).await?;
    decode_record(row)
}

pub fn decode_record(row: StoredResumeRow) -> Result<ResumeRecord, AppError> {
    serde_json::from_value(row.record)
        .with_context(|| format!("stored resume {} is not a valid record", row.id))
        .map_err(AppError::Internal)
}

/// Persists the outcome of one tailoring run.
pub async fn save_tailored(
    pool: &PgPool,
    resume_id: Option<Uuid>,
    tailored: &TailoredResume,
) -> Result<TailoredResumeRow, AppError> {
    let target_skills: Vec<String> = tailored.target.target_skills().iter().cloned().collect();

    let row = sqlx::query_as::<_, TailoredResumeRow>(
        r#"
        INSERT INTO tailored_resumes
            (id, resume_id, company, role, target_skills, match_score, coverage_ratio, latex_source)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(resume_id)
    .bind(&tailored.target.company)
    .bind(&tailored.target.role)
    .bind(&target_skills)
    .bind(tailored.match_result.score)
    .bind(tailored.match_result.coverage_ratio)
    .bind(&tailored.latex)
    .fetch_one(pool)
    .await?;

    info!(
        "Stored tailored resume {} for {} / {} (score {:.2})",
        row.id, row.company, row.role, row.match_score
    );
    Ok(row)
}

pub async fn get_tailored(pool: &PgPool, id: Uuid) -> Result<TailoredResumeRow, AppError> {
    sqlx::query_as::<_, TailoredResumeRow>("SELECT * FROM tailored_resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tailored resume {id} not found")))
}

pub async fn set_pdf_key(pool: &PgPool, id: Uuid, s3_key: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE tailored_resumes SET s3_pdf_key = $2 WHERE id = $1")
        .bind(id)
        .bind(s3_key)
        .execute(pool)
        .await?;
    Ok(())
}

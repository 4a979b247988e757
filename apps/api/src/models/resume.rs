use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A canonical resume record as stored. `record` holds the serialized
/// `ResumeRecord` and is re-validated when loaded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredResumeRow {
    pub id: Uuid,
    pub label: String,
    pub record: Value,
    pub created_at: DateTime<Utc>,
}

/// The outcome of one tailoring run.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TailoredResumeRow {
    pub id: Uuid,
    /// Source record, when it came from the store rather than the request body.
    pub resume_id: Option<Uuid>,
    pub company: String,
    pub role: String,
    pub target_skills: Vec<String>,
    pub match_score: f64,
    pub coverage_ratio: f64,
    pub latex_source: String,
    pub s3_pdf_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

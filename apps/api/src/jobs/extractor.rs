//! Job extraction — careers-page text in, job postings (and target contexts) out.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::jobs::prompts::{EXTRACT_JOBS_PROMPT_TEMPLATE, EXTRACT_JOBS_SYSTEM};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_RULES, NO_INVENTION_RULE};
use crate::llm_client::LlmClient;
use crate::tailoring::target::TargetContext;

/// Page text beyond this many characters is cut before prompting.
const MAX_PAGE_CHARS: usize = 60_000;

/// One posting as reported by the extraction collaborator.
///
/// `role` is required so that an unrelated object (`{"jobs": [...]}`,
/// `{"error": "..."}`) never passes for a single posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub role: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "lenient_skills")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl JobPosting {
    fn is_blank(&self) -> bool {
        self.role.trim().is_empty() && self.description.trim().is_empty() && self.skills.is_empty()
    }

    /// The posting as a tailoring target for `company`.
    pub fn into_target(self, company: &str) -> TargetContext {
        TargetContext::new(
            company,
            self.role,
            Some(self.description),
            self.skills,
        )
    }
}

/// The model answers with either one posting or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExtractionReply {
    Many(Vec<JobPosting>),
    One(JobPosting),
}

impl From<ExtractionReply> for Vec<JobPosting> {
    fn from(reply: ExtractionReply) -> Self {
        match reply {
            ExtractionReply::Many(postings) => postings,
            ExtractionReply::One(posting) => vec![posting],
        }
    }
}

/// Extracts the job postings in `page_text`, in page order.
pub async fn extract_jobs(page_text: &str, llm: &LlmClient) -> Result<Vec<JobPosting>, AppError> {
    let prompt = fill_template(
        EXTRACT_JOBS_PROMPT_TEMPLATE,
        &[("page_text", truncate(page_text))],
    );
    let system = format!("{EXTRACT_JOBS_SYSTEM} {NO_INVENTION_RULE} {JSON_ONLY_RULES}");

    let reply: ExtractionReply = llm.call_json(&prompt, &system).await.map_err(|e| {
        if e.is_unusable_output() {
            AppError::UpstreamParse(format!("unable to parse job postings: {e}"))
        } else {
            AppError::Llm(format!("job extraction failed: {e}"))
        }
    })?;

    let postings = usable_postings(reply)?;
    info!("Extracted {} job postings", postings.len());
    Ok(postings)
}

/// Drops blank postings. A reply that had postings but none usable is an error;
/// an empty list means the page had no openings.
fn usable_postings(reply: ExtractionReply) -> Result<Vec<JobPosting>, AppError> {
    let postings = Vec::from(reply);
    let returned = postings.len();
    let usable: Vec<JobPosting> = postings.into_iter().filter(|p| !p.is_blank()).collect();

    if returned > 0 && usable.is_empty() {
        return Err(AppError::UpstreamParse(format!(
            "all {returned} extracted job postings were blank"
        )));
    }
    if usable.len() < returned {
        warn!("Dropped {} blank job postings", returned - usable.len());
    }
    Ok(usable)
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(MAX_PAGE_CHARS) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

/// `"3+ years"`, `3` or `null`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    })
}

/// `["Rust", "Go"]` or `"Rust, Go"`.
fn lenient_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Skills {
        List(Vec<String>),
        Text(String),
        Missing(()),
    }

    Ok(match Skills::deserialize(deserializer)? {
        Skills::List(list) => list,
        Skills::Text(text) => text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Skills::Missing(()) => Vec::new(),
    })
}

//! Relevance backends — pluggable strategies that decide which entries of a
//! record belong on a tailored resume.
//!
//! `AppState` holds an `Arc<dyn RelevanceSelector>`, chosen at startup from
//! `RELEVANCE_BACKEND`. Every backend ends in the same stable filtering pass
//! (`selector`), so ordering and the fallback rule never depend on the backend.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_RULES};
use crate::llm_client::LlmClient;
use crate::tailoring::models::ResumeRecord;
use crate::tailoring::prompts::{RELEVANCE_PROMPT_TEMPLATE, RELEVANCE_SYSTEM};
use crate::tailoring::selector::{
    select_by_judgments, select_relevant, RelevanceJudgments, SelectionResult,
};
use crate::tailoring::target::TargetContext;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait RelevanceSelector: Send + Sync {
    async fn select(
        &self,
        resume: &ResumeRecord,
        target: &TargetContext,
    ) -> Result<SelectionResult, AppError>;

    /// Short name reported alongside results ("skills" | "llm").
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// SkillOverlapSelector — default
// ────────────────────────────────────────────────────────────────────────────

/// The skill-intersection rule. Pure, deterministic, no I/O.
pub struct SkillOverlapSelector;

#[async_trait]
impl RelevanceSelector for SkillOverlapSelector {
    async fn select(
        &self,
        resume: &ResumeRecord,
        target: &TargetContext,
    ) -> Result<SelectionResult, AppError> {
        Ok(select_relevant(resume, target))
    }

    fn backend(&self) -> &'static str {
        "skills"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmRelevanceSelector
// ────────────────────────────────────────────────────────────────────────────

/// Asks the LLM for the positions of relevant entries and applies them through
/// the pre-judged path. Entry skill tags are not consulted.
pub struct LlmRelevanceSelector(pub LlmClient);

/// Both lists are required; a reply under any other keys is unusable output.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LlmRelevanceReply {
    experience: Vec<usize>,
    projects: Vec<usize>,
}

#[async_trait]
impl RelevanceSelector for LlmRelevanceSelector {
    async fn select(
        &self,
        resume: &ResumeRecord,
        target: &TargetContext,
    ) -> Result<SelectionResult, AppError> {
        let prompt = build_relevance_prompt(resume, target);
        let system = format!("{RELEVANCE_SYSTEM} {JSON_ONLY_RULES}");

        let reply: LlmRelevanceReply =
            self.0.call_json(&prompt, &system).await.map_err(|e| {
                if e.is_unusable_output() {
                    AppError::UpstreamParse(format!("relevance reply unusable: {e}"))
                } else {
                    AppError::Llm(format!("relevance selection failed: {e}"))
                }
            })?;

        let judgments = judgments_from_reply(reply, resume);
        info!(
            "LLM marked {} experience and {} project entries relevant for {}",
            judgments.experience.len(),
            judgments.projects.len(),
            target.role
        );

        Ok(select_by_judgments(resume, &judgments))
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

fn judgments_from_reply(reply: LlmRelevanceReply, resume: &ResumeRecord) -> RelevanceJudgments {
    RelevanceJudgments {
        experience: in_range(reply.experience, resume.experience().len(), "experience"),
        projects: in_range(reply.projects, resume.projects().len(), "projects"),
    }
}

fn in_range(indices: Vec<usize>, len: usize, section: &str) -> BTreeSet<usize> {
    indices
        .into_iter()
        .filter(|&i| {
            let ok = i < len;
            if !ok {
                warn!("LLM returned {section} position {i}, but there are only {len} entries");
            }
            ok
        })
        .collect()
}

fn build_relevance_prompt(resume: &ResumeRecord, target: &TargetContext) -> String {
    let experience = numbered(resume.experience().iter().map(|e| {
        format!(
            "{}. Technologies: {}. {}",
            e.label(),
            join_or_none(e.skills.iter()),
            e.description.join(" ")
        )
    }));
    let projects = numbered(resume.projects().iter().map(|p| {
        format!(
            "{}. Technologies: {}. {}",
            p.label(),
            join_or_none(p.skill_keys().iter()),
            p.description.join(" ")
        )
    }));

    let target_skills = join_or_none(target.target_skills().iter());

    fill_template(
        RELEVANCE_PROMPT_TEMPLATE,
        &[
            ("company", target.company.as_str()),
            ("role", target.role.as_str()),
            ("target_skills", target_skills.as_str()),
            (
                "job_description",
                target.job_description.as_deref().unwrap_or("(none)"),
            ),
            ("experience", experience.as_str()),
            ("projects", projects.as_str()),
        ],
    )
}

fn numbered(lines: impl Iterator<Item = String>) -> String {
    let out: Vec<String> = lines.enumerate().map(|(i, l)| format!("[{i}] {l}")).collect();
    if out.is_empty() {
        "(none)".to_string()
    } else {
        out.join("\n")
    }
}

fn join_or_none<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let joined = items.map(String::as_str).collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}

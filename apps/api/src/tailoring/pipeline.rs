//! Tailoring pipeline — score, select, render for one record and one target.
//!
//! Scoring always looks at the full source record so the score reflects the
//! candidate, not the subset that happened to be selected.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::tailoring::assembler::render;
use crate::tailoring::matcher::{MatchResult, SkillMatcher};
use crate::tailoring::models::ResumeRecord;
use crate::tailoring::relevance::RelevanceSelector;
use crate::tailoring::selector::{select_relevant, ExcludedEntry, SelectionResult};
use crate::tailoring::target::TargetContext;

/// Everything produced for one target.
#[derive(Debug, Clone, Serialize)]
pub struct TailoredResume {
    pub target: TargetContext,
    pub match_result: MatchResult,
    pub record: ResumeRecord,
    pub excluded: Vec<ExcludedEntry>,
    pub fell_back: bool,
    pub latex: String,
}

impl TailoredResume {
    fn assemble(
        target: TargetContext,
        match_result: MatchResult,
        selection: SelectionResult,
    ) -> Self {
        let latex = render(&selection.record);
        Self {
            target,
            match_result,
            record: selection.record,
            excluded: selection.excluded,
            fell_back: selection.fell_back,
            latex,
        }
    }
}

/// Synchronous pipeline using the skill-intersection rule.
pub fn tailor(
    matcher: &SkillMatcher,
    resume: &ResumeRecord,
    target: TargetContext,
) -> TailoredResume {
    let match_result = matcher.score_record(resume, &target);
    let selection = select_relevant(resume, &target);
    TailoredResume::assemble(target, match_result, selection)
}

/// Pipeline with a pluggable relevance backend.
pub async fn tailor_with(
    selector: &dyn RelevanceSelector,
    matcher: &SkillMatcher,
    resume: &ResumeRecord,
    target: TargetContext,
) -> Result<TailoredResume, AppError> {
    let match_result = matcher.score_record(resume, &target);
    let selection = selector.select(resume, &target).await?;
    debug!(
        "backend={} fell_back={} excluded={}",
        selector.backend(),
        selection.fell_back,
        selection.excluded.len()
    );
    Ok(TailoredResume::assemble(target, match_result, selection))
}

/// Tailors one record to many targets concurrently on the blocking pool.
/// Results come back in the order of `targets`.
pub async fn tailor_batch(
    matcher: SkillMatcher,
    resume: ResumeRecord,
    targets: Vec<TargetContext>,
) -> Result<Vec<TailoredResume>, AppError> {
    let resume = Arc::new(resume);
    let count = targets.len();
    let mut set = JoinSet::new();

    for (position, target) in targets.into_iter().enumerate() {
        let resume = Arc::clone(&resume);
        set.spawn_blocking(move || (position, tailor(&matcher, &resume, target)));
    }

    let mut slots: Vec<Option<TailoredResume>> = vec![None; count];
    while let Some(joined) = set.join_next().await {
        let (position, tailored) = joined
            .map_err(|e| AppError::Internal(anyhow::anyhow!("tailoring task failed: {e}")))?;
        slots[position] = Some(tailored);
    }

    info!("Tailored one record to {count} targets");
    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tailoring::models::{
        EducationEntry, ExperienceEntry, Identity, ProjectEntry, SkillInventory,
    };
    use crate::tailoring::relevance::SkillOverlapSelector;

    fn record() -> ResumeRecord {
        ResumeRecord::new(
            Identity {
                name: "Ada Lovelace".to_string(),
                ..Identity::default()
            },
            vec![EducationEntry {
                institution: "University of London".to_string(),
                degree: "Mathematics".to_string(),
                grade: String::new(),
                duration: String::new(),
            }],
            vec![ExperienceEntry {
                organization: "Analytical Engines Ltd".to_string(),
                role: "Engineer".to_string(),
                location: String::new(),
                duration: String::new(),
                description: vec!["Wrote the first program".to_string()],
                skills: ["python".to_string(), "sql".to_string()].into_iter().collect(),
            }],
            vec![
                ProjectEntry {
                    name: "Dashboard".to_string(),
                    technologies: vec![],
                    description: vec![],
                    skills: ["react".to_string(), "node".to_string()].into_iter().collect(),
                },
                ProjectEntry {
                    name: "Legacy Port".to_string(),
                    technologies: vec![],
                    description: vec![],
                    skills: ["java".to_string()].into_iter().collect(),
                },
            ],
            SkillInventory::from_pairs([("Languages", vec!["Python"])]),
        )
        .unwrap()
    }

    #[test]
    fn test_tailor_scores_selects_and_renders() {
        let target = TargetContext::new("Acme", "Engineer", None, ["python", "react"]);
        let tailored = tailor(&SkillMatcher::default(), &record(), target);

        assert_eq!(tailored.match_result.coverage_ratio, 1.0);
        assert_eq!(tailored.match_result.score, 100.0);
        assert_eq!(tailored.record.projects().len(), 1);
        assert_eq!(tailored.excluded.len(), 1);
        assert!(tailored.latex.contains("Dashboard"));
        assert!(!tailored.latex.contains("Legacy Port"));
    }

    #[tokio::test]
    async fn test_tailor_with_matches_sync_pipeline_for_skill_backend() {
        let resume = record();
        let target = TargetContext::new("Acme", "Engineer", None, ["python"]);
        let matcher = SkillMatcher::default();
        let via_trait = tailor_with(&SkillOverlapSelector, &matcher, &resume, target.clone())
            .await
            .unwrap();
        let direct = tailor(&matcher, &resume, target);
        assert_eq!(via_trait.latex, direct.latex);
        assert_eq!(via_trait.match_result, direct.match_result);
    }

    #[tokio::test]
    async fn test_batch_preserves_target_order() {
        let targets = vec![
            TargetContext::new("A", "One", None, ["java"]),
            TargetContext::new("B", "Two", None, ["python"]),
            TargetContext::new("C", "Three", None, Vec::<String>::new()),
        ];
        let results = tailor_batch(SkillMatcher::default(), record(), targets)
            .await
            .unwrap();

        let companies: Vec<_> = results.iter().map(|r| r.target.company.as_str()).collect();
        assert_eq!(companies, vec!["A", "B", "C"]);
        assert_eq!(results[2].match_result.coverage_ratio, 0.0);
        assert!(results[2].fell_back);
    }

    #[tokio::test]
    async fn test_batch_with_no_targets() {
        let results = tailor_batch(SkillMatcher::default(), record(), vec![])
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}

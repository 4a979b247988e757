//! Relevance Selector — reduces a resume to the entries relevant to a target.
//!
//! Two relevance sources, one filtering pass:
//! - the skill rule: an entry is relevant iff its skill keys intersect the target skills;
//! - upstream judgments: positions already chosen by an external selector, taken as-is.
//!
//! Filtering is stable, so the source order (recency/priority) survives. Education,
//! identity and the skills inventory pass through untouched. When nothing survives in
//! either section the untailored record is returned instead of an empty body.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tailoring::models::{ExperienceEntry, ProjectEntry, ResumeRecord};
use crate::tailoring::target::TargetContext;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySection {
    Experience,
    Project,
}

/// An entry left out of the tailored record, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedEntry {
    pub section: EntrySection,
    /// Position in the source record.
    pub index: usize,
    pub label: String,
    pub reason: String,
}

/// Precomputed relevance from an external collaborator, keyed by entry position
/// in the source record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceJudgments {
    #[serde(default)]
    pub experience: BTreeSet<usize>,
    #[serde(default)]
    pub projects: BTreeSet<usize>,
}

/// The tailored record plus what was left out.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionResult {
    pub record: ResumeRecord,
    pub excluded: Vec<ExcludedEntry>,
    /// True when nothing was relevant and `record` is the untailored source.
    pub fell_back: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Selection
// ────────────────────────────────────────────────────────────────────────────

/// Tailors `resume` to `target` with the skill-intersection rule.
pub fn select(resume: &ResumeRecord, target: &TargetContext) -> ResumeRecord {
    select_relevant(resume, target).record
}

/// Skill-intersection selection with diagnostics.
pub fn select_relevant(resume: &ResumeRecord, target: &TargetContext) -> SelectionResult {
    let wanted = target.target_skills();

    let experience = filter_entries(
        resume.experience(),
        EntrySection::Experience,
        ExperienceEntry::label,
        |_, entry| skill_verdict(&entry.skill_keys(), wanted),
    );
    let projects = filter_entries(
        resume.projects(),
        EntrySection::Project,
        ProjectEntry::label,
        |_, entry| skill_verdict(&entry.skill_keys(), wanted),
    );

    assemble(resume, experience, projects)
}

/// Selection driven by upstream judgments. Entries are not re-checked against
/// skills; positions outside the record are ignored.
pub fn select_by_judgments(
    resume: &ResumeRecord,
    judgments: &RelevanceJudgments,
) -> SelectionResult {
    let experience = filter_entries(
        resume.experience(),
        EntrySection::Experience,
        ExperienceEntry::label,
        |index, _| judged_verdict(judgments.experience.contains(&index)),
    );
    let projects = filter_entries(
        resume.projects(),
        EntrySection::Project,
        ProjectEntry::label,
        |index, _| judged_verdict(judgments.projects.contains(&index)),
    );

    assemble(resume, experience, projects)
}

struct Filtered<T> {
    kept: Vec<Arc<T>>,
    excluded: Vec<ExcludedEntry>,
}

fn filter_entries<T, L, J>(
    entries: &[Arc<T>],
    section: EntrySection,
    label: L,
    mut judge: J,
) -> Filtered<T>
where
    L: Fn(&T) -> String,
    J: FnMut(usize, &T) -> Result<(), String>,
{
    let mut kept = Vec::new();
    let mut excluded = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        match judge(index, &**entry) {
            Ok(()) => kept.push(Arc::clone(entry)),
            Err(reason) => excluded.push(ExcludedEntry {
                section,
                index,
                label: label(&**entry),
                reason,
            }),
        }
    }

    Filtered { kept, excluded }
}

fn skill_verdict(keys: &BTreeSet<String>, wanted: &BTreeSet<String>) -> Result<(), String> {
    if keys.is_empty() {
        return Err("No declared skills".to_string());
    }
    if keys.is_disjoint(wanted) {
        return Err("No declared skill overlaps the target skills".to_string());
    }
    Ok(())
}

fn judged_verdict(relevant: bool) -> Result<(), String> {
    if relevant {
        Ok(())
    } else {
        Err("Not marked relevant by the upstream selector".to_string())
    }
}

fn assemble(
    resume: &ResumeRecord,
    experience: Filtered<ExperienceEntry>,
    projects: Filtered<ProjectEntry>,
) -> SelectionResult {
    if experience.kept.is_empty() && projects.kept.is_empty() {
        debug!("no relevant experience or projects; keeping the untailored record");
        return SelectionResult {
            record: resume.clone(),
            excluded: Vec::new(),
            fell_back: true,
        };
    }

    debug!(
        "selected {} experience and {} project entries",
        experience.kept.len(),
        projects.kept.len()
    );

    let mut excluded = experience.excluded;
    excluded.extend(projects.excluded);

    SelectionResult {
        record: resume.with_entries(experience.kept, projects.kept),
        excluded,
        fell_back: false,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tailoring::models::{EducationEntry, Identity, SkillInventory};

    fn experience(org: &str, skills: &[&str]) -> ExperienceEntry {
        ExperienceEntry {
            organization: org.to_string(),
            role: "Engineer".to_string(),
            location: "Remote".to_string(),
            duration: "2020 - 2022".to_string(),
            description: vec![format!("Shipped things at {org}")],
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn project(name: &str, skills: &[&str]) -> ProjectEntry {
        ProjectEntry {
            name: name.to_string(),
            technologies: vec![],
            description: vec![],
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn record(experience: Vec<ExperienceEntry>, projects: Vec<ProjectEntry>) -> ResumeRecord {
        ResumeRecord::new(
            Identity::default(),
            vec![EducationEntry {
                institution: "State University".to_string(),
                degree: "BSc".to_string(),
                grade: String::new(),
                duration: String::new(),
            }],
            experience,
            projects,
            SkillInventory::from_pairs([("Languages", vec!["Python"])]),
        )
        .unwrap()
    }

    fn target(skills: &[&str]) -> TargetContext {
        TargetContext::new("Acme", "Engineer", None, skills.iter().copied())
    }

    #[test]
    fn test_intersecting_entries_selected_and_others_excluded() {
        let resume = record(
            vec![experience("Acme", &["python", "sql"])],
            vec![project("Dashboard", &["react", "node"]), project("Legacy", &["java"])],
        );
        let result = select_relevant(&resume, &target(&["python", "react"]));

        assert!(!result.fell_back);
        assert_eq!(result.record.experience().len(), 1);
        assert_eq!(result.record.projects().len(), 1);
        assert_eq!(result.record.projects()[0].name, "Dashboard");
        assert_eq!(result.excluded.len(), 1);
        assert_eq!(result.excluded[0].label, "Legacy");
        assert_eq!(result.excluded[0].section, EntrySection::Project);
        assert_eq!(result.excluded[0].index, 1);
    }

    #[test]
    fn test_selection_is_case_insensitive() {
        let resume = record(vec![experience("Acme", &["PyThOn"])], vec![]);
        let tailored = select(&resume, &target(&["PYTHON"]));
        assert_eq!(tailored.experience().len(), 1);
    }

    #[test]
    fn test_selected_entries_are_shared_and_in_source_order() {
        let resume = record(
            vec![
                experience("First", &["rust"]),
                experience("Second", &["java"]),
                experience("Third", &["rust", "go"]),
            ],
            vec![],
        );
        let tailored = select(&resume, &target(&["rust"]));

        assert_eq!(tailored.experience().len(), 2);
        assert!(Arc::ptr_eq(&tailored.experience()[0], &resume.experience()[0]));
        assert!(Arc::ptr_eq(&tailored.experience()[1], &resume.experience()[2]));
    }

    #[test]
    fn test_untagged_entries_excluded() {
        let resume = record(
            vec![experience("Tagged", &["rust"]), experience("Untagged", &[])],
            vec![],
        );
        let result = select_relevant(&resume, &target(&["rust"]));
        assert_eq!(result.record.experience().len(), 1);
        assert_eq!(result.excluded[0].reason, "No declared skills");
    }

    #[test]
    fn test_project_technologies_count_as_skills() {
        let mut proj = project("Site", &[]);
        proj.technologies = vec!["React".to_string()];
        let resume = record(vec![], vec![proj]);
        let result = select_relevant(&resume, &target(&["react"]));
        assert!(!result.fell_back);
        assert_eq!(result.record.projects().len(), 1);
    }

    #[test]
    fn test_no_overlap_falls_back_to_original() {
        let resume = record(
            vec![experience("Acme", &["java"])],
            vec![project("Tool", &["c++"])],
        );
        let result = select_relevant(&resume, &target(&["python"]));
        assert!(result.fell_back);
        assert!(result.excluded.is_empty());
        assert_eq!(result.record, resume);
    }

    #[test]
    fn test_empty_target_falls_back_to_original() {
        let resume = record(vec![experience("Acme", &["java"])], vec![]);
        assert_eq!(select(&resume, &target(&[])), resume);
    }

    #[test]
    fn test_education_identity_and_skills_pass_through() {
        let resume = record(
            vec![experience("Keep", &["rust"]), experience("Drop", &["cobol"])],
            vec![],
        );
        let tailored = select(&resume, &target(&["rust"]));
        assert_eq!(tailored.education(), resume.education());
        assert_eq!(tailored.identity(), resume.identity());
        assert_eq!(tailored.skills(), resume.skills());
        assert_eq!(resume.experience().len(), 2, "source record must not change");
    }

    #[test]
    fn test_judgments_taken_without_rederiving() {
        let resume = record(
            vec![experience("Untagged", &[]), experience("Tagged", &["rust"])],
            vec![project("A", &[]), project("B", &["go"])],
        );
        let judgments = RelevanceJudgments {
            experience: [0].into_iter().collect(),
            projects: [1, 99].into_iter().collect(),
        };
        let result = select_by_judgments(&resume, &judgments);

        assert!(!result.fell_back);
        assert_eq!(result.record.experience()[0].organization, "Untagged");
        assert_eq!(result.record.projects()[0].name, "B");
        assert_eq!(result.excluded.len(), 2);
    }

    #[test]
    fn test_empty_judgments_fall_back() {
        let resume = record(vec![experience("Acme", &["rust"])], vec![]);
        let result = select_by_judgments(&resume, &RelevanceJudgments::default());
        assert!(result.fell_back);
        assert_eq!(result.record, resume);
    }
}

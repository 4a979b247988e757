//! Resume record — the validated, read-only input of the tailoring engine.
//!
//! A `ResumeRecord` can only be obtained through `ResumeRecord::new` (or by
//! deserializing a `ResumeRecordInput`, which goes through the same checks), so
//! every record the engine sees has passed required-field validation.
//! Entries are shared behind `Arc`: a tailored record points at the very same
//! entries as its source.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Skill normalization
// ────────────────────────────────────────────────────────────────────────────

/// Comparison key for a skill: lowercase, trimmed, internal whitespace collapsed.
pub fn normalize_skill(skill: &str) -> String {
    skill
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalizes a collection of skills into a set, dropping blanks.
pub fn normalize_skills<I, S>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .map(|s| normalize_skill(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Validation errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{section}[{index}].{field} is required")]
    MissingField {
        section: &'static str,
        index: usize,
        field: &'static str,
    },

    #[error("skills category #{index} has a blank name")]
    BlankSkillCategory { index: usize },

    #[error("skills category '{0}' is declared more than once")]
    DuplicateSkillCategory(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Entries
// ────────────────────────────────────────────────────────────────────────────

/// Contact identity shown in the heading. Empty values are simply not displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// LinkedIn handle, not a full URL.
    #[serde(default)]
    pub linkedin: String,
    /// GitHub handle, not a full URL.
    #[serde(default)]
    pub github: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub organization: String,
    pub role: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: Vec<String>,
    /// Normalized on record construction.
    #[serde(default)]
    pub skills: BTreeSet<String>,
}

impl ExperienceEntry {
    /// The skill keys this entry is matched on.
    pub fn skill_keys(&self) -> BTreeSet<String> {
        normalize_skills(&self.skills)
    }

    pub fn label(&self) -> String {
        format!("{} at {}", self.role, self.organization)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    /// Display order; kept exactly as declared.
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub description: Vec<String>,
    /// Normalized on record construction.
    #[serde(default)]
    pub skills: BTreeSet<String>,
}

impl ProjectEntry {
    /// Declared skills plus technologies, normalized.
    pub fn skill_keys(&self) -> BTreeSet<String> {
        normalize_skills(self.skills.iter().chain(self.technologies.iter()))
    }

    pub fn label(&self) -> String {
        self.name.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skill inventory
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Ordered category → skills mapping. Insertion order is display order.
///
/// Deserializes from either a JSON object (document order is kept, duplicate
/// keys are kept so validation can reject them) or a list of
/// `{category, skills}` objects. Always serializes as the list form, which
/// survives JSONB key sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillInventory {
    categories: Vec<SkillCategory>,
}

impl SkillInventory {
    pub fn new(categories: Vec<SkillCategory>) -> Self {
        Self { categories }
    }

    pub fn from_pairs<I, C, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, Vec<S>)>,
        C: Into<String>,
        S: Into<String>,
    {
        Self {
            categories: pairs
                .into_iter()
                .map(|(category, skills)| SkillCategory {
                    category: category.into(),
                    skills: skills.into_iter().map(Into::into).collect(),
                })
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Case-insensitive category lookup.
    pub fn get(&self, category: &str) -> Option<&[String]> {
        let key = normalize_skill(category);
        self.categories
            .iter()
            .find(|c| normalize_skill(&c.category) == key)
            .map(|c| c.skills.as_slice())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for (index, category) in self.categories.iter().enumerate() {
            let key = normalize_skill(&category.category);
            if key.is_empty() {
                return Err(ValidationError::BlankSkillCategory { index });
            }
            if !seen.insert(key) {
                return Err(ValidationError::DuplicateSkillCategory(
                    category.category.trim().to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for SkillInventory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InventoryVisitor;

        impl<'de> Visitor<'de> for InventoryVisitor {
            type Value = SkillInventory;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category to skills or a list of {category, skills}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut categories = Vec::new();
                while let Some((category, skills)) = map.next_entry::<String, Vec<String>>()? {
                    categories.push(SkillCategory { category, skills });
                }
                Ok(SkillInventory { categories })
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut categories = Vec::new();
                while let Some(category) = seq.next_element::<SkillCategory>()? {
                    categories.push(category);
                }
                Ok(SkillInventory { categories })
            }
        }

        deserializer.deserialize_any(InventoryVisitor)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume record
// ────────────────────────────────────────────────────────────────────────────

/// Unvalidated wire shape of a resume record. All lists are required;
/// a missing or `null` list is a caller defect and fails deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct ResumeRecordInput {
    pub identity: Identity,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: SkillInventory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ResumeRecordInput")]
pub struct ResumeRecord {
    identity: Identity,
    education: Vec<Arc<EducationEntry>>,
    experience: Vec<Arc<ExperienceEntry>>,
    projects: Vec<Arc<ProjectEntry>>,
    skills: SkillInventory,
}

impl ResumeRecord {
    /// Validates every entry and builds the record. Fails on the first problem.
    pub fn new(
        identity: Identity,
        education: Vec<EducationEntry>,
        experience: Vec<ExperienceEntry>,
        projects: Vec<ProjectEntry>,
        skills: SkillInventory,
    ) -> Result<Self, ValidationError> {
        for (index, edu) in education.iter().enumerate() {
            require(&edu.institution, "education", index, "institution")?;
            require(&edu.degree, "education", index, "degree")?;
        }
        for (index, exp) in experience.iter().enumerate() {
            require(&exp.organization, "experience", index, "organization")?;
            require(&exp.role, "experience", index, "role")?;
        }
        for (index, proj) in projects.iter().enumerate() {
            require(&proj.name, "projects", index, "name")?;
        }
        skills.validate()?;

        Ok(Self {
            identity,
            education: education.into_iter().map(Arc::new).collect(),
            experience: experience
                .into_iter()
                .map(|mut exp| {
                    exp.skills = normalize_skills(&exp.skills);
                    Arc::new(exp)
                })
                .collect(),
            projects: projects
                .into_iter()
                .map(|mut proj| {
                    proj.skills = normalize_skills(&proj.skills);
                    Arc::new(proj)
                })
                .collect(),
            skills,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn education(&self) -> &[Arc<EducationEntry>] {
        &self.education
    }

    pub fn experience(&self) -> &[Arc<ExperienceEntry>] {
        &self.experience
    }

    pub fn projects(&self) -> &[Arc<ProjectEntry>] {
        &self.projects
    }

    pub fn skills(&self) -> &SkillInventory {
        &self.skills
    }

    /// Every skill the candidate declares anywhere, normalized, deduplicated,
    /// in first-seen order: skills mapping, experience tags, project tags and
    /// technologies.
    pub fn declared_skills(&self) -> Vec<String> {
        let inventory = self.skills.iter().flat_map(|c| c.skills.iter());
        let experience = self.experience.iter().flat_map(|e| e.skills.iter());
        let projects = self
            .projects
            .iter()
            .flat_map(|p| p.skills.iter().chain(p.technologies.iter()));

        let mut seen = HashSet::new();
        inventory
            .chain(experience)
            .chain(projects)
            .map(|s| normalize_skill(s))
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect()
    }

    /// Builds a record sharing this record's identity, education and skills
    /// with the given (already validated) entries.
    pub(crate) fn with_entries(
        &self,
        experience: Vec<Arc<ExperienceEntry>>,
        projects: Vec<Arc<ProjectEntry>>,
    ) -> Self {
        Self {
            identity: self.identity.clone(),
            education: self.education.clone(),
            experience,
            projects,
            skills: self.skills.clone(),
        }
    }
}

impl TryFrom<ResumeRecordInput> for ResumeRecord {
    type Error = ValidationError;

    fn try_from(input: ResumeRecordInput) -> Result<Self, Self::Error> {
        Self::new(
            input.identity,
            input.education,
            input.experience,
            input.projects,
            input.skills,
        )
    }
}

fn require(
    value: &str,
    section: &'static str,
    index: usize,
    field: &'static str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField {
            section,
            index,
            field,
        })
    } else {
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

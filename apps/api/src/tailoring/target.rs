//! Target context — the job a resume is being tailored for.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::tailoring::models::normalize_skills;

/// Wire shape of a target. `target_skills` is required but may be empty.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetContextInput {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub job_description: Option<String>,
    pub target_skills: Vec<String>,
}

/// A company/role pair with its required skills, held as normalized keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TargetContextInput")]
pub struct TargetContext {
    pub company: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    target_skills: BTreeSet<String>,
}

impl TargetContext {
    pub fn new<I, S>(
        company: impl Into<String>,
        role: impl Into<String>,
        job_description: Option<String>,
        target_skills: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            company: company.into(),
            role: role.into(),
            job_description: job_description.filter(|d| !d.trim().is_empty()),
            target_skills: normalize_skills(target_skills),
        }
    }

    /// Lowercase, whitespace-collapsed skill keys.
    pub fn target_skills(&self) -> &BTreeSet<String> {
        &self.target_skills
    }
}

impl From<TargetContextInput> for TargetContext {
    fn from(input: TargetContextInput) -> Self {
        Self::new(
            input.company,
            input.role,
            input.job_description,
            input.target_skills,
        )
    }
}

//! Skill Matcher — measures how much of a target skill set a resume covers.
//!
//! Two evidence modes:
//! - `Text`: a target skill is covered if it occurs (case-insensitively) anywhere in the text.
//! - `Skills`: a target skill is covered by an exact declared skill, or failing that by
//!   the closest declared skill whose bigram similarity reaches the fuzzy threshold.
//!
//! Fuzzy matching compares individual skill tokens only. It catches spelling and
//! suffix variants ("postgres" / "postgresql"), never synonyms ("js" / "javascript").

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tailoring::models::{normalize_skill, ResumeRecord};
use crate::tailoring::target::TargetContext;

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.6;

/// Skills shorter than this never take part in fuzzy matching.
const MIN_FUZZY_CHARS: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// What the resume side of a match is made of.
#[derive(Debug, Clone, Copy)]
pub enum ResumeEvidence<'a> {
    Text(&'a str),
    /// Normalized declared skills, see `ResumeRecord::declared_skills`.
    Skills(&'a [String]),
}

/// A target skill that was only covered by a lexically close declared skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearMatch {
    pub target_skill: String,
    pub resume_skill: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// `coverage_ratio * 100`, two decimals.
    pub score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub near_matches: Vec<NearMatch>,
    /// matched / total target skills; 0 for an empty target set.
    pub coverage_ratio: f64,
}

impl MatchResult {
    fn empty() -> Self {
        Self {
            score: 0.0,
            matched_skills: vec![],
            missing_skills: vec![],
            near_matches: vec![],
            coverage_ratio: 0.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Matcher
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillMatcher {
    fuzzy_threshold: f64,
}

impl Default for SkillMatcher {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl SkillMatcher {
    /// Threshold is clamped into `0.0..=1.0`.
    pub fn new(fuzzy_threshold: f64) -> Self {
        Self {
            fuzzy_threshold: fuzzy_threshold.clamp(0.0, 1.0),
        }
    }

    pub fn fuzzy_threshold(&self) -> f64 {
        self.fuzzy_threshold
    }

    /// Scores a record's declared skills against the target (structured mode).
    pub fn score_record(&self, resume: &ResumeRecord, target: &TargetContext) -> MatchResult {
        let declared = resume.declared_skills();
        self.score(ResumeEvidence::Skills(&declared), target.target_skills())
    }

    /// Scores raw resume text against the target (substring mode).
    pub fn score_text(&self, text: &str, target_skills: &BTreeSet<String>) -> MatchResult {
        self.score(ResumeEvidence::Text(text), target_skills)
    }

    pub fn score(
        &self,
        evidence: ResumeEvidence<'_>,
        target_skills: &BTreeSet<String>,
    ) -> MatchResult {
        if target_skills.is_empty() {
            return MatchResult::empty();
        }

        let mut matched = Vec::new();
        let mut missing = Vec::new();
        let mut near_matches = Vec::new();

        match evidence {
            ResumeEvidence::Text(text) => {
                let haystack = normalize_skill(text);
                for skill in target_skills {
                    let key = normalize_skill(skill);
                    if haystack.contains(&key) {
                        matched.push(key);
                    } else {
                        missing.push(key);
                    }
                }
            }
            ResumeEvidence::Skills(declared) => {
                let exact: HashSet<&str> = declared.iter().map(String::as_str).collect();
                for skill in target_skills {
                    let key = normalize_skill(skill);
                    if exact.contains(key.as_str()) {
                        matched.push(key);
                    } else if let Some(near) = self.closest(&key, declared) {
                        matched.push(key);
                        near_matches.push(near);
                    } else {
                        missing.push(key);
                    }
                }
            }
        }

        let coverage_ratio = matched.len() as f64 / target_skills.len() as f64;
        let score = round2(coverage_ratio * 100.0);

        debug!(
            "skill match: {}/{} covered ({} near), score {score}",
            matched.len(),
            target_skills.len(),
            near_matches.len()
        );

        MatchResult {
            score,
            matched_skills: matched,
            missing_skills: missing,
            near_matches,
            coverage_ratio,
        }
    }

    /// Best declared skill at or above the threshold. Ties keep the earliest declared.
    fn closest(&self, target: &str, declared: &[String]) -> Option<NearMatch> {
        if target.chars().count() < MIN_FUZZY_CHARS {
            return None;
        }

        let mut best: Option<(&String, f64)> = None;
        for candidate in declared {
            if candidate.chars().count() < MIN_FUZZY_CHARS {
                continue;
            }
            let similarity = skill_similarity(target, candidate);
            if similarity < self.fuzzy_threshold {
                continue;
            }
            if best.map_or(true, |(_, s)| similarity > s) {
                best = Some((candidate, similarity));
            }
        }

        best.map(|(candidate, similarity)| NearMatch {
            target_skill: target.to_string(),
            resume_skill: candidate.clone(),
            similarity: round2(similarity),
        })
    }
}

/// Sørensen–Dice similarity over character bigrams of two skill tokens, in `0.0..=1.0`.
pub fn skill_similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(a, b)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

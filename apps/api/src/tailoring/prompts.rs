// LLM prompt constants for the relevance backend.
// Shared output rules live in llm_client::prompts.

/// Role description for relevance judgments. `JSON_ONLY_RULES` is appended at call time.
pub const RELEVANCE_SYSTEM: &str =
    "You are an experienced technical recruiter. \
    Given a candidate's experience and projects and a target job, \
    you decide which entries belong on a resume tailored to that job.";

/// Relevance prompt template. Replace `{company}`, `{role}`, `{target_skills}`,
/// `{job_description}`, `{experience}` and `{projects}` before sending.
pub const RELEVANCE_PROMPT_TEMPLATE: &str = r#"Select the resume entries relevant to this job.

TARGET
Company: {company}
Role: {role}
Required skills: {target_skills}
Job description:
{job_description}

EXPERIENCE (numbered from 0)
{experience}

PROJECTS (numbered from 0)
{projects}

Return a JSON object with this EXACT schema (no extra fields):
{
  "experience": [0, 2],
  "projects": [1]
}

Rules:
- Use the numbers shown above; never renumber.
- An entry is relevant when its work or technologies would matter to someone hiring for this role.
- Keep every entry that is relevant; leave a list empty if nothing in that section is relevant."#;

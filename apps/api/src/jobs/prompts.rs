// LLM prompt constants for job extraction.
// Shared output rules live in llm_client::prompts.

/// Role description for extraction. `JSON_ONLY_RULES` and `NO_INVENTION_RULE`
/// are appended at call time.
pub const EXTRACT_JOBS_SYSTEM: &str =
    "You extract job postings from text scraped from a company's careers page.";

/// Extraction prompt template. Replace `{page_text}` before sending.
pub const EXTRACT_JOBS_PROMPT_TEMPLATE: &str = r#"### SCRAPED TEXT FROM WEBSITE:
{page_text}

### INSTRUCTION:
Extract every job posting in the text above and return them as a JSON array.
Each posting is an object with these keys:
{
  "role": "Backend Engineer",
  "experience": "3+ years",
  "skills": ["Rust", "PostgreSQL"],
  "description": "Build and operate the billing platform."
}

Rules:
- "skills" lists individual technologies or competencies, one per string.
- "experience" is null when the posting does not state it.
- Return [] if the text contains no job postings."#;

/// Role description for application emails. `NO_INVENTION_RULE` and
/// `JSON_ONLY_RULES` are appended at call time.
pub const EMAIL_SYSTEM: &str =
    "You write short, professional job-application emails in the candidate's own voice.";

/// Email prompt template. Fill `{candidate_name}`, `{company}`, `{role}`,
/// `{job_description}`, `{highlights}` and `{links}` before sending.
pub const EMAIL_PROMPT_TEMPLATE: &str = r#"### CANDIDATE
Name: {candidate_name}
Relevant skills and experience:
{highlights}

### TARGET
Company: {company}
Role: {role}
Job description:
{job_description}

### PORTFOLIO LINKS
{links}

### INSTRUCTION:
Write an application email from the candidate to the hiring contact at the company.
Return a JSON object with this EXACT schema (no extra fields):
{
  "subject": "Application for Backend Engineer",
  "body": "Dear Hiring Team, ..."
}

Rules:
- Write in the first person, as the candidate.
- State interest in the role and why the candidate fits it in one or two sentences.
- Mention one or two of the listed skills or experiences that match the role.
- Include the portfolio links in one short line; omit the line if there are none.
- End with a polite request for next steps or interview availability.
- Keep the body between 4 and 7 sentences, with no sign-off beyond the candidate's name."#;

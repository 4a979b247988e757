// Job extraction (careers-page text to job postings and tailoring targets)
// and application email drafting. All LLM calls go through llm_client.

pub mod email;
pub mod extractor;
pub mod handlers;
pub mod prompts;

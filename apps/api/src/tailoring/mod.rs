// Resume tailoring engine.
// Pure core: models, target, matcher, selector, latex, assembler.
// Service edges: relevance backends, pipeline, handlers.
// All LLM calls go through llm_client.

pub mod assembler;
pub mod handlers;
pub mod latex;
pub mod matcher;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod relevance;
pub mod selector;
pub mod target;

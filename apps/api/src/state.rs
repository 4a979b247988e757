use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::compiler::LatexCompiler;
use crate::tailoring::matcher::SkillMatcher;
use crate::tailoring::relevance::RelevanceSelector;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    /// Pluggable relevance backend. Default: SkillOverlapSelector. Swap via RELEVANCE_BACKEND.
    pub relevance_selector: Arc<dyn RelevanceSelector>,
    /// Fuzzy threshold from FUZZY_MATCH_THRESHOLD.
    pub matcher: SkillMatcher,
    pub compiler: LatexCompiler,
}

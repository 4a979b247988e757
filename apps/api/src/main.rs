mod config;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod render;
mod routes;
mod sources;
mod state;
mod tailoring;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, RelevanceBackend};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::render::compiler::LatexCompiler;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tailoring::matcher::SkillMatcher;
use crate::tailoring::relevance::{LlmRelevanceSelector, RelevanceSelector, SkillOverlapSelector};

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: startup fails on missing or malformed env vars
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume tailor v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_model.clone())
        .context("failed to build LLM HTTP client")?;
    info!("LLM client initialized (model: {})", llm.model());

    let relevance_selector: Arc<dyn RelevanceSelector> = match config.relevance_backend {
        RelevanceBackend::Skills => Arc::new(SkillOverlapSelector),
        RelevanceBackend::Llm => Arc::new(LlmRelevanceSelector(llm.clone())),
    };
    info!("Relevance backend: {}", relevance_selector.backend());

    let matcher = SkillMatcher::new(config.fuzzy_match_threshold);
    let compiler = LatexCompiler::new(config.latex_bin.clone(), config.latex_timeout);
    info!(
        "Fuzzy threshold {}, LaTeX compiler '{}' ({}s timeout)",
        matcher.fuzzy_threshold(),
        config.latex_bin,
        config.latex_timeout.as_secs()
    );

    let state = AppState {
        db,
        s3,
        llm,
        config: config.clone(),
        relevance_selector,
        matcher,
        compiler,
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resume-tailor-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not by subdomain
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}

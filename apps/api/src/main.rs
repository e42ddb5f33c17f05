mod config;
mod document;
mod embedding;
mod errors;
mod extraction;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::openai::OpenAiEmbedder;
use crate::embedding::{EmbeddingProvider, UnconfiguredEmbedder};
use crate::extraction::experience::ExperienceOptions;
use crate::extraction::names::{HttpNameDetector, NoNameDetector, PersonNameDetector};
use crate::extraction::vocabulary::Vocabulary;
use crate::extraction::FieldExtractor;
use crate::routes::build_router;
use crate::scoring::weighting::{BlendStrategy, EqualWeight, Weighted};
use crate::scoring::SimilarityScorer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting matcher v{}", env!("CARGO_PKG_VERSION"));

    let timeout = Duration::from_secs(config.embedding_timeout_secs);

    // Vocabulary: built-in unless a JSON override is configured
    let vocabulary = match &config.vocabulary_path {
        Some(path) => {
            let vocabulary = Vocabulary::from_json_file(path)?;
            info!("Vocabulary loaded from {}", path.display());
            vocabulary
        }
        None => Vocabulary::default(),
    };
    info!(
        "Vocabulary: {} skills, {} roles, {} domains",
        vocabulary.skills.len(),
        vocabulary.job_roles.len(),
        vocabulary.domains.len()
    );

    // Name detector fallback (NER service optional)
    let names: Arc<dyn PersonNameDetector> = match &config.ner_endpoint {
        Some(endpoint) => {
            info!("NER name detector: {endpoint}");
            Arc::new(HttpNameDetector::new(endpoint.clone(), timeout)?)
        }
        None => Arc::new(NoNameDetector),
    };

    let extractor = Arc::new(FieldExtractor::new(
        vocabulary,
        names,
        ExperienceOptions {
            month_precision: config.experience_month_precision,
        },
    ));

    // Embedding provider (semantic scores return 503 until configured)
    let provider: Arc<dyn EmbeddingProvider> = match &config.embedding_api_key {
        Some(api_key) => Arc::new(OpenAiEmbedder::new(
            api_key.clone(),
            &config.embedding_base_url,
            config.embedding_model.clone(),
            timeout,
            config.embedding_max_retries,
        )?),
        None => {
            warn!("EMBEDDING_API_KEY not set; semantic scoring is unavailable");
            Arc::new(UnconfiguredEmbedder)
        }
    };
    info!("Embedding provider initialized (model: {})", provider.model());

    let blend: Arc<dyn BlendStrategy> = match config.lexical_weight {
        Some(weight) => Arc::new(Weighted::new(weight)),
        None => Arc::new(EqualWeight),
    };

    let scorer = Arc::new(SimilarityScorer::new(provider, blend, timeout));

    let state = AppState {
        extractor,
        scorer,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

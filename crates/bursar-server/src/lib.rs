//! Bursar Server
//!
//! HTTP boundary for the invoice reimbursement analysis service: multipart
//! batch upload, retrieval-backed chat, and per-dependency health
//! reporting. All analysis logic lives in `bursar-engine`; this crate only
//! wires it to axum.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use bursar_domain::traits::LlmProvider;
use bursar_engine::{AnalysisPipeline, Analyst, ChatEngine};
use bursar_llm::GeminiProvider;
use bursar_store::InvoiceIndex;
use config::ServerConfig;
use handlers::create_router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Shared application state
pub struct AppState<L> {
    /// Batch analysis pipeline
    pub pipeline: Arc<AnalysisPipeline<L>>,
    /// Chat engine with per-conversation history
    pub chat: Arc<ChatEngine<L>>,
    /// Retrieval index, exposed for health reporting
    pub index: Arc<InvoiceIndex>,
    /// Configured model name, for health reporting
    pub model_name: String,
    /// Per-file upload limit in bytes
    pub max_upload_bytes: usize,
}

impl<L> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            chat: Arc::clone(&self.chat),
            index: Arc::clone(&self.index),
            model_name: self.model_name.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

/// Build application state over an arbitrary provider
///
/// The index and conversation table are constructed here, once, and shared
/// by reference - request handlers never touch globals.
pub fn build_state<L>(provider: L, config: &ServerConfig) -> AppState<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let analyst = Arc::new(Analyst::new(provider, config.policy.clone()));
    let index = Arc::new(InvoiceIndex::new());

    AppState {
        pipeline: Arc::new(AnalysisPipeline::new(Arc::clone(&analyst), Arc::clone(&index))),
        chat: Arc::new(ChatEngine::new(analyst, Arc::clone(&index))),
        index,
        model_name: config.model.clone(),
        max_upload_bytes: config.max_upload_bytes(),
    }
}

/// Start the HTTP server
///
/// Reads the API key from the configured environment variable, builds the
/// provider and engine, and serves until shutdown.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Bursar server");
    info!("Bind address: {}", config.bind_addr());
    info!("Model: {}", config.model);
    info!("Upload limit: {} MB", config.max_upload_mb);

    let api_key = config.api_key()?;
    let provider = GeminiProvider::new(api_key, config.model.clone())
        .with_temperature(config.temperature);

    let state = build_state(provider, &config);

    // Dashboard clients are served from other origins.
    let app = create_router(state).layer(CorsLayer::permissive());

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

//! HTTP request handlers for the analysis service.
//!
//! Implements the upload, chat, and health endpoints using axum. Handlers
//! are generic over the provider so tests can drive them with a scripted
//! mock.

use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use bursar_domain::traits::LlmProvider;
use bursar_domain::{AnalysisResponse, ChatRequest, ChatResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Root endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service banner
    pub message: String,
    /// Liveness indicator
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Health check response, one status line per sub-dependency
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall status
    pub status: String,
    /// Per-service statuses
    pub services: ServiceStatuses,
    /// Documents currently held by the index
    pub indexed_documents: usize,
}

/// Status of each sub-dependency
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatuses {
    /// Retrieval index
    pub document_index: String,
    /// Text-generation provider
    pub llm_provider: String,
    /// Document extraction chain
    pub extraction: String,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The request was malformed (missing field, wrong file type, too large)
    BadRequest(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

/// GET / - service banner
async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Bursar Invoice Reimbursement Service".to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /analyze-invoices - analyze an uploaded invoice batch
///
/// Multipart form: `policy_file` (PDF), `invoices_zip` (ZIP),
/// `employee_name` (text). The policy bytes are decoded lossily - an odd
/// encoding is tolerated, a missing part is not.
async fn analyze_invoices<L>(
    State(state): State<AppState<L>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let mut policy: Option<(String, Vec<u8>)> = None;
    let mut invoices: Option<(String, Vec<u8>)> = None;
    let mut employee_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "policy_file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read policy_file: {}", e)))?;
                policy = Some((filename, bytes.to_vec()));
            }
            "invoices_zip" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read invoices_zip: {}", e)))?;
                invoices = Some((filename, bytes.to_vec()));
            }
            "employee_name" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read employee_name: {}", e)))?;
                employee_name = Some(text);
            }
            _ => {}
        }
    }

    let (policy_filename, policy_bytes) =
        policy.ok_or_else(|| AppError::BadRequest("Missing field: policy_file".to_string()))?;
    let (invoices_filename, invoices_bytes) =
        invoices.ok_or_else(|| AppError::BadRequest("Missing field: invoices_zip".to_string()))?;
    let employee_name = employee_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing field: employee_name".to_string()))?;

    if !policy_filename.to_lowercase().ends_with(".pdf") {
        return Err(AppError::BadRequest("Policy file must be PDF".to_string()));
    }
    if !invoices_filename.to_lowercase().ends_with(".zip") {
        return Err(AppError::BadRequest("Invoices must be ZIP file".to_string()));
    }
    let limit = state.max_upload_bytes;
    if policy_bytes.len() > limit || invoices_bytes.len() > limit {
        return Err(AppError::BadRequest(format!(
            "Upload exceeds the {} MB limit",
            limit / (1024 * 1024)
        )));
    }

    info!("Analysis request for: {}", employee_name);

    let policy_text = String::from_utf8_lossy(&policy_bytes);
    let response = state
        .pipeline
        .process_batch(&policy_text, &invoices_bytes, &employee_name)
        .await;

    Ok(Json(response))
}

/// POST /chat - answer a query over analyzed invoices
async fn chat<L>(
    State(state): State<AppState<L>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let response = state.chat.respond(&request.query, request.conversation_id).await;
    Json(response)
}

/// GET /health - per-dependency health report
async fn health_check<L>(State(state): State<AppState<L>>) -> Json<HealthCheckResponse> {
    let indexed_documents = state.index.len();

    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        services: ServiceStatuses {
            document_index: "operational".to_string(),
            llm_provider: format!("configured ({})", state.model_name),
            extraction: "operational".to_string(),
        },
        indexed_documents,
    })
}

/// Create the axum router with all routes
pub fn create_router<L>(state: AppState<L>) -> Router
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    // Double the per-file cap to leave headroom for multipart framing.
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes.saturating_mul(2));

    Router::new()
        .route("/", get(root))
        .route("/analyze-invoices", post(analyze_invoices::<L>))
        .route("/chat", post(chat::<L>))
        .route("/health", get(health_check::<L>))
        .layer(body_limit)
        .with_state(state)
}

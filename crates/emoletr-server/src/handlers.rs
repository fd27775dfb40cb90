//! HTTP request handlers for the analysis service.
//!
//! Implements the analyze, health and public-config endpoints using axum.

use crate::config::{ServerConfig, MAX_FILE_SIZE_MB};
use crate::upload::TempUpload;
use axum::{
    extract::{
        multipart::MultipartError, rejection::JsonRejection, DefaultBodyLimit, FromRequest,
        Multipart, Request, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use chrono::Utc;
use emoletr_analyzer::{
    document, AnalysisResult, Analyzer, AnalyzerError, DocumentKind, ExtractionError,
    ALLOWED_EXTENSIONS,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

const NO_TEXT: &str = "No text provided for analysis";
const NO_FILE_SELECTED: &str = "No file selected";
const FILE_TYPE_NOT_ALLOWED: &str = "File type not allowed. Only .txt and .pdf files are supported";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Startup configuration
    pub config: Arc<ServerConfig>,
    /// Emotion analyzer wrapping the completion provider
    pub analyzer: Arc<Analyzer>,
}

/// JSON body of a text analysis request
#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    /// Text to analyze
    #[serde(default)]
    pub text: Option<String>,
}

/// Successful analysis response
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Always true
    pub success: bool,
    /// Length of the analyzed text in characters
    pub text_length: usize,
    /// RFC 3339 timestamp of the analysis
    pub analyzed_at: String,
    /// The emotion analysis
    pub analysis: AnalysisResult,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Whether a completion credential is configured
    pub api_configured: bool,
    /// Model used for analysis
    pub model: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Public configuration response
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigResponse {
    /// Upload size limit in megabytes
    pub max_file_size_mb: usize,
    /// Accepted upload extensions
    pub allowed_extensions: Vec<String>,
    /// Whether analysis is currently possible
    pub api_available: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Error response for a missing credential
#[derive(Debug, Serialize)]
pub struct NotConfiguredResponse {
    /// Error message
    pub error: String,
    /// Remediation hint
    pub message: String,
}

/// Error response for failed analyses
#[derive(Debug, Serialize)]
pub struct FailureResponse {
    /// Always false
    pub success: bool,
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Missing or invalid input
    BadRequest(String),
    /// Multipart body could not be read (including size limit)
    Upload(MultipartError),
    /// Request body exceeds the upload limit
    PayloadTooLarge(String),
    /// No completion credential configured
    NotConfigured,
    /// Extraction or provider failure
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
            }
            AppError::Upload(e) => {
                (e.status(), Json(ErrorResponse { error: e.body_text() })).into_response()
            }
            AppError::PayloadTooLarge(message) => {
                (StatusCode::PAYLOAD_TOO_LARGE, Json(ErrorResponse { error: message })).into_response()
            }
            AppError::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(NotConfiguredResponse {
                    error: "LLM API not configured".to_string(),
                    message: "Please set OPENAI_API_KEY in your environment or config file"
                        .to_string(),
                }),
            )
                .into_response(),
            AppError::Internal(message) => {
                error!("Analysis failed: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(FailureResponse {
                        success: false,
                        error: message,
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Upload(e)
    }
}

impl From<AnalyzerError> for AppError {
    fn from(e: AnalyzerError) -> Self {
        if e.is_missing_credential() {
            return AppError::NotConfigured;
        }
        match e {
            AnalyzerError::EmptyText => AppError::BadRequest(NO_TEXT.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// POST /api/analyze - Analyze pasted text or an uploaded document
///
/// Accepts `{"text": "..."}` as JSON, or a multipart form with a `file` field.
async fn analyze(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let text = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        text_from_upload(&state, multipart).await?
    } else {
        match Json::<AnalyzeTextRequest>::from_request(request, &state).await {
            Ok(Json(body)) => body.text,
            Err(rejection) => text_from_rejection(rejection)?,
        }
    };

    let text = text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(NO_TEXT.to_string()))?;

    if !state.analyzer.is_configured() {
        return Err(AppError::NotConfigured);
    }

    let text_length = text.chars().count();
    info!("Analyzing text of {} chars", text_length);

    let analysis = state.analyzer.analyze(&text).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        text_length,
        analyzed_at: Utc::now().to_rfc3339(),
        analysis,
    }))
}

/// A body over the limit is reported as such; any other unusable body counts as no text
fn text_from_rejection(rejection: JsonRejection) -> Result<Option<String>, AppError> {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Err(AppError::PayloadTooLarge(rejection.body_text()));
    }
    debug!("Rejected analyze body: {}", rejection.body_text());
    Ok(None)
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

/// Store the `file` field, extract its text, and remove it again
///
/// Returns `Ok(None)` when the form has no file or the file has no text.
async fn text_from_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<Option<String>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(AppError::BadRequest(NO_FILE_SELECTED.to_string()));
        }
        let kind = DocumentKind::from_filename(&filename)
            .ok_or_else(|| AppError::BadRequest(FILE_TYPE_NOT_ALLOWED.to_string()))?;

        let bytes = field.bytes().await?;
        let upload = TempUpload::persist(&state.config.upload_dir, &filename, &bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;

        let path = upload.path().to_path_buf();
        let extracted = tokio::task::spawn_blocking(move || document::extract(&path, kind))
            .await
            .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))?;
        drop(upload);

        return match extracted {
            Ok(text) => Ok(Some(text)),
            Err(ExtractionError::NoText) => Ok(None),
            Err(e) => Err(AppError::Internal(e.to_string())),
        };
    }

    Ok(None)
}

/// GET /api/health - Liveness and provider status
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        api_configured: state.analyzer.is_configured(),
        model: state.analyzer.model().to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// GET /api/config - Public configuration for clients
async fn public_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        max_file_size_mb: MAX_FILE_SIZE_MB,
        allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        api_available: state.analyzer.is_configured(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let body_limit = state.config.max_upload_bytes();

    AxumRouter::new()
        .route("/api/analyze", post(analyze))
        .route("/api/health", get(health_check))
        .route("/api/config", get(public_config))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

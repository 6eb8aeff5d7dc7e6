//! HTTP endpoint that fills an uploaded template.
//!
//! `POST /data` takes a multipart form with a `template` part (the `.docx`
//! package) and a `replacements` part (a flat JSON object of strings) and
//! answers with the generated document.

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use docfill::{ReplacementMap, RewriteOptions, RewriteReport};
use thiserror::Error;
use tokio::net::TcpListener;

/// MIME type of a Word document.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Listen address
    pub addr: String,
    /// Maximum request body size in bytes
    pub max_upload: usize,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:4222".to_string(),
            max_upload: 5 << 20,
        }
    }
}

/// Request-level failures.
#[derive(Error, Debug)]
enum ApiError {
    #[error("missing form part: {0}")]
    MissingPart(&'static str),

    #[error("{0}")]
    Multipart(#[from] MultipartError),

    #[error("invalid replacements: {0}")]
    InvalidReplacements(docfill::Error),

    #[error("invalid template: {0}")]
    InvalidTemplate(docfill::Error),

    #[error("template is not a Word document")]
    NotWordDocument,

    #[error("failed to generate document: {0}")]
    Generate(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Multipart(e) => e.status(),
            ApiError::Generate(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        (status, format!("{}\n", self)).into_response()
    }
}

/// Build the application router.
pub fn router(config: &ServeConfig) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/data", post(generate).fallback(not_a_post))
        .layer(DefaultBodyLimit::max(config.max_upload))
}

/// Bind and serve until interrupted.
pub async fn run(config: ServeConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(&config))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn index() -> &'static str {
    "Hello, there! POST a template and replacements to /data\n"
}

async fn not_a_post() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "That was NOT a post\n")
}

async fn generate(mut multipart: Multipart) -> Result<Response, ApiError> {
    let mut template = None;
    let mut replacements = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("template") => template = Some(field.bytes().await?),
            Some("replacements") => replacements = Some(field.bytes().await?),
            other => tracing::debug!(part = ?other, "ignoring form part"),
        }
    }

    let replacements = replacements.ok_or(ApiError::MissingPart("replacements"))?;
    let replacements =
        docfill::parse_replacements(&replacements).map_err(ApiError::InvalidReplacements)?;
    let template = template.ok_or(ApiError::MissingPart("template"))?;

    let template_len = template.len();
    let (output, report) =
        tokio::task::spawn_blocking(move || fill(template.to_vec(), &replacements))
            .await
            .map_err(|e| ApiError::Generate(e.to_string()))??;

    tracing::info!(
        template_bytes = template_len,
        output_bytes = output.len(),
        resolved = report.resolved,
        unresolved = report.unresolved.len(),
        "generated document"
    );

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"output.docx\"",
            ),
        ],
        output,
    )
        .into_response())
}

fn fill(
    template: Vec<u8>,
    replacements: &ReplacementMap,
) -> Result<(Vec<u8>, RewriteReport), ApiError> {
    let package = docfill::open_package(template).map_err(ApiError::InvalidTemplate)?;
    if !docfill::is_word_document(&package).map_err(ApiError::InvalidTemplate)? {
        return Err(ApiError::NotWordDocument);
    }
    docfill::rewrite_package(&package, replacements, &RewriteOptions::default())
        .map_err(|e| ApiError::Generate(e.to_string()))
}

//
// web.rs
// Dicom-Anonymizer-rs
//
// Axum-based HTTP server exposing the upload-and-anonymize API.
//
// Thales Matheus Mendonça Santos - January 2026

use std::fmt::Display;
use std::net::SocketAddr;

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::anonymize::{self, AnonymizationPolicy};
use crate::archive;
use crate::batch;
use crate::detect;
use crate::workspace::RequestWorkspace;

type ApiResult<T> = Result<T, (StatusCode, String)>;

/// Bootstraps the Axum HTTP server and wires up API routes.
pub async fn start_server(host: &str, port: u16) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/api/anonymize", post(anonymize_handler))
        .layer(DefaultBodyLimit::max(512 * 1024 * 1024))
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!(%addr, "server listening");
    println!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

/// Accepts a multipart upload (field `file`), anonymizes it, and answers with
/// the resulting archive bytes. A `.zip` upload is extracted and processed as
/// a tree; anything else is treated as a single DICOM candidate and rejected
/// with 400 when classification fails.
async fn anonymize_handler(mut multipart: Multipart) -> ApiResult<impl IntoResponse> {
    let mut original_name = None;
    let mut data = None;

    // Find the first part named "file" and pull bytes eagerly.
    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        if field.name() == Some("file") {
            original_name = field.file_name().map(|s| s.to_string());
            data = Some(field.bytes().await.map_err(internal_error)?);
            break;
        }
    }

    let data = data.ok_or((StatusCode::BAD_REQUEST, "No file uploaded".to_string()))?;

    // All scratch state lives in the workspace and is removed when this
    // handler returns, whether the request succeeds or fails.
    let workspace = RequestWorkspace::new().map_err(internal_error)?;
    let staged = workspace
        .stage_upload(original_name.as_deref(), &data)
        .map_err(internal_error)?;

    let policy = AnonymizationPolicy::default();
    let output_root = workspace.output_dir().map_err(internal_error)?;

    let is_zip = staged
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("zip"));

    if is_zip {
        let input_root = workspace.input_dir().map_err(internal_error)?;
        archive::extract(&staged, &input_root).map_err(bad_request)?;

        // Batch mode keeps the identifier empty; per-file failures are
        // reported and the rest of the tree is still delivered.
        let report = batch::process_tree(&input_root, &output_root, "", &policy)
            .map_err(internal_error)?;
        for failure in report.failures() {
            tracing::warn!(
                path = %failure.relative_path.display(),
                error = failure.error.as_deref().unwrap_or(""),
                "entry failed during batch anonymization"
            );
        }
    } else {
        if !detect::is_dicom(&staged) {
            return Err((
                StatusCode::BAD_REQUEST,
                "Uploaded file is not a valid DICOM object".to_string(),
            ));
        }

        let name = staged.file_name().ok_or_else(|| {
            internal_error("staged upload has no file name")
        })?;
        let dest = output_root.join(name);
        if let Err(err) = anonymize::anonymize_file(&staged, &dest, "", &policy) {
            // Validation already passed, so this is a per-file anonymization
            // failure: warn and deliver a best-effort archive.
            tracing::warn!(error = %err, "failed to anonymize upload");
        }
    }

    let archive_path = workspace.archive_path();
    archive::create(&output_root, &archive_path).map_err(internal_error)?;
    let bytes = tokio::fs::read(&archive_path).await.map_err(internal_error)?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/zip"),
            ),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static("attachment; filename=\"anonymized.zip\""),
            ),
        ],
        bytes,
    ))
}

fn bad_request<E: Display>(err: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

fn internal_error<E: Display>(err: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

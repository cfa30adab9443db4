use crate::app::directory::DirectoryService;
use crate::app::import::{ImportSummary, ImportUseCase};
use crate::common::error::{DirectoryError, Result};
use crate::infra::workbook;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use uuid::Uuid;

/// Uploaded spreadsheets are capped at 10 MiB.
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<DirectoryService>,
    pub import: Arc<ImportUseCase>,
    pub uploads_dir: PathBuf,
}

/// Maps the error taxonomy to status-coded JSON responses. Anything
/// outside the taxonomy logs server-side and returns a generic 500.
impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DirectoryError::InvalidRole(_) => (StatusCode::BAD_REQUEST, "Invalid role".to_string()),
            DirectoryError::DuplicateUser => (
                StatusCode::CONFLICT,
                "Email or phone already registered".to_string(),
            ),
            DirectoryError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            DirectoryError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            DirectoryError::ImportFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process spreadsheet".to_string(),
            ),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string()),
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    login_id: String,
    password: String,
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
        .route("/api/upload-excel", post(upload_excel))
        .route("/api/admin/:id/access", get(admin_access))
        .route("/api/teacher/:id/students", get(teacher_students))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    "OK"
}

async fn signup(
    State(state): State<AppState>,
    Json(request): Json<crate::domain::SignupRequest>,
) -> Result<impl IntoResponse> {
    let role = state.directory.signup(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": format!("{role} registered successfully") })),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let user = state
        .directory
        .login(&request.login_id, &request.password)
        .await?;
    Ok(Json(json!({ "message": "Login successful", "user": user })))
}

async fn admin_access(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let resolved = state.directory.admin_access(id).await?;
    Ok(Json(resolved))
}

async fn teacher_students(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let resolved = state.directory.teacher_access(id).await?;
    Ok(Json(resolved))
}

/// Accepts a multipart upload (field "file"), stages it under the uploads
/// directory, runs the import pipeline and reports per-role counts. The
/// staged file is removed on every path, including pipeline failure.
async fn upload_excel(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut file_bytes = None;
    while let Some(field) =
        multipart
            .next_field()
            .await
            .map_err(|e| DirectoryError::ImportFailed {
                message: format!("invalid multipart request: {e}"),
            })?
    {
        if field.name() == Some("file") {
            file_bytes = Some(field.bytes().await.map_err(|e| {
                DirectoryError::ImportFailed {
                    message: format!("failed to read upload: {e}"),
                }
            })?);
        }
    }

    let bytes = file_bytes.ok_or_else(|| DirectoryError::ImportFailed {
        message: "missing multipart field 'file'".to_string(),
    })?;

    fs::create_dir_all(&state.uploads_dir)?;
    let staged = state.uploads_dir.join(format!("{}.xlsx", Uuid::new_v4()));
    fs::write(&staged, &bytes)?;

    let outcome = run_import(&state, &staged).await;
    let _ = fs::remove_file(&staged);
    let summary: ImportSummary = outcome?;

    info!(
        "Spreadsheet processed: {} admins, {} teachers, {} students created",
        summary.admin, summary.teacher, summary.student
    );
    Ok(Json(json!({
        "message": "Spreadsheet processed successfully",
        "summary": summary,
    })))
}

async fn run_import(state: &AppState, staged: &std::path::Path) -> Result<ImportSummary> {
    let rows = workbook::read_rows(staged)?;
    state.import.import_rows(rows).await
}

/// Start the HTTP server
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = app_router(state);
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Directory service listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

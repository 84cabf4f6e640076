//! Local stand-ins for the file-based internal endpoints.
//!
//! `POST /api/submit-form` stores an uploaded image and echoes the form
//! fields; `POST /api/export-data` dumps a JSON record to disk. Both answer
//! 405 for any other method.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;

/// Uploads are validated to 5 MiB client-side; leave room for the form fields.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Error parsing form data")]
    Parse { detail: String },

    #[error("User data is required")]
    MissingUserData,

    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl From<MultipartError> for ServerError {
    fn from(err: MultipartError) -> Self {
        Self::Parse {
            detail: err.body_text(),
        }
    }
}

impl From<MultipartRejection> for ServerError {
    fn from(err: MultipartRejection) -> Self {
        Self::Parse {
            detail: err.body_text(),
        }
    }
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Parse { .. } | Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingUserData => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Message sent to the client. I/O details stay in the log.
    fn public_message(&self) -> String {
        match self {
            Self::Io { .. } => "Failed to save file".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            Self::Parse { detail } => tracing::warn!(%detail, "rejecting form data"),
            Self::Io { .. } => tracing::error!(error = %self, "stub endpoint failed"),
            _ => tracing::debug!(error = %self, "rejecting request"),
        }
        let body = json!({ "error": self.public_message() });
        (self.status_code(), Json(body)).into_response()
    }
}

#[derive(Debug, Clone)]
pub struct StubState {
    upload_dir: Arc<PathBuf>,
    download_dir: Arc<PathBuf>,
}

impl StubState {
    pub fn new(upload_dir: impl Into<PathBuf>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: Arc::new(upload_dir.into()),
            download_dir: Arc::new(download_dir.into()),
        }
    }
}

impl From<&ServerConfig> for StubState {
    fn from(config: &ServerConfig) -> Self {
        Self::new(config.upload_dir.clone(), config.download_dir.clone())
    }
}

pub fn build_router(state: StubState) -> Router {
    Router::new()
        .route(
            "/api/submit-form",
            post(submit_form).fallback(method_not_allowed),
        )
        .route(
            "/api/export-data",
            post(export_data).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

/// Serve the stub endpoints on `config.bind_addr` until `shutdown` resolves.
pub async fn run(
    config: &ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "stub endpoints listening");
    axum::serve(listener, build_router(StubState::from(config)))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}

async fn submit_form(
    State(state): State<StubState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ServerError> {
    let mut multipart = multipart?;
    let mut fields = Map::new();
    for key in ["email", "name", "age", "roll"] {
        fields.insert(key.to_string(), Value::Null);
    }
    let mut image = Value::Null;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await?;
            if let Some(file_name) = file_name.filter(|_| !bytes.is_empty()) {
                let path = store_upload(&state.upload_dir, &file_name, &bytes).await?;
                image = Value::String(path.to_string_lossy().into_owned());
            }
        } else if fields.contains_key(&name) {
            let text = field.text().await?;
            fields.insert(name, Value::String(text));
        } else {
            // Unknown fields are read and dropped
            field.bytes().await?;
        }
    }

    fields.insert("image".to_string(), image);
    tracing::info!(email = %fields["email"], "form submitted");
    Ok(Json(json!({
        "message": "Form submitted successfully",
        "data": fields,
    })))
}

async fn export_data(
    State(state): State<StubState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ServerError> {
    let user_data = match body {
        Ok(Json(body)) => body.get("userData").cloned().unwrap_or(Value::Null),
        Err(rejection) => {
            tracing::debug!(%rejection, "export body is not JSON");
            Value::Null
        }
    };
    if user_data.is_null() {
        return Err(ServerError::MissingUserData);
    }

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let file_name = format!("userData-{}.json", millis);
    let path = state.download_dir.join(&file_name);

    let pretty = serde_json::to_vec_pretty(&user_data).map_err(|e| ServerError::Io {
        path: path.clone(),
        source: e.into(),
    })?;
    write_file(&path, &pretty).await?;

    tracing::info!(path = %path.display(), "user data exported");
    Ok(Json(json!({ "filePath": format!("/downloads/{}", file_name) })))
}

async fn store_upload(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ServerError> {
    let stored_name = format!(
        "{}-{}",
        uuid::Uuid::new_v4(),
        sanitize_filename::sanitize(file_name)
    );
    let path = dir.join(stored_name);
    write_file(&path, bytes).await?;
    Ok(path)
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ServerError> {
    let io_error = |source| ServerError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(path, bytes).await.map_err(io_error)
}

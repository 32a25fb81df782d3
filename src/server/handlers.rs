use axum::Json;
use axum::extract::{Multipart, State};
use axum::response::Html;
use serde_json::{Value, json};

use super::AppState;
use super::error::ApiError;
use crate::batch::{UploadResponse, UploadedFile};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.upload_page.as_ref().clone())
}

/// Map every uploaded file; only files named `*.json` are read
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?;
        files.push(UploadedFile {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    if files.is_empty() {
        return Err(ApiError::BadRequest("no files in upload".to_string()));
    }

    tracing::info!(files = files.len(), "Processing upload");
    let processor = state.processor.clone();
    let response = tokio::task::spawn_blocking(move || processor.process_upload(files))
        .await
        .map_err(|e| anyhow::anyhow!("upload worker failed: {e}"))??;

    Ok(Json(response))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "evalview is running" }))
}

pub async fn info() -> Json<Value> {
    Json(json!({
        "name": crate::PKG_NAME,
        "version": crate::VERSION,
        "description": crate::PKG_DESCRIPTION,
        "features": [
            "multi-model judgement view",
            "aggregate rubric statistics",
            "label distribution",
            "per-document error reporting"
        ]
    }))
}

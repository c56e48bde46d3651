//! Upload route handlers: one per field-policy shape

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::{
    error::Result,
    models::request::ApiResponse,
    upload::{collect_uploads, policy, UploadRequestBody, UploadedFile},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct SingleUpload {
    pub body: UploadRequestBody,
    pub file: Option<UploadedFile>,
}

#[derive(Debug, Serialize)]
pub struct ArrayUpload {
    pub body: UploadRequestBody,
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Serialize)]
pub struct FieldsUpload {
    pub body: UploadRequestBody,
    pub files: BTreeMap<String, Vec<UploadedFile>>,
}

pub async fn upload_single(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let set = collect_uploads(&state.store, policy::SINGLE_IMAGE, multipart).await?;

    let mut files = set.files;
    let file = files.pop();

    if let Some(file) = &file {
        info!(stored_name = %file.stored_name, size_bytes = file.size_bytes, "stored single upload");
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(SingleUpload {
            body: set.body,
            file,
        })),
    ))
}

pub async fn upload_array(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let set = collect_uploads(&state.store, policy::IMAGE_ARRAY, multipart).await?;

    info!(count = set.files.len(), "stored array upload");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ArrayUpload {
            body: set.body,
            files: set.files,
        })),
    ))
}

pub async fn upload_fields(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let set = collect_uploads(&state.store, policy::IMAGE_FIELDS, multipart).await?;

    let mut files: BTreeMap<String, Vec<UploadedFile>> = BTreeMap::new();
    for file in set.files {
        files.entry(file.field_name.clone()).or_default().push(file);
    }

    info!(
        fields = files.len(),
        count = files.values().map(Vec::len).sum::<usize>(),
        "stored fields upload"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(FieldsUpload {
            body: set.body,
            files,
        })),
    ))
}

use std::collections::HashMap;

use axum::extract::multipart::{Field, Multipart};

use crate::error::{AppError, Result};
use super::models::{UploadRequestBody, UploadSet};
use super::policy::{self, FieldPolicy};
use super::storage::UploadStore;

/// Drives a multipart stream to completion under the given field policy.
///
/// Text parts land in the body map (last value wins on repeats). File parts
/// are checked against the policy and the type filter, then streamed to disk.
/// The first violation aborts the request; files already written stay on disk.
pub async fn collect_uploads(
    store: &UploadStore,
    policy: FieldPolicy,
    mut multipart: Multipart,
) -> Result<UploadSet> {
    let mut body = UploadRequestBody::new();
    let mut files = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    while let Some(mut field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();

        let original_name = match field.file_name() {
            Some(name) => name.to_string(),
            None => {
                let value = field.text().await?;
                body.insert(field_name, value);
                continue;
            }
        };

        let limit = policy
            .limit_for(&field_name)
            .ok_or_else(|| AppError::UnexpectedField {
                field: field_name.clone(),
            })?;

        let seen = counts.entry(field_name.clone()).or_insert(0);
        if *seen >= limit.max_count {
            return Err(AppError::TooManyFiles {
                field: field_name,
                max: limit.max_count,
            });
        }
        *seen += 1;

        let mime_type = declared_mime(&field, &original_name);
        if !policy::is_allowed_image(&original_name, &mime_type) {
            return Err(AppError::UnsupportedFileType);
        }

        let mut open = store.begin(&original_name).await?;
        while let Some(chunk) = field.chunk().await? {
            open.write_chunk(&chunk).await?;
        }

        files.push(open.finish(&field_name, &original_name, &mime_type).await?);
    }

    Ok(UploadSet { body, files })
}

/// Declared content type of a part, falling back to a guess from the filename
/// when the client sent none.
fn declared_mime(field: &Field<'_>, original_name: &str) -> String {
    match field.content_type() {
        Some(content_type) if !content_type.is_empty() => content_type.to_string(),
        _ => mime_guess::from_path(original_name)
            .first_raw()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref())
            .to_string(),
    }
}

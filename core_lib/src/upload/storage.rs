use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::UploadConfig;
use crate::error::{AppError, Result};
use super::models::UploadedFile;

/// Disambiguates stored names generated within the same millisecond.
static NAME_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates `img-<millis>-<seq><original extension>`. The sequence counter
/// makes names unique process-wide; there is no existence check on disk.
pub fn stored_name(original_name: &str) -> String {
    let token = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        NAME_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    );

    match std::path::Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) => format!("img-{}.{}", token, ext),
        None => format!("img-{}", token),
    }
}

/// Writes accepted file parts into the destination directory.
#[derive(Clone)]
pub struct UploadStore {
    config: UploadConfig,
}

impl UploadStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub async fn initialize(&self) -> Result<()> {
        if !self.config.destination.exists() {
            fs::create_dir_all(&self.config.destination).await?;
        }
        Ok(())
    }

    /// Opens the destination file for one part. Bytes are streamed in through
    /// the returned handle; a part abandoned mid-stream leaves a partial file
    /// behind, matching the source's behavior.
    pub async fn begin(&self, original_name: &str) -> Result<OpenUpload> {
        let stored_name = stored_name(original_name);
        let path = self.config.destination.join(&stored_name);
        let file = fs::File::create(&path).await?;

        Ok(OpenUpload {
            file,
            stored_name,
            path,
            written: 0,
            max_bytes: self.config.max_file_size_bytes,
        })
    }
}

/// One in-flight file part.
pub struct OpenUpload {
    file: fs::File,
    stored_name: String,
    path: PathBuf,
    written: u64,
    max_bytes: u64,
}

impl OpenUpload {
    /// Appends a chunk, enforcing the cumulative per-part size limit before
    /// the write.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        if self.written + chunk.len() as u64 > self.max_bytes {
            return Err(AppError::FileTooLarge {
                max: self.max_bytes,
            });
        }

        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;

        Ok(())
    }

    pub async fn finish(
        self,
        field_name: &str,
        original_name: &str,
        mime_type: &str,
    ) -> Result<UploadedFile> {
        let OpenUpload {
            file,
            stored_name,
            path,
            written,
            ..
        } = self;

        file.sync_all().await?;

        Ok(UploadedFile {
            field_name: field_name.to_string(),
            original_name: original_name.to_string(),
            stored_name,
            stored_path: path.to_string_lossy().into_owned(),
            mime_type: mime_type.to_string(),
            size_bytes: written,
        })
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for one accepted file part, echoed verbatim in responses.
/// `stored_path` is exposed on purpose; the source API did the same.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub field_name: String,
    pub original_name: String,
    pub stored_name: String,
    pub stored_path: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

/// Non-file form fields, passed through unchanged. Repeated fields keep the
/// last value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadRequestBody(pub HashMap<String, String>);

impl UploadRequestBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, value: String) {
        self.0.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything one request produced: the text fields and the accepted files,
/// in the order the parts arrived.
#[derive(Debug, Default)]
pub struct UploadSet {
    pub body: UploadRequestBody,
    pub files: Vec<UploadedFile>,
}

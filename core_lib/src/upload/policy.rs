use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref ALLOWED_EXTENSIONS: Regex = Regex::new(r"(?i)^(jpe?g|png)$").unwrap();
    static ref ALLOWED_MIME_TYPES: Regex = Regex::new(r"^image/(jpe?g|png)$").unwrap();
}

/// Largest number of file parts any route accepts in a single request
/// (the array route's 5). The request body cap is derived from this.
pub const MAX_FILES_PER_REQUEST: usize = 5;

/// File filter: both the filename extension and the declared MIME type must
/// name an accepted image format. Extensions match case-insensitively.
pub fn is_allowed_image(original_name: &str, mime_type: &str) -> bool {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    ALLOWED_EXTENSIONS.is_match(extension) && ALLOWED_MIME_TYPES.is_match(mime_type)
}

#[derive(Debug, Clone, Copy)]
pub struct FieldLimit {
    pub field: &'static str,
    pub max_count: usize,
}

/// Which form fields a route accepts file parts under, and how many each.
/// File parts under undeclared fields are rejected.
#[derive(Debug, Clone, Copy)]
pub struct FieldPolicy {
    limits: &'static [FieldLimit],
}

impl FieldPolicy {
    pub const fn new(limits: &'static [FieldLimit]) -> Self {
        Self { limits }
    }

    pub fn limit_for(&self, field: &str) -> Option<FieldLimit> {
        self.limits.iter().copied().find(|limit| limit.field == field)
    }
}

/// `POST /api/v1/images/single`: one file under `image`.
pub const SINGLE_IMAGE: FieldPolicy = FieldPolicy::new(&[FieldLimit {
    field: "image",
    max_count: 1,
}]);

/// `POST /api/v1/images/array`: up to 5 files under `images`.
pub const IMAGE_ARRAY: FieldPolicy = FieldPolicy::new(&[FieldLimit {
    field: "images",
    max_count: 5,
}]);

/// `POST /api/v1/images/fields`: up to 3 under `images`, up to 2 under
/// `photos`, independently bounded.
pub const IMAGE_FIELDS: FieldPolicy = FieldPolicy::new(&[
    FieldLimit {
        field: "images",
        max_count: 3,
    },
    FieldLimit {
        field: "photos",
        max_count: 2,
    },
]);

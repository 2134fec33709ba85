//! Client-side upload guard
//!
//! Everything rejected here fails with `ValidationError` and never reaches the
//! network.

use imgflow_client::ErrorEnvelope;
use imgflow_core::domain::operation::Operation;
use imgflow_core::domain::upload::ImageUpload;

/// Upload size ceiling: 32 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 32 * 1024 * 1024;

/// MIME types the service accepts
pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// What the upload guard accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_mime_types: ALLOWED_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl UploadPolicy {
    /// Checks MIME type and size of a candidate upload
    pub fn check_upload(&self, upload: &ImageUpload) -> Result<(), ErrorEnvelope> {
        let mime = upload
            .mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if !self
            .allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&mime))
        {
            return Err(ErrorEnvelope::validation(format!(
                "unsupported file type '{}' (allowed: {})",
                upload.mime_type,
                self.allowed_mime_types.join(", ")
            )));
        }

        if upload.size() > self.max_bytes {
            return Err(ErrorEnvelope::validation(format!(
                "file size {} bytes exceeds the {} byte limit",
                upload.size(),
                self.max_bytes
            )));
        }

        Ok(())
    }

    /// Checks that at least one operation is requested and all are in range
    pub fn check_operations(&self, operations: &[Operation]) -> Result<(), ErrorEnvelope> {
        if operations.is_empty() {
            return Err(ErrorEnvelope::validation(
                "select at least one operation",
            ));
        }

        for (index, operation) in operations.iter().enumerate() {
            operation.validate().map_err(|e| {
                ErrorEnvelope::validation(format!("invalid operation at index {}: {}", index, e))
            })?;
        }

        Ok(())
    }
}

/// Guesses an image MIME type from a file extension
///
/// Returns `None` for extensions the service does not accept.
pub fn mime_type_for_path(path: &std::path::Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

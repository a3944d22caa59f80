//! Object storage for dish and banner images
//!
//! Uploads return a public URL that is stored on the owning document.
//! Deletes are best effort: a failure is logged and never fails the caller.

pub mod local;

pub use local::LocalBlobStore;

use async_trait::async_trait;
use shared::error::{AppError, AppResult, ErrorCode};

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under a key derived from `file_name`, return the public URL
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> AppResult<String>;

    /// Remove the blob behind `url`; failures are logged, not returned
    async fn delete(&self, url: &str);
}

/// Reject empty, oversized or non-image uploads before touching storage
pub fn check_upload(file_name: &str, bytes: &[u8]) -> AppResult<String> {
    if bytes.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if bytes.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::UploadFailed,
            format!("File exceeds {} bytes", MAX_FILE_SIZE),
        ));
    }

    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::new(ErrorCode::UnsupportedFileFormat).with_detail("file", file_name));
    }

    let mime = mime_guess::from_path(file_name).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(AppError::new(ErrorCode::UnsupportedFileFormat).with_detail("file", file_name));
    }
    Ok(ext)
}

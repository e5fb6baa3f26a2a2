pub mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::assessment::{AnalysisResult, ValidationError};

/// Largest document the backend accepts.
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "txt", "doc", "docx"];

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("No analysis backend configured")]
    NotConfigured,

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend returned malformed JSON: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Backend result failed validation: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Unsupported file type: {0} (expected pdf, txt, doc or docx)")]
    UnsupportedType(String),

    #[error("File is {size} bytes, over the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },
}

/// A document queued for analysis.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Accept a document if its extension and size are allowed.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let filename = filename.into();
        let extension = Path::new(&filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(UploadError::UnsupportedType(filename));
        }

        let size = bytes.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            });
        }

        Ok(Self { filename, bytes })
    }

    /// Read a document from disk. Oversized files are rejected from their
    /// metadata, before any of the content is loaded.
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let read_error = |source: std::io::Error| UploadError::Read {
            path: path.display().to_string(),
            source,
        };

        let size = tokio::fs::metadata(path).await.map_err(read_error)?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(read_error)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(filename = %filename, size = bytes.len(), "read upload");
        Self::new(filename, bytes)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Anything that can turn an uploaded document into an analysis result.
/// Implementations must be Send + Sync so the session can race them
/// against the progress loop.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Human-readable name used in logs
    fn name(&self) -> &str;

    /// Analyse the document. The returned result must already pass
    /// `AnalysisResult::validate`.
    async fn analyze(&self, upload: &Upload) -> Result<AnalysisResult, BackendError>;
}

/// Stand-in used when no backend URL is configured; every call fails.
pub struct UnconfiguredBackend;

#[async_trait]
impl AnalysisBackend for UnconfiguredBackend {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn analyze(&self, _upload: &Upload) -> Result<AnalysisResult, BackendError> {
        Err(BackendError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_accepts_known_extensions() {
        for name in ["a.pdf", "b.TXT", "c.doc", "d.Docx"] {
            assert!(Upload::new(name, vec![0; 10]).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_upload_rejects_unknown_extension() {
        assert!(matches!(
            Upload::new("slides.pptx", vec![1]),
            Err(UploadError::UnsupportedType(_))
        ));
        assert!(matches!(
            Upload::new("README", vec![1]),
            Err(UploadError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_upload_size_limit() {
        let at_limit = vec![0u8; MAX_UPLOAD_BYTES as usize];
        assert_eq!(Upload::new("big.pdf", at_limit).unwrap().size(), MAX_UPLOAD_BYTES);

        let over = vec![0u8; MAX_UPLOAD_BYTES as usize + 1];
        assert!(matches!(
            Upload::new("big.pdf", over),
            Err(UploadError::TooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn test_upload_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Road_DPR.txt");
        std::fs::write(&path, b"Detailed project report").unwrap();

        let upload = Upload::from_path(&path).await.unwrap();
        assert_eq!(upload.filename, "Road_DPR.txt");
        assert_eq!(upload.size(), 23);
    }

    #[tokio::test]
    async fn test_oversized_file_rejected_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Huge_DPR.pdf");
        // sparse file: the length is set without writing any content
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(MAX_UPLOAD_BYTES + 1).unwrap();
        drop(file);

        match Upload::from_path(&path).await {
            Err(UploadError::TooLarge { size, limit }) => {
                assert_eq!(size, MAX_UPLOAD_BYTES + 1);
                assert_eq!(limit, MAX_UPLOAD_BYTES);
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");
        assert!(matches!(
            Upload::from_path(&missing).await,
            Err(UploadError::Read { .. })
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_backend_fails() {
        let upload = Upload::new("a.pdf", vec![1]).unwrap();
        assert!(matches!(
            UnconfiguredBackend.analyze(&upload).await,
            Err(BackendError::NotConfigured)
        ));
    }
}

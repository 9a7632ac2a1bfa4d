use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// API error type
///
/// This is the error taxonomy surfaced to collaborators (HTTP frontends,
/// the CLI). Catalog and storage errors are folded into it; no failure is
/// retried anywhere, every failure is reported once to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid layout: stripe count {requested} exceeds {available} targets")]
    InvalidLayout { requested: u32, available: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Reassembly mismatch: expected {expected} bytes, got {actual}")]
    ReassemblyMismatch { expected: u64, actual: u64 },

    #[error("Catalog error: {0}")]
    Catalog(CatalogError),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(what) => ApiError::NotFound(what),
            CatalogError::AlreadyExists(what) => ApiError::AlreadyExists(what),
            CatalogError::NotADirectory(what) => ApiError::NotADirectory(what),
            CatalogError::InvalidPath(what) => ApiError::InvalidPath(what),
            other => ApiError::Catalog(other),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

//! Error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::model::FailureCode;

#[derive(Debug, Error)]
pub enum FormDataError {
    #[error("no base directory known for application '{application_id}'")]
    PathUnresolved { application_id: String },

    #[error("form file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied reading {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{} is {size} bytes, limit is {limit}", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("{} contains invalid UTF-8", path.display())]
    InvalidEncoding { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown form id: {0}")]
    UnknownForm(String),

    #[error("form cache is already initialized")]
    AlreadyInitialized,
}

impl FormDataError {
    /// Map an I/O error on `path` to the matching variant
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => FormDataError::NotFound { path },
            io::ErrorKind::PermissionDenied => FormDataError::PermissionDenied { path },
            io::ErrorKind::InvalidData => FormDataError::InvalidEncoding { path },
            _ => FormDataError::Io { path, source },
        }
    }

    /// Report code for load failures, `None` for API misuse errors
    pub fn failure_code(&self) -> Option<FailureCode> {
        match self {
            FormDataError::PathUnresolved { .. } => Some(FailureCode::PathUnresolved),
            FormDataError::NotFound { .. } => Some(FailureCode::FileNotFound),
            FormDataError::PermissionDenied { .. } => Some(FailureCode::PermissionDenied),
            FormDataError::TooLarge { .. } => Some(FailureCode::FileTooLarge),
            FormDataError::InvalidEncoding { .. } => Some(FailureCode::InvalidEncoding),
            FormDataError::Io { .. } => Some(FailureCode::ReadFailed),
            FormDataError::UnknownForm(_) | FormDataError::AlreadyInitialized => None,
        }
    }
}

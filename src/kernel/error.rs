use std::fmt;

use crate::models::FileTreeError;

/// Failure reported by the command surface. Always recoverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIoError {
    pub op: &'static str,
    pub message: String,
}

impl ExternalIoError {
    pub fn new(op: &'static str, message: impl Into<String>) -> Self {
        Self {
            op,
            message: message.into(),
        }
    }

    pub fn from_io(op: &'static str, err: &std::io::Error) -> Self {
        Self::new(op, err.to_string())
    }
}

impl fmt::Display for ExternalIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.op, self.message)
    }
}

impl std::error::Error for ExternalIoError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    NotFound(String),
    InvalidOperation(String),
    ExternalIo(ExternalIoError),
}

impl WorkspaceError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidOperation(reason.into())
    }
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceError::NotFound(id) => write!(f, "not found: {id}"),
            WorkspaceError::InvalidOperation(reason) => write!(f, "invalid operation: {reason}"),
            WorkspaceError::ExternalIo(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for WorkspaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkspaceError::ExternalIo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ExternalIoError> for WorkspaceError {
    fn from(err: ExternalIoError) -> Self {
        Self::ExternalIo(err)
    }
}

impl From<FileTreeError> for WorkspaceError {
    fn from(err: FileTreeError) -> Self {
        match err {
            FileTreeError::NotFound(id) | FileTreeError::ParentNotFolder(id) => Self::NotFound(id),
            other => Self::InvalidOperation(other.to_string()),
        }
    }
}

//! Error types for grid mock server operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using GridError.
pub type GridResult<T> = Result<T, GridError>;

/// Primary error type for enrichment and serving.
#[derive(Debug, Error)]
pub enum GridError {
    // === Request Errors ===
    #[error("Invalid path segment '{segment}': {message}")]
    InvalidSegment { segment: String, message: String },

    // === Template Errors ===
    #[error("Failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template {path} is not valid JSON: {source}")]
    TemplateParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    // === Output Errors ===
    #[error("Failed to write snapshot {path}: {message}")]
    SnapshotWrite { path: PathBuf, message: String },

    // === Configuration Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl GridError {
    /// Short machine-readable code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            GridError::InvalidSegment { .. } => "InvalidPathSegment",
            GridError::TemplateRead { .. } => "TemplateUnavailable",
            GridError::TemplateParse { .. } | GridError::MalformedTemplate(_) => {
                "MalformedTemplate"
            }
            GridError::SnapshotWrite { .. } => "SnapshotWriteFailed",
            GridError::InvalidConfig(_) => "InvalidConfiguration",
            GridError::InternalError(_) => "InternalError",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            GridError::InvalidSegment { .. } => 400,
            _ => 500,
        }
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::InternalError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_segment_is_client_error() {
        let err = GridError::InvalidSegment {
            segment: "..".to_string(),
            message: "not allowed".to_string(),
        };
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.code(), "InvalidPathSegment");
    }

    #[test]
    fn test_template_and_write_failures_are_server_errors() {
        let read = GridError::TemplateRead {
            path: PathBuf::from("public/v6/details/hourly/DE.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let write = GridError::SnapshotWrite {
            path: PathBuf::from("out.json"),
            message: "read-only filesystem".to_string(),
        };
        assert_eq!(read.http_status_code(), 500);
        assert_eq!(write.http_status_code(), 500);
        assert!(read.to_string().contains("DE.json"));
    }
}

//! Error types
//!
//! [`Error`] covers everything a run can fail with. [`LibXml2Error`] stays
//! inside the FFI layer and converts into [`Error`] at the module boundary,
//! where a well-formedness failure keeps its position.

use std::path::PathBuf;

use thiserror::Error;

/// Main application error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum Error {
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status error: {status} for {url} - {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Request timeout: {url} after {timeout_seconds} seconds")]
    Timeout { url: String, timeout_seconds: u64 },

    #[error("Local document not readable: {path} - {source}")]
    LocalRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid document locator: {locator}")]
    InvalidLocator { locator: String },

    #[error("{message}")]
    MalformedXml {
        message: String,
        line: i32,
        column: i32,
    },

    #[error("Schema parsing error: {url} - {details}")]
    SchemaParsing { url: String, details: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("LibXML2 internal error: {details}")]
    LibXml2Internal { details: String },
}

impl Error {
    /// Whether the error came from retrieving a document rather than reading it
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::HttpStatus { .. }
                | Error::Timeout { .. }
                | Error::LocalRead { .. }
                | Error::InvalidLocator { .. }
        )
    }
}

/// LibXML2-specific error types
#[derive(Error, Debug)]
pub enum LibXml2Error {
    #[error("Schema parsing failed: {details}")]
    SchemaParseFailed { details: String },

    #[error("Validation context creation failed")]
    ValidationContextCreationFailed,

    #[error("Parser context creation failed")]
    ParserContextCreationFailed,

    #[error("Document too large for libxml2: {size} bytes")]
    DocumentTooLarge { size: usize },

    #[error("{message}")]
    NotWellFormed {
        message: String,
        line: i32,
        column: i32,
    },
}

impl From<LibXml2Error> for Error {
    fn from(err: LibXml2Error) -> Self {
        match err {
            LibXml2Error::NotWellFormed {
                message,
                line,
                column,
            } => Error::MalformedXml {
                message,
                line,
                column,
            },
            other => Error::LibXml2Internal {
                details: other.to_string(),
            },
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

/// LibXML2 result type alias
pub type LibXml2Result<T> = std::result::Result<T, LibXml2Error>;

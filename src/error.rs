//! Error types for the azurefileshare application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    #[error("Invalid credential: {0}")]
    Credential(String),

    // Remote errors
    #[error("Azure Files returned HTTP {status} ({code}) for {url}")]
    Api {
        status: u16,
        code: String,
        url: String,
    },

    #[error("Failed to list directory {path}: {source}")]
    Listing {
        path: String,
        #[source]
        source: Box<Error>,
    },

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Retry budget exhausted after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("Download task aborted: {0}")]
    TaskAborted(String),

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Whether a failed transfer may succeed when the request is re-issued.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_body() || e.is_request(),
            Error::Api { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            Error::Download(_) | Error::Io(_) => true,
            _ => false,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_FILES_FAILED: i32 = 6;
}

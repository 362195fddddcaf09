//! Error handling module for the availability collector.
//!
//! Provides a single error type shared by the store, the normalizer and the adapters.

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INVALID_RECORD: &str = "INVALID_RECORD";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const IO_ERROR: &str = "IO_ERROR";
    pub const JSON_ERROR: &str = "JSON_ERROR";
    pub const HTTP_ERROR: &str = "HTTP_ERROR";
    pub const EXPORT_ERROR: &str = "EXPORT_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Unknown team (or other entity) requested from the store
    NotFound(String),
    /// Raw record is missing something the normalizer needs
    InvalidRecord(String),
    /// Bad configuration or command line input
    Config(String),
    /// File system error
    Io(String),
    /// JSON parse/serialize error
    Json(String),
    /// Remote API error (Spond or Google Sheets)
    Http(String),
    /// Spreadsheet rendering error
    Export(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::InvalidRecord(_) => codes::INVALID_RECORD,
            AppError::Config(_) => codes::CONFIG_ERROR,
            AppError::Io(_) => codes::IO_ERROR,
            AppError::Json(_) => codes::JSON_ERROR,
            AppError::Http(_) => codes::HTTP_ERROR,
            AppError::Export(_) => codes::EXPORT_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::InvalidRecord(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
            AppError::Io(msg) => msg.clone(),
            AppError::Json(msg) => msg.clone(),
            AppError::Http(msg) => msg.clone(),
            AppError::Export(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {:?}", err);
        AppError::Io(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Json(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("HTTP error: {:?}", err);
        AppError::Http(format!("HTTP error: {}", err))
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Config(format!("Invalid pattern: {}", err))
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        tracing::error!("Workbook error: {:?}", err);
        AppError::Export(format!("Workbook error: {}", err))
    }
}

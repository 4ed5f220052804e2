use thiserror::Error;

/// Convenience result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Error type shared across configuration loading, record input, and the
/// pipeline driver.
///
/// Record-level absence (a missing field, a missing address) is never an
/// error: absence is resolved to skip-record or render-sentinel per the
/// filter/projection contracts. These variants cover real failures only.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Underlying I/O error on the input or output stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a config file or NDJSON input.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A report configuration is internally inconsistent (e.g. header column
    /// count differs from projection column count).
    #[error("invalid report config: {message}")]
    Config { message: String },

    /// A decoded input value could not be mapped to a typed field value.
    #[error("invalid value for field '{field}' at line {line}: {message}")]
    InvalidField {
        line: usize,
        field: String,
        message: String,
    },

    /// No built-in report variant with the requested name.
    #[error("unknown report '{name}' (use one of: {available})")]
    UnknownReport { name: String, available: String },
}

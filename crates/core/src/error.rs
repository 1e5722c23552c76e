use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DiagError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown diagnostic type: {0}")]
    UnknownDiagnosticType(String),
    #[error("field '{field}' does not belong to diagnostic type '{diagnostic_type}'")]
    UnknownField {
        diagnostic_type: String,
        field: String,
    },
    #[error("unknown simulated fault: {0}")]
    UnknownFault(String),
    #[error("value for '{field}' is not a number: {raw:?}")]
    InvalidNumber { field: String, raw: String },
    #[error("fields for '{diagnostic_type}' do not match the schema: missing={missing:?} unexpected={unexpected:?}")]
    FieldMismatch {
        diagnostic_type: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    #[error("a diagnose request is already in flight")]
    SubmitInFlight,
    #[error("cannot submit while fields are invalid: {0:?}")]
    InvalidFields(Vec<String>),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

pub type DiagResult<T> = std::result::Result<T, DiagError>;

/// Why a diagnose request did not produce a result.
///
/// Carried inside submission outcomes, so it is cheap to clone and compare.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnoseFailure {
    #[error("request to diagnose endpoint failed: {0}")]
    Transport(String),
    #[error("diagnose endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode diagnosis result: {0}")]
    Decode(String),
    #[error("diagnose request timed out after {0:?}")]
    Timeout(Duration),
}

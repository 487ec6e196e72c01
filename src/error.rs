//! Error types for the Crebain examples

use thiserror::Error;

/// Result type alias for Crebain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl Error {
    /// The remote API error behind this error, if there is one.
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Error::Api(ApiError::Remote(remote)) => Some(remote),
            _ => None,
        }
    }
}

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Invalid API request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Error category, derived from the error code and falling back to the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    RateLimited,
    Internal,
    Other,
}

impl ErrorKind {
    /// Classify an error envelope.
    ///
    /// Known codes win; unknown codes are classified by status.
    pub fn classify(code: &str, status: u16) -> Self {
        match code {
            "UNAUTHORIZED" | "API_KEY_REVOKED" | "API_KEY_EXPIRED" => ErrorKind::Unauthorized,
            "FORBIDDEN" => ErrorKind::Forbidden,
            "NOT_FOUND" => ErrorKind::NotFound,
            "CONFLICT" => ErrorKind::Conflict,
            "VALIDATION_ERROR" => ErrorKind::Validation,
            "RATE_LIMITED" => ErrorKind::RateLimited,
            "INTERNAL" => ErrorKind::Internal,
            _ => match status {
                401 => ErrorKind::Unauthorized,
                403 => ErrorKind::Forbidden,
                404 => ErrorKind::NotFound,
                409 => ErrorKind::Conflict,
                422 => ErrorKind::Validation,
                429 => ErrorKind::RateLimited,
                500 => ErrorKind::Internal,
                _ => ErrorKind::Other,
            },
        }
    }
}

/// Error returned by the Crebain API
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message} (request_id={})", .request_id.as_deref().unwrap_or("none"))]
pub struct RemoteError {
    pub kind: ErrorKind,
    /// HTTP status code
    pub status: u16,
    /// Machine-readable error code, e.g. `RATE_LIMITED`
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
    /// Raw response body as received
    pub response_body: Option<String>,
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing CREBAIN_API_KEY environment variable.")]
    MissingApiKey,

    #[error(
        "Invalid CREBAIN_API_KEY: must start with 'ck_'.\nGot: {got:?}...\n\nFix:\n  export CREBAIN_API_KEY=\"ck_live_your_key_here\""
    )]
    ApiKeyPrefix { got: String },

    #[error(
        "Invalid CREBAIN_API_KEY: contains whitespace/newlines.\nGot: {got:?}...\n\nDo NOT paste multi-line blocks. Use a single clean line:\n  export CREBAIN_API_KEY=\"ck_live_your_key_here\""
    )]
    ApiKeyWhitespace { got: String },

    #[error("Missing CREBAIN_BASE_URL environment variable.")]
    MissingBaseUrl,

    #[error(
        "Invalid CREBAIN_BASE_URL: must start with 'https://'.\nGot: {got:?}...\n\nFix:\n  export CREBAIN_BASE_URL=\"https://<project>.supabase.co/functions/v1/api\""
    )]
    BaseUrlScheme { got: String },

    #[error(
        "Invalid CREBAIN_BASE_URL: contains whitespace/newlines.\nGot: {got:?}...\n\nDo NOT paste multi-line blocks. Use a single clean line:\n  export CREBAIN_BASE_URL=\"https://<project>.supabase.co/functions/v1/api\""
    )]
    BaseUrlWhitespace { got: String },

    #[error("Invalid {var}: expected {expected}, got {value:?}.")]
    InvalidNumber {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("AuthError: {0}")]
    Auth(#[from] AuthError),
    #[error("ArgumentError: {0}")]
    Argument(#[from] ArgumentError),
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("DisplayError: {0}")]
    Display(#[from] DisplayError),
}

/// Failures talking to the API once a request has been built.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("Authentication failed")]
    Unauthorized {
        status: u16,
        endpoint: String,
        server_message: String,
    },
    #[error("Transport error on {endpoint}: {message}")]
    Transport { endpoint: String, message: String },
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token request failed with status {status}: {message}")]
    TokenRequestFailed { status: u16, message: String },
    #[error("Token response is missing '{field}'")]
    MissingField { field: String },
    #[error("Authentication method '{method}' is not supported yet")]
    UnsupportedMethod { method: String },
    #[error("Unknown authentication method '{method}'")]
    UnknownMethod { method: String },
    #[error("Missing credential '{field}' for {method} authentication")]
    MissingCredential { field: String, method: String },
}

/// Caller input rejected before any network call.
#[derive(Error, Debug)]
pub enum ArgumentError {
    #[error("Unsupported HTTP verb '{0}', expected one of get, post, put, delete")]
    InvalidVerb(String),
    #[error("Malformed query parameters: {0}")]
    MalformedParams(String),
    #[error("Malformed headers: {0}")]
    MalformedHeaders(String),
    #[error("'{field}' is required")]
    MissingValue { field: String },
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Column '{column}' has an invalid data type '{data_type}'")]
    UnknownDataType { column: String, data_type: String },
    #[error("Invalid rebuild method '{0}', expected one of reload, recreate, update, updateappend, append")]
    InvalidRebuildMethod(String),
    #[error("Invalid output format '{0}', expected table or raw")]
    InvalidOutputFormat(String),
    #[error("Invalid image format '{0}', expected base64 or image")]
    InvalidImageFormat(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Table formatting failed: {0}")]
    TableFormat(String),
    #[error("Terminal output error: {0}")]
    TerminalOutput(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Api(api_error) => match api_error {
                ApiError::Unauthorized { .. } => ErrorSeverity::High,
                ApiError::Timeout { .. } => ErrorSeverity::Medium,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                ApiError::Transport { .. } => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Auth(AuthError::UnsupportedMethod { .. }) => ErrorSeverity::Critical,
            AppError::Auth(_) => ErrorSeverity::High,
            AppError::Argument(_) => ErrorSeverity::Medium,
            AppError::Validation(_) => ErrorSeverity::Medium,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Display(_) => ErrorSeverity::Low,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api(ApiError::Http { status, .. })
            | AppError::Api(ApiError::Unauthorized { status, .. }) => Some(*status),
            AppError::Auth(AuthError::TokenRequestFailed { status, .. }) => Some(*status),
            _ => None,
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Auth(AuthError::TokenRequestFailed { .. })
            | AppError::Api(ApiError::Unauthorized { .. }) => Some(
                "Check CLICDATA_CLIENT_ID and CLICDATA_CLIENT_SECRET, then try again".to_string(),
            ),
            AppError::Auth(AuthError::UnsupportedMethod { .. })
            | AppError::Auth(AuthError::UnknownMethod { .. }) => {
                Some("Use 'client_credentials' or 'basic' as the auth method".to_string())
            }
            AppError::Api(ApiError::Timeout { .. }) => {
                Some("Check your internet connection or raise timeout_seconds".to_string())
            }
            AppError::Api(ApiError::Http { status: 404, .. }) => {
                Some("'clicdata data list' shows the available rec_ids".to_string())
            }
            _ => None,
        }
    }
}

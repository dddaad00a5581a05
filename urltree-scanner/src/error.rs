use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("URL not found")]
    NotFound,

    #[error("Access denied to URL")]
    Forbidden,

    #[error("Unable to connect to URL: {0}")]
    Unreachable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("{message}")]
    Unknown {
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed href {href:?}: {reason}")]
    MalformedHref { href: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl ScanError {
    /// HTTP-like status code surfaced to callers of an extraction.
    pub fn status_code(&self) -> u16 {
        match self {
            ScanError::InvalidInput(_) | ScanError::MalformedHref { .. } => 400,
            ScanError::NotFound => 404,
            ScanError::Forbidden => 403,
            ScanError::Unreachable(_) => 503,
            ScanError::Timeout => 408,
            ScanError::Unknown {
                status: Some(status),
                ..
            } if *status >= 400 && *status <= 599 => *status,
            ScanError::Unknown { .. } | ScanError::ClientBuild(_) => 500,
        }
    }

    pub fn status_message(&self) -> String {
        match self {
            ScanError::InvalidInput(message) => message.clone(),
            ScanError::Unreachable(_) => "Unable to connect to URL".to_string(),
            ScanError::Unknown { message, .. } if message.is_empty() => {
                "Failed to extract URLs".to_string()
            }
            other => other.to_string(),
        }
    }

    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            404 => ScanError::NotFound,
            403 => ScanError::Forbidden,
            code => ScanError::Unknown {
                status: Some(code),
                message: format!("Request failed with status code {}", code),
            },
        }
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScanError::Timeout
        } else if err.is_connect() {
            ScanError::Unreachable(err.to_string())
        } else if let Some(status) = err.status() {
            ScanError::from_status(status)
        } else {
            ScanError::Unknown {
                status: None,
                message: err.to_string(),
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

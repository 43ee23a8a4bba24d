use reqwest::StatusCode;
use std::fmt;

#[derive(Debug)]
pub enum DatamuseError {
    /// Represents an incompatible combination of builder calls
    Usage(String),
    /// Represents a malformed argument to a builder call
    Validation(String),
    /// Represents a non-success HTTP status from the Datamuse API
    Api(StatusCode),
    /// Represents HTTP/network errors
    Http(reqwest::Error),
    /// Represents JSON parsing errors
    Parse(serde_json::Error),
    /// Represents file I/O errors
    Io(std::io::Error),
    /// Represents an unparsable base URL override
    InvalidBaseUrl(url::ParseError),
}

impl std::error::Error for DatamuseError {}

impl fmt::Display for DatamuseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatamuseError::Usage(msg) => write!(f, "Usage error: {msg}"),
            DatamuseError::Validation(msg) => write!(f, "Validation error: {msg}"),
            DatamuseError::Api(status) => write!(f, "Datamuse API returned HTTP {status}"),
            DatamuseError::Http(e) => write!(f, "HTTP error: {e}"),
            DatamuseError::Parse(e) => write!(f, "Parse error: {e}"),
            DatamuseError::Io(e) => write!(f, "I/O error: {e}"),
            DatamuseError::InvalidBaseUrl(e) => write!(
                f,
                "Invalid base URL override: {e}\n\
                 Check the DATAMUSE_BASE_URL environment variable"
            ),
        }
    }
}

impl From<reqwest::Error> for DatamuseError {
    fn from(err: reqwest::Error) -> Self {
        DatamuseError::Http(err)
    }
}

impl From<serde_json::Error> for DatamuseError {
    fn from(err: serde_json::Error) -> Self {
        DatamuseError::Parse(err)
    }
}

impl From<std::io::Error> for DatamuseError {
    fn from(err: std::io::Error) -> Self {
        DatamuseError::Io(err)
    }
}

impl From<url::ParseError> for DatamuseError {
    fn from(err: url::ParseError) -> Self {
        DatamuseError::InvalidBaseUrl(err)
    }
}

/// Helper type for Result with `DatamuseError`
pub type Result<T> = std::result::Result<T, DatamuseError>;

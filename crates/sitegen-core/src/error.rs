//! Error types for Sitegen

use thiserror::Error;

/// Main error type for Sitegen
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Failed to decode structured project: {0}")]
    Decode(String),

    #[error("Failed to build archive: {0}")]
    Archive(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Website not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<zip::result::ZipError> for SiteError {
    fn from(e: zip::result::ZipError) -> Self {
        SiteError::Archive(e.to_string())
    }
}

impl SiteError {
    /// Text suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            SiteError::Request(e) => e.user_message(),
            SiteError::Validation(msg) => msg.clone(),
            SiteError::Archive(_) => "Failed to download ZIP file".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;

/// Failures talking to the generation service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        suggestions: Vec<String>,
    },

    #[error("Too many requests")]
    RateLimited,

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RequestError {
    /// Map a non-success status and its optional server message
    pub fn from_status(status: u16, message: Option<String>, suggestions: Vec<String>) -> Self {
        match status {
            400 => RequestError::BadRequest {
                message: message.unwrap_or_default(),
                suggestions,
            },
            429 => RequestError::RateLimited,
            500..=599 => RequestError::Server {
                status,
                message: message.unwrap_or_default(),
            },
            _ => RequestError::Status {
                status,
                message: message.unwrap_or_default(),
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::BadRequest { .. } => Some(400),
            RequestError::RateLimited => Some(429),
            RequestError::Server { status, .. } | RequestError::Status { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Notification text for the failure
    pub fn user_message(&self) -> String {
        match self {
            RequestError::BadRequest {
                message,
                suggestions,
            } => {
                let mut text = if message.is_empty() {
                    "Invalid request. Please check your input and try again.".to_string()
                } else {
                    message.clone()
                };
                if !suggestions.is_empty() {
                    text.push_str(&format!(" Suggestions: {}", suggestions.join(", ")));
                }
                text
            }
            RequestError::RateLimited => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            RequestError::Server { .. } => "Server error. Please try again later.".to_string(),
            RequestError::Network(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            RequestError::Timeout => {
                "The request timed out. Please try again later.".to_string()
            }
            RequestError::Status { message, .. } if !message.is_empty() => message.clone(),
            RequestError::Status { .. } | RequestError::InvalidResponse(_) => {
                "Failed to generate website".to_string()
            }
        }
    }
}

//! Error types for the blogline client.
//!
//! This module defines the centralized error type [`BloglineError`], the
//! field-scoped [`ValidationError`], and a [`Result`] alias used throughout the
//! crate. All errors derive their `Error` implementation through `thiserror`.
//!
//! Errors fall into three families:
//!
//! - **Validation**: produced locally before any request is sent
//! - **API**: a rejection from the server, carrying the server's message
//! - **Session**: a 401 that invalidates the stored token globally

use thiserror::Error;

/// Fallback text shown when neither the server nor the transport gave a message.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// The main error type for blogline operations.
///
/// # Examples
///
/// ```
/// use blogline::domain::BloglineError;
///
/// let err = BloglineError::Api { status: 404, message: "Post not found".to_string() };
/// assert_eq!(err.user_message(), "Post not found");
/// ```
#[derive(Debug, Error)]
pub enum BloglineError {
    /// Local validation rejected the input before it reached the network.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server answered with a non-success status.
    ///
    /// `message` is the human-readable text extracted from the response body.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The server answered 401. The in-memory token has already been dropped.
    #[error("{message}")]
    Unauthorized {
        /// Message extracted from the response body.
        message: String,
    },

    /// The operation needs a session but none is established.
    #[error("You must be logged in to do that")]
    NotAuthenticated,

    /// The request did not complete within the configured deadline.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be sent or the connection failed.
    #[error("Network error: {0}")]
    Transport(String),

    /// The response body could not be decoded into the expected type.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Reading or writing the token store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BloglineError {
    /// Returns the single human-readable string a slice stores for this error.
    ///
    /// Server rejections surface the server's own message; everything else uses its
    /// display text. An empty message falls back to [`GENERIC_ERROR_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Api { message, .. } | Self::Unauthorized { message } => message.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }

    /// Whether this error invalidates the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<reqwest::Error> for BloglineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BloglineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Field-scoped validation failures.
///
/// The `Display` text of each variant is exactly what the form shows under
/// the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} must be less than {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least 8 characters!")]
    PasswordTooShort,

    #[error("Please confirm your password")]
    ConfirmationRequired,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Username can only contain letters, numbers, and underscores")]
    InvalidUsername,

    #[error("Comment cannot be empty")]
    EmptyComment,

    #[error("Image must be JPEG or PNG format")]
    ImageFormat,

    #[error("Image must be less than 5MB")]
    ImageTooLarge,

    #[error("At least one tag is required")]
    NoTags,

    #[error("Maximum 5 tags allowed")]
    TooManyTags,

    /// Several fields failed at once; carries the first message for display.
    #[error("{0}")]
    Form(String),
}

/// A specialized `Result` type for blogline operations.
pub type Result<T> = std::result::Result<T, BloglineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_surfaces_server_message() {
        let err = BloglineError::Api {
            status: 400,
            message: "Title already taken".to_string(),
        };
        assert_eq!(err.user_message(), "Title already taken");
    }

    #[test]
    fn blank_api_message_falls_back_to_generic() {
        let err = BloglineError::Api {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn validation_message_is_field_text() {
        let err = BloglineError::from(ValidationError::TooShort { field: "Title", min: 3 });
        assert_eq!(err.user_message(), "Title must be at least 3 characters");
    }

    #[test]
    fn only_unauthorized_invalidates_session() {
        let err = BloglineError::Unauthorized {
            message: "Invalid credentials".to_string(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(!BloglineError::Timeout.is_unauthorized());
    }
}

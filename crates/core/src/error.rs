//! Error types for the Waypoint domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

use crate::content::PresentationType;

/// The top-level error type for all Waypoint operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Session errors ---
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    // --- Content source errors ---
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures while requesting content from a [`crate::ContentSource`].
///
/// The session degrades every one of these to "no content"; they are
/// surfaced to observers through [`crate::SessionEvent::FetchFailed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Content service returned status {status_code}: {message}")]
    Status { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed content response: {0}")]
    Decode(String),

    #[error("Content source not ready: {0}")]
    NotReady(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Content source I/O error: {0}")]
    Io(String),

    /// The source's request task died without producing a result.
    #[error("Content source crashed: {0}")]
    Crashed(String),
}

/// Operations rejected by the session state machine. State is unchanged
/// whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Already signed in as {0}")]
    AlreadySignedIn(String),

    #[error("User identity must not be empty")]
    EmptyIdentity,

    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("No {0} content is available")]
    NoContent(PresentationType),

    #[error("Content is not ready (state: {0})")]
    NotReady(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_displays_status() {
        let err = Error::Fetch(FetchError::Status {
            status_code: 500,
            message: "upstream unavailable".into(),
        });
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("upstream unavailable"));
    }

    #[test]
    fn session_error_names_presentation_type() {
        let err = SessionError::NoContent(PresentationType::ButtonTriggered);
        assert_eq!(err.to_string(), "No button-triggered content is available");
    }
}

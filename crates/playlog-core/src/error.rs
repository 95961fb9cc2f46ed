//! Error types for Playlog Core

use thiserror::Error;

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Relay error types
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (setup time)
    #[error("The target element for player setup (#{element}) is missing")]
    MissingTarget { element: String },

    #[error("Requested event '{name}' has no native player mapping")]
    UnmappedEvent { name: String },

    #[error("Player setup failed: {0}")]
    PlayerSetup(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Payload errors
    #[error("Playlist item has neither a title nor a file")]
    MissingTitle,

    // Validation errors (endpoint side)
    #[error("Unknown playback event: {0}")]
    UnknownEvent(String),

    #[error("The '{field}' value must be set for {record}")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    // Authorization errors
    #[error("Context {0} does not exist")]
    ContextNotFound(i64),

    #[error("User {user} may not log events in context {context}")]
    AccessDenied { user: i64, context: i64 },

    #[error("Authentication required")]
    Unauthenticated,

    // Transport errors
    #[cfg(feature = "http")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Relay call failed: {0}")]
    Transport(String),

    // Internal errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for failures that must abort adapter construction
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingTarget { .. }
                | Error::UnmappedEvent { .. }
                | Error::PlayerSetup(_)
                | Error::InvalidConfig(_)
        )
    }

    /// Returns true for parameter validation failures raised by the endpoint
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::UnknownEvent(_) | Error::MissingField { .. })
    }

    /// Returns the stable error code reported to remote callers
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::MissingTarget { .. } => "MISSING_TARGET",
            Error::UnmappedEvent { .. } => "UNMAPPED_EVENT",
            Error::PlayerSetup(_) => "PLAYER_SETUP",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::MissingTitle => "MISSING_TITLE",
            Error::UnknownEvent(_) => "INVALID_PARAMETER",
            Error::MissingField { .. } => "CODING_ERROR",
            Error::ContextNotFound(_) => "CONTEXT_NOT_FOUND",
            Error::AccessDenied { .. } => "ACCESS_DENIED",
            Error::Unauthenticated => "UNAUTHENTICATED",
            #[cfg(feature = "http")]
            Error::Network(_) => "NETWORK",
            Error::Transport(_) => "TRANSPORT",
            Error::Serialization(_) => "SERIALIZATION",
            Error::Io(_) => "IO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(Error::MissingTarget { element: "p1".into() }.is_configuration());
        assert!(Error::UnmappedEvent { name: "rewound".into() }.is_configuration());
        assert!(!Error::MissingTitle.is_configuration());
        assert!(!Error::Transport("down".into()).is_configuration());
    }

    #[test]
    fn test_validation_codes() {
        let err = Error::UnknownEvent("rewound".into());
        assert!(err.is_validation());
        assert_eq!(err.error_code(), "INVALID_PARAMETER");

        let err = Error::MissingField { record: "playback_started", field: "title" };
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "The 'title' value must be set for playback_started");
    }

    #[test]
    fn test_missing_target_message() {
        let err = Error::MissingTarget { element: "video-7".into() };
        assert_eq!(
            err.to_string(),
            "The target element for player setup (#video-7) is missing"
        );
    }
}

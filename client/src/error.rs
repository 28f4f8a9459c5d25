//! Error handling for the Farmer KYC client
//!
//! Every failure a caller can see maps to one variant with a stable code.

use shared::{FieldError, StorageError, ValidationError};
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    // Local validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Identifier and password are required")]
    MissingCredentials,

    // Backend errors
    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("{message}")]
    Backend {
        message: String,
        field_errors: Vec<FieldError>,
    },

    // Session errors
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("A request is already in progress")]
    RequestInFlight,

    // Local state errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Validation(err) => err.code(),
            ClientError::InvalidInput(_) => "INVALID_INPUT",
            ClientError::MissingCredentials => "MISSING_CREDENTIALS",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Backend { .. } => "BACKEND_ERROR",
            ClientError::NotAuthenticated => "NOT_AUTHENTICATED",
            ClientError::RequestInFlight => "REQUEST_IN_FLIGHT",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::Serialization(_) => "SERIALIZATION_ERROR",
            ClientError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Whether the user can fix the input and try again without reloading
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_)
                | ClientError::InvalidInput(_)
                | ClientError::MissingCredentials
                | ClientError::Transport(_)
                | ClientError::Backend { .. }
                | ClientError::RequestInFlight
        )
    }

    pub(crate) fn backend(message: Option<String>, field_errors: Vec<FieldError>) -> Self {
        ClientError::Backend {
            message: message.unwrap_or_else(|| "Request was rejected".to_string()),
            field_errors,
        }
    }
}

impl From<shared::ChoiceError> for ClientError {
    fn from(err: shared::ChoiceError) -> Self {
        ClientError::InvalidInput(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
        fields.sort_unstable();
        ClientError::InvalidInput(format!("invalid fields: {}", fields.join(", ")))
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

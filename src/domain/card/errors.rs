//! Card-specific error types.

use thiserror::Error;

use crate::domain::foundation::{CardId, DomainError, ErrorCode};

/// Errors raised by the Experience Card aggregate and its service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CardError {
    #[error("Card not found: {0}")]
    NotFound(CardId),

    #[error("No card found for code '{0}'")]
    CodeNotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Card is not active")]
    Inactive,

    #[error("Card has expired")]
    Expired,

    #[error("Cloning is disabled for this card")]
    CloningDisabled,

    #[error("Real-time location sharing is disabled for this card")]
    LocationSharingDisabled,

    #[error("Card can only be created from a confirmed experience (status is {status})")]
    SourceNotConfirmed { status: String },

    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Concurrent modification detected: {0}")]
    Conflict(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl CardError {
    pub fn not_found(id: CardId) -> Self {
        CardError::NotFound(id)
    }

    pub fn code_not_found(code: impl Into<String>) -> Self {
        CardError::CodeNotFound(code.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CardError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CardError::NotFound(_) | CardError::CodeNotFound(_) => ErrorCode::CardNotFound,
            CardError::Forbidden(_) => ErrorCode::Forbidden,
            CardError::Inactive => ErrorCode::CardInactive,
            CardError::Expired => ErrorCode::CardExpired,
            CardError::CloningDisabled => ErrorCode::CloningDisabled,
            CardError::LocationSharingDisabled => ErrorCode::LocationSharingDisabled,
            CardError::SourceNotConfirmed { .. } => ErrorCode::InvalidStateTransition,
            CardError::Validation { .. } => ErrorCode::ValidationFailed,
            CardError::Conflict(_) => ErrorCode::VersionConflict,
            CardError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for CardError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden | ErrorCode::Unauthorized => CardError::Forbidden(err.message),
            ErrorCode::VersionConflict => CardError::Conflict(err.message),
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => CardError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => CardError::Infrastructure(err.message),
        }
    }
}

impl From<crate::domain::foundation::ValidationError> for CardError {
    fn from(err: crate::domain::foundation::ValidationError) -> Self {
        CardError::from(DomainError::from(err))
    }
}

//! Experience-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ExperienceId, ItemId};

use super::status::ExperienceStatus;

/// Errors raised by the Experience aggregate and its service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExperienceError {
    #[error("Experience not found: {0}")]
    NotFound(ExperienceId),

    #[error("No experience found for share code '{0}'")]
    ShareCodeNotFound(String),

    #[error("Itinerary item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Cannot {attempted} an experience in {current} status")]
    InvalidState {
        current: ExperienceStatus,
        attempted: String,
    },

    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Discount code '{code}' is invalid: {reason}")]
    InvalidDiscount { code: String, reason: String },

    #[error("Payment failed: {reason}")]
    PaymentFailed { reason: String },

    #[error("Concurrent modification detected: {0}")]
    Conflict(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl ExperienceError {
    pub fn not_found(id: ExperienceId) -> Self {
        ExperienceError::NotFound(id)
    }

    pub fn item_not_found(id: ItemId) -> Self {
        ExperienceError::ItemNotFound(id)
    }

    pub fn invalid_state(current: ExperienceStatus, attempted: impl Into<String>) -> Self {
        ExperienceError::InvalidState {
            current,
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ExperienceError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_discount(code: impl Into<String>, reason: impl Into<String>) -> Self {
        ExperienceError::InvalidDiscount {
            code: code.into(),
            reason: reason.into(),
        }
    }

    pub fn payment_failed(reason: impl Into<String>) -> Self {
        ExperienceError::PaymentFailed {
            reason: reason.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ExperienceError::NotFound(_) | ExperienceError::ShareCodeNotFound(_) => {
                ErrorCode::ExperienceNotFound
            }
            ExperienceError::ItemNotFound(_) => ErrorCode::ItemNotFound,
            ExperienceError::Forbidden(_) => ErrorCode::Forbidden,
            ExperienceError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            ExperienceError::Validation { .. } => ErrorCode::ValidationFailed,
            ExperienceError::InvalidDiscount { .. } => ErrorCode::InvalidDiscountCode,
            ExperienceError::PaymentFailed { .. } => ErrorCode::PaymentFailed,
            ExperienceError::Conflict(_) => ErrorCode::VersionConflict,
            ExperienceError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for ExperienceError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden | ErrorCode::Unauthorized => {
                ExperienceError::Forbidden(err.message)
            }
            ErrorCode::VersionConflict => ExperienceError::Conflict(err.message),
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat
            | ErrorCode::InvalidDateRange => ExperienceError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::PaymentFailed => ExperienceError::PaymentFailed {
                reason: err.message,
            },
            _ => ExperienceError::Infrastructure(err.message),
        }
    }
}

impl From<crate::domain::foundation::ValidationError> for ExperienceError {
    fn from(err: crate::domain::foundation::ValidationError) -> Self {
        ExperienceError::from(DomainError::from(err))
    }
}

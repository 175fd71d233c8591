//! Payment provider port for external payment processing.
//!
//! The engine never captures funds itself. Checkout asks the provider
//! for a payment session (reference + redirect URL + expiry); the
//! provider later calls back into the engine's confirm-payment
//! operation, which must be safe to invoke more than once per
//! experience.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Currency, DomainError, ErrorCode, ExperienceId, Money, Timestamp};

/// Port for payment gateway integrations.
///
/// Implementations must ensure idempotency: retrying `create_payment`
/// with the same idempotency key returns the same session rather than
/// charging twice.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Creates a payment session for the given amount.
    ///
    /// Returns a reference the engine stores on the experience and a
    /// redirect URL the client completes payment at.
    async fn create_payment(&self, request: PaymentRequest)
        -> Result<PaymentSession, PaymentError>;
}

/// Request to create a payment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// The experience being paid for.
    pub experience_id: ExperienceId,

    /// Total amount to collect.
    pub amount: Money,

    pub currency: Currency,

    /// Human-readable statement line.
    pub description: String,

    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

/// A payment session awaiting completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Provider's payment reference.
    pub reference: String,

    /// URL the customer completes payment at.
    pub redirect_url: String,

    /// When the session expires.
    pub expires_at: Timestamp,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a declined-payment error.
    pub fn declined(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Declined, message)
    }

    /// Create a provider-side error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::Declined | PaymentErrorCode::InsufficientFunds => {
                ErrorCode::PaymentFailed
            }
            PaymentErrorCode::InvalidRequest => ErrorCode::ValidationFailed,
            _ => ErrorCode::ExternalServiceError,
        };
        DomainError::new(code, err.message)
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Payment was declined.
    Declined,

    /// Insufficient funds.
    InsufficientFunds,

    /// Malformed request (bad amount/currency).
    InvalidRequest,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::Declined => "declined",
            PaymentErrorCode::InsufficientFunds => "insufficient_funds",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn payment_error_retryable() {
        assert!(PaymentErrorCode::NetworkError.is_retryable());
        assert!(PaymentErrorCode::RateLimitExceeded.is_retryable());
        assert!(!PaymentErrorCode::Declined.is_retryable());
    }

    #[test]
    fn declined_payment_maps_to_payment_failed() {
        let err: DomainError = PaymentError::declined("card declined").into();
        assert_eq!(err.code, ErrorCode::PaymentFailed);
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::declined("Your card was declined");
        assert!(err.to_string().contains("declined"));
        assert!(err.to_string().contains("Your card was declined"));
    }
}

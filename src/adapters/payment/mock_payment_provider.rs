//! Mock payment provider for testing and development.
//!
//! Returns deterministic payment sessions, tracks every request for
//! assertions, and supports error injection.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::Timestamp;
use crate::ports::{PaymentError, PaymentProvider, PaymentRequest, PaymentSession};

const SESSION_TTL_SECS: i64 = 1800;

/// Mock payment provider.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.fail_next(PaymentError::declined("test decline"));
///
/// let result = mock.create_payment(request).await;
/// assert!(result.is_err());
/// assert!(mock.requests().is_empty());
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Error to return on the next call.
    next_error: Option<PaymentError>,

    /// Every request successfully processed, for assertions.
    requests: Vec<PaymentRequest>,

    /// Idempotency: sessions already issued by key.
    sessions_by_key: std::collections::HashMap<String, PaymentSession>,
}

impl MockPaymentProvider {
    /// Create a new mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects an error for the next `create_payment` call.
    pub fn fail_next(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Requests successfully processed so far.
    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.inner.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentSession, PaymentError> {
        let mut state = self.inner.lock().unwrap();

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        if let Some(key) = &request.idempotency_key {
            if let Some(existing) = state.sessions_by_key.get(key) {
                return Ok(existing.clone());
            }
        }

        let session = PaymentSession {
            reference: format!("pay_{}", Uuid::new_v4().simple()),
            redirect_url: format!(
                "https://payments.example.test/checkout/{}",
                request.experience_id
            ),
            expires_at: Timestamp::now().add_secs(SESSION_TTL_SECS),
        };

        if let Some(key) = request.idempotency_key.clone() {
            state.sessions_by_key.insert(key, session.clone());
        }
        state.requests.push(request);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Currency, ExperienceId, Money};

    fn request(key: Option<&str>) -> PaymentRequest {
        PaymentRequest {
            experience_id: ExperienceId::new(),
            amount: Money::from_major(315),
            currency: Currency::usd(),
            description: "Wayfarer trip: Lagos Getaway".to_string(),
            idempotency_key: key.map(String::from),
        }
    }

    #[tokio::test]
    async fn returns_a_session_and_logs_the_request() {
        let mock = MockPaymentProvider::new();
        let session = mock.create_payment(request(None)).await.unwrap();

        assert!(session.reference.starts_with("pay_"));
        assert!(session.redirect_url.contains("checkout"));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn injected_error_fails_the_next_call_only() {
        let mock = MockPaymentProvider::new();
        mock.fail_next(PaymentError::declined("test decline"));

        assert!(mock.create_payment(request(None)).await.is_err());
        assert!(mock.create_payment(request(None)).await.is_ok());
    }

    #[tokio::test]
    async fn idempotency_key_returns_the_same_session() {
        let mock = MockPaymentProvider::new();
        let first = mock.create_payment(request(Some("exp-1"))).await.unwrap();
        let second = mock.create_payment(request(Some("exp-1"))).await.unwrap();

        assert_eq!(first.reference, second.reference);
    }
}

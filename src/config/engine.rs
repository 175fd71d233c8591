//! Engine tuning configuration.

use serde::Deserialize;

use crate::domain::foundation::{Currency, Percentage};

use super::error::ValidationError;

fn default_service_fee_percent() -> u8 {
    5
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_highlight_cap() -> usize {
    6
}

fn default_interaction_log_cap() -> usize {
    50
}

fn default_payment_session_ttl_secs() -> i64 {
    1800
}

/// Tunables of the Experience/Card engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Platform service fee applied to the items subtotal.
    #[serde(default = "default_service_fee_percent")]
    pub service_fee_percent: u8,

    /// Currency assumed when an experience does not specify one.
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Maximum highlights derived onto a card.
    #[serde(default = "default_highlight_cap")]
    pub highlight_cap: usize,

    /// Maximum entries kept in a card's recent-interaction log.
    #[serde(default = "default_interaction_log_cap")]
    pub interaction_log_cap: usize,

    /// How long a payment session stays valid.
    #[serde(default = "default_payment_session_ttl_secs")]
    pub payment_session_ttl_secs: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            service_fee_percent: default_service_fee_percent(),
            default_currency: default_currency(),
            highlight_cap: default_highlight_cap(),
            interaction_log_cap: default_interaction_log_cap(),
            payment_session_ttl_secs: default_payment_session_ttl_secs(),
        }
    }
}

impl EngineConfig {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.service_fee_percent > 100 {
            return Err(ValidationError::invalid(
                "engine.service_fee_percent",
                "must be between 0 and 100",
            ));
        }
        if Currency::new(&self.default_currency).is_err() {
            return Err(ValidationError::invalid(
                "engine.default_currency",
                "must be a three-letter ISO code",
            ));
        }
        if self.highlight_cap == 0 {
            return Err(ValidationError::invalid(
                "engine.highlight_cap",
                "must be at least 1",
            ));
        }
        if self.interaction_log_cap == 0 {
            return Err(ValidationError::invalid(
                "engine.interaction_log_cap",
                "must be at least 1",
            ));
        }
        if self.payment_session_ttl_secs <= 0 {
            return Err(ValidationError::invalid(
                "engine.payment_session_ttl_secs",
                "must be positive",
            ));
        }
        Ok(())
    }

    /// The service fee as a typed percentage.
    pub fn service_fee_rate(&self) -> Percentage {
        Percentage::new(self.service_fee_percent)
    }

    /// The default currency as a typed value.
    pub fn currency(&self) -> Currency {
        Currency::new(&self.default_currency).unwrap_or_default()
    }
}

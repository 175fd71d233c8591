//! Static allow-list discount validator.
//!
//! Validates discount codes against an in-process table. Suitable for
//! tests, development, and launch campaigns whose codes ship with the
//! deployment; a database-backed validator implements the same port.

use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::domain::foundation::{DomainError, Percentage};
use crate::ports::{DiscountInvalidReason, DiscountValidation, DiscountValidator};

/// A single allow-listed code.
#[derive(Debug, Clone)]
struct DiscountRule {
    rate: Percentage,
    campaign: Option<String>,
    revoked: bool,
}

/// Codes every deployment understands in development.
static DEMO_CODES: Lazy<HashMap<String, DiscountRule>> = Lazy::new(|| {
    HashMap::from([
        (
            "WELCOME5".to_string(),
            DiscountRule {
                rate: Percentage::new(5),
                campaign: Some("onboarding".to_string()),
                revoked: false,
            },
        ),
        (
            "WANDER15".to_string(),
            DiscountRule {
                rate: Percentage::new(15),
                campaign: Some("newsletter".to_string()),
                revoked: false,
            },
        ),
    ])
});

/// Allow-list backed discount validator.
#[derive(Default)]
pub struct StaticDiscountValidator {
    codes: HashMap<String, DiscountRule>,
}

impl StaticDiscountValidator {
    /// Create an empty validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator pre-loaded with the demo campaign codes.
    pub fn with_demo_codes() -> Self {
        Self {
            codes: DEMO_CODES.clone(),
        }
    }

    /// Adds an allow-listed code.
    pub fn with_code(mut self, code: impl Into<String>, rate: Percentage) -> Self {
        self.codes.insert(
            code.into().to_uppercase(),
            DiscountRule {
                rate,
                campaign: None,
                revoked: false,
            },
        );
        self
    }

    /// Adds a revoked code (useful for testing rejection paths).
    pub fn with_revoked_code(mut self, code: impl Into<String>) -> Self {
        self.codes.insert(
            code.into().to_uppercase(),
            DiscountRule {
                rate: Percentage::ZERO,
                campaign: None,
                revoked: true,
            },
        );
        self
    }
}

#[async_trait]
impl DiscountValidator for StaticDiscountValidator {
    async fn validate(&self, code: &str) -> Result<DiscountValidation, DomainError> {
        let normalized = code.to_uppercase();
        match self.codes.get(&normalized) {
            None => Ok(DiscountValidation::Invalid(DiscountInvalidReason::NotFound)),
            Some(rule) if rule.revoked => {
                Ok(DiscountValidation::Invalid(DiscountInvalidReason::Revoked))
            }
            Some(rule) => Ok(DiscountValidation::Valid {
                rate: rule.rate,
                campaign: rule.campaign.clone(),
            }),
        }
    }
}

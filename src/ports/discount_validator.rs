//! Discount code validation port.
//!
//! Discount codes are validated against an allow-list external to this
//! core. A valid code maps to a percentage the pricing calculator
//! applies to the items subtotal; everything else about promotions
//! (campaign management, redemption accounting) lives elsewhere.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Percentage};

/// Port for validating discount codes against external storage.
#[async_trait]
pub trait DiscountValidator: Send + Sync {
    /// Validates a discount code and returns its rate if valid.
    ///
    /// # Returns
    ///
    /// - `Ok(Valid { .. })` - code is valid with the given rate
    /// - `Ok(Invalid(reason))` - code is invalid for a specific reason
    /// - `Err(DomainError)` - infrastructure error occurred
    async fn validate(&self, code: &str) -> Result<DiscountValidation, DomainError>;
}

/// Result of validating a discount code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountValidation {
    /// Code is valid and maps to a percentage off the items subtotal.
    Valid {
        rate: Percentage,
        /// Optional campaign name for tracking.
        campaign: Option<String>,
    },
    /// Code is invalid for the specified reason.
    Invalid(DiscountInvalidReason),
}

impl DiscountValidation {
    /// Creates a valid result with the given rate.
    pub fn valid(rate: Percentage) -> Self {
        DiscountValidation::Valid {
            rate,
            campaign: None,
        }
    }

    /// Creates a valid result with campaign tracking.
    pub fn valid_with_campaign(rate: Percentage, campaign: impl Into<String>) -> Self {
        DiscountValidation::Valid {
            rate,
            campaign: Some(campaign.into()),
        }
    }

    /// Returns true if the code is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, DiscountValidation::Valid { .. })
    }
}

/// Reason why a discount code is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountInvalidReason {
    /// Code does not exist in the allow-list.
    NotFound,

    /// Code has expired (campaign ended).
    Expired { expired_at: String },

    /// Code has reached its maximum redemption count.
    Exhausted { used: u32, max: u32 },

    /// Code has been revoked by an operator.
    Revoked,
}

impl DiscountInvalidReason {
    /// Get a user-facing message for the invalid reason.
    pub fn user_message(&self) -> String {
        match self {
            DiscountInvalidReason::NotFound => {
                "This discount code was not found. Please check and try again.".to_string()
            }
            DiscountInvalidReason::Expired { expired_at } => {
                format!("This discount code expired on {}.", expired_at)
            }
            DiscountInvalidReason::Exhausted { used, max } => {
                format!(
                    "This discount code has been fully redeemed ({}/{} uses).",
                    used, max
                )
            }
            DiscountInvalidReason::Revoked => "This discount code is no longer valid.".to_string(),
        }
    }
}

impl std::fmt::Display for DiscountInvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

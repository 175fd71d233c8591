//! Human-shareable code value objects.
//!
//! Share codes identify an Experience or a Card in public URLs. A code
//! is assigned exactly once, at aggregate creation, and is globally
//! unique (the repository enforces uniqueness on insert).

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

const CODE_LEN: usize = 12;

fn generate_code(len: usize) -> String {
    // UUID v4 hex carries ~122 bits of entropy; the truncated uppercase
    // form stays collision-safe at trip-planning volumes and reads well
    // in a URL.
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(len)
        .collect::<String>()
        .to_uppercase()
}

fn validate_code(field: &'static str, code: &str) -> Result<(), ValidationError> {
    if code.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::invalid_format(
            field,
            "expected ASCII alphanumerics only",
        ));
    }
    Ok(())
}

/// Public share code for an Experience.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareCode(String);

impl ShareCode {
    /// Generates a fresh share code.
    pub fn generate() -> Self {
        Self(generate_code(CODE_LEN))
    }

    /// Parses a share code received from a client.
    pub fn parse(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into().to_uppercase();
        validate_code("share_code", &code)?;
        Ok(Self(code))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public share code for an Experience Card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardCode(String);

impl CardCode {
    /// Generates a fresh card code.
    pub fn generate() -> Self {
        Self(generate_code(CODE_LEN))
    }

    /// Parses a card code received from a client.
    pub fn parse(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into().to_uppercase();
        validate_code("card_code", &code)?;
        Ok(Self(code))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

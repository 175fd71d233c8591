//! Media generation port.
//!
//! Produces shareable media (currently QR codes) for card share URLs.
//! The engine stores the returned reference opaquely and never
//! interprets it; a failing generator must not block card creation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;

/// Opaque reference to a generated media asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(pub String);

impl MediaRef {
    /// Returns the inner reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Port for media/QR generation.
#[async_trait]
pub trait MediaGenerator: Send + Sync {
    /// Generates a QR image for the given share URL.
    async fn qr_for(&self, share_url: &str) -> Result<MediaRef, DomainError>;
}

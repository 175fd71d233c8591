//! Placeholder media generator.
//!
//! Produces deterministic QR references without rendering anything.
//! Real image generation lives behind an external service; the engine
//! only stores the returned reference.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::{MediaGenerator, MediaRef};

/// Media generator that fabricates stable references from the URL.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderMediaGenerator;

impl PlaceholderMediaGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaGenerator for PlaceholderMediaGenerator {
    async fn qr_for(&self, share_url: &str) -> Result<MediaRef, DomainError> {
        Ok(MediaRef(format!(
            "qr://{}",
            share_url.trim_end_matches('/').rsplit('/').next().unwrap_or(share_url)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reference_is_derived_from_the_code_segment() {
        let generator = PlaceholderMediaGenerator::new();
        let media = generator
            .qr_for("https://wayfarer.app/c/ABC123DEF456")
            .await
            .unwrap();
        assert_eq!(media.as_str(), "qr://ABC123DEF456");
    }

    #[tokio::test]
    async fn reference_is_deterministic() {
        let generator = PlaceholderMediaGenerator::new();
        let a = generator.qr_for("https://wayfarer.app/c/X1").await.unwrap();
        let b = generator.qr_for("https://wayfarer.app/c/X1").await.unwrap();
        assert_eq!(a, b);
    }
}

//! Public sharing configuration.

use serde::Deserialize;

use super::error::ValidationError;

fn default_card_url_base() -> String {
    "https://wayfarer.app/c".to_string()
}

fn default_experience_url_base() -> String {
    "https://wayfarer.app/trips".to_string()
}

/// Base URLs that public share links are built on.
#[derive(Debug, Clone, Deserialize)]
pub struct SharingConfig {
    /// Base URL for card share links (`<base>/<card code>`).
    #[serde(default = "default_card_url_base")]
    pub card_url_base: String,

    /// Base URL for experience share links (`<base>/<share code>`).
    #[serde(default = "default_experience_url_base")]
    pub experience_url_base: String,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            card_url_base: default_card_url_base(),
            experience_url_base: default_experience_url_base(),
        }
    }
}

impl SharingConfig {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("sharing.card_url_base", &self.card_url_base),
            ("sharing.experience_url_base", &self.experience_url_base),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ValidationError::invalid(field, "must be an http(s) URL"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SharingConfig::default().validate().is_ok());
    }

    #[test]
    fn non_http_base_is_rejected() {
        let config = SharingConfig {
            card_url_base: "ftp://example.com".to_string(),
            ..SharingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

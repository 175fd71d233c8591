//! Experience Card visibility and privacy settings.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Owner-controlled settings on a card.
///
/// Every flag gates what the public projection reveals; the projection
/// re-reads them on every view, so a settings change takes effect
/// immediately without touching stored card data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSettings {
    /// Whether the card is discoverable by its code at all.
    pub is_public: bool,
    /// Reveal the pricing snapshot on the public view.
    pub show_prices: bool,
    /// Reveal the owner's display name.
    pub show_owner_name: bool,
    /// Reveal the owner's avatar (only meaningful with the name shown).
    pub show_owner_avatar: bool,
    /// Share the owner's live location with viewers.
    pub show_real_time_location: bool,
    /// Allow viewers to clone the trip into their own draft.
    pub allow_cloning: bool,
    /// Include the full day-by-day itinerary on the public view.
    pub include_full_itinerary: bool,
    /// Optional hard expiry; past this instant the card is not served.
    pub expires_at: Option<Timestamp>,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            is_public: true,
            show_prices: false,
            show_owner_name: true,
            show_owner_avatar: false,
            show_real_time_location: false,
            allow_cloning: true,
            include_full_itinerary: false,
            expires_at: None,
        }
    }
}

impl CardSettings {
    /// Applies a partial update. `None` fields are left alone.
    pub fn apply(&mut self, update: CardSettingsUpdate) {
        if let Some(v) = update.is_public {
            self.is_public = v;
        }
        if let Some(v) = update.show_prices {
            self.show_prices = v;
        }
        if let Some(v) = update.show_owner_name {
            self.show_owner_name = v;
        }
        if let Some(v) = update.show_owner_avatar {
            self.show_owner_avatar = v;
        }
        if let Some(v) = update.show_real_time_location {
            self.show_real_time_location = v;
        }
        if let Some(v) = update.allow_cloning {
            self.allow_cloning = v;
        }
        if let Some(v) = update.include_full_itinerary {
            self.include_full_itinerary = v;
        }
        if let Some(v) = update.expires_at {
            self.expires_at = v;
        }
    }
}

/// Partial settings update. The double option on `expires_at`
/// distinguishes "leave alone" from "clear the expiry".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardSettingsUpdate {
    pub is_public: Option<bool>,
    pub show_prices: Option<bool>,
    pub show_owner_name: Option<bool>,
    pub show_owner_avatar: Option<bool>,
    pub show_real_time_location: Option<bool>,
    pub allow_cloning: Option<bool>,
    pub include_full_itinerary: Option<bool>,
    pub expires_at: Option<Option<Timestamp>>,
}

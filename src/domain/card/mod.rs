//! Experience Card bounded context.
//!
//! The publicly shareable, payment-gated snapshot of a confirmed
//! Experience, together with its privacy-filtered public projection
//! and distance queries.

mod aggregate;
mod distance;
mod errors;
mod projection;
mod settings;
mod stats;

pub use aggregate::{
    CardContentUpdate, CardHighlight, ExperienceCard, OwnerLocation, OwnerSnapshot,
    PricingSnapshot, TripSnapshot,
};
pub use distance::{estimate_travel, great_circle_km, TravelEstimate, EARTH_RADIUS_KM};
pub use errors::CardError;
pub use projection::{
    PublicCardView, PublicItineraryDay, PublicItineraryEntry, PublicPricing, PublicStats,
};
pub use settings::{CardSettings, CardSettingsUpdate};
pub use stats::{CardStats, Engagement, InteractionEntry, InteractionKind};

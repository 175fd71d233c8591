//! Experience bounded context.
//!
//! The mutable trip-builder aggregate, its itinerary items, and the
//! pure calculators that derive pricing and the day-by-day itinerary.

mod aggregate;
mod errors;
mod item;
mod itinerary;
mod pricing;
mod status;

pub use aggregate::{CreateExperience, Experience, ExperienceUpdate};
pub use errors::ExperienceError;
pub use item::{ItemDetails, ItemPatch, ItemType, ItineraryItem};
pub use itinerary::{build_itinerary, trip_length_days, DayBucket};
pub use pricing::PriceBreakdown;
pub use status::ExperienceStatus;

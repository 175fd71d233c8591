//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the Wayfarer experience engine.

mod errors;
mod geo;
mod ids;
mod money;
mod ownership;
mod percentage;
mod share_code;
mod state_machine;
mod timestamp;
mod travelers;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use geo::{GeoPoint, Location};
pub use ids::{AgentId, CardId, ExperienceId, ItemId, UserId};
pub use money::{Currency, Money};
pub use ownership::OwnedByUser;
pub use percentage::Percentage;
pub use share_code::{CardCode, ShareCode};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
pub use travelers::TravelerCounts;

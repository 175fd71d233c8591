//! Application layer - orchestration services.
//!
//! Services hold their collaborators as `Arc<dyn Port>` and enforce
//! ownership, lifecycle legality, and cross-aggregate idempotency on
//! top of the domain aggregates.

mod card_service;
mod experience_service;

pub use card_service::{ExperienceCardService, LikeOutcome, SaveOutcome};
pub use experience_service::{
    CheckoutOutcome, ConfirmOutcome, ExperienceService, OwnerProfile,
};

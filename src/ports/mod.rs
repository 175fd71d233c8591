//! Ports - interfaces to external collaborators.
//!
//! Every dependency of the engine on the outside world (persistence,
//! payments, discount lookup, media generation) is an `async_trait`
//! behind which adapters live. Application services hold these as
//! `Arc<dyn Port>`.

mod card_repository;
mod discount_validator;
mod experience_repository;
mod media_generator;
mod payment_provider;

pub use card_repository::CardRepository;
pub use discount_validator::{DiscountInvalidReason, DiscountValidation, DiscountValidator};
pub use experience_repository::ExperienceRepository;
pub use media_generator::{MediaGenerator, MediaRef};
pub use payment_provider::{
    PaymentError, PaymentErrorCode, PaymentProvider, PaymentRequest, PaymentSession,
};

//! Experience Card repository port.

use async_trait::async_trait;

use crate::domain::card::{Engagement, ExperienceCard};
use crate::domain::foundation::{CardCode, CardId, DomainError, ExperienceId};

/// Persistence port for the Experience Card aggregate.
///
/// Owner-scoped mutations (content, settings, location, deletion) go
/// through the optimistically versioned `update`. Engagement recording
/// (views, shares, clones, like/save toggles) goes through
/// `record_engagement`, which the adapter applies atomically as an
/// increment at the storage layer — never as an application-side
/// read-modify-write — so concurrent public traffic cannot lose counts
/// or starve owner edits.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Finds a card by id.
    async fn find_by_id(&self, id: CardId) -> Result<Option<ExperienceCard>, DomainError>;

    /// Finds a card by its public code.
    async fn find_by_code(&self, code: &CardCode) -> Result<Option<ExperienceCard>, DomainError>;

    /// Finds the card generated for an experience, if any.
    ///
    /// This is the idempotency anchor for card generation: at most one
    /// card exists per experience.
    async fn find_by_experience_id(
        &self,
        experience_id: ExperienceId,
    ) -> Result<Option<ExperienceCard>, DomainError>;

    /// Persists a new card.
    ///
    /// # Errors
    ///
    /// Fails if the id, code, or source experience already has a card.
    async fn save(&self, card: &ExperienceCard) -> Result<(), DomainError>;

    /// Updates an existing card with an optimistic version check and
    /// returns the persisted aggregate.
    ///
    /// # Errors
    ///
    /// - `CardNotFound` if the id has no match
    /// - `VersionConflict` if the stored version differs
    async fn update(&self, card: &ExperienceCard) -> Result<ExperienceCard, DomainError>;

    /// Applies an engagement event atomically and returns the updated
    /// card.
    ///
    /// # Errors
    ///
    /// `CardNotFound` if the id has no match.
    async fn record_engagement(
        &self,
        id: CardId,
        engagement: Engagement,
    ) -> Result<ExperienceCard, DomainError>;
}

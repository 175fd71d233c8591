//! Experience repository port.

use async_trait::async_trait;

use crate::domain::experience::Experience;
use crate::domain::foundation::{DomainError, ExperienceId, ShareCode, UserId};

/// Persistence port for the Experience aggregate.
///
/// Writes are serialized per aggregate id through optimistic
/// versioning: `update` compares the entity's `version` against the
/// stored one and fails with a `VersionConflict` domain error when they
/// diverge, so concurrent read-modify-write cycles cannot silently lose
/// an update.
#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    /// Finds an experience by id. Soft-deleted aggregates are returned;
    /// callers decide whether deletion matters for the operation.
    async fn find_by_id(&self, id: ExperienceId) -> Result<Option<Experience>, DomainError>;

    /// Finds an experience by its public share code.
    async fn find_by_share_code(&self, code: &ShareCode)
        -> Result<Option<Experience>, DomainError>;

    /// Lists a user's experiences, excluding soft-deleted ones.
    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Experience>, DomainError>;

    /// Persists a new experience.
    ///
    /// # Errors
    ///
    /// Fails if the id or share code already exists.
    async fn save(&self, experience: &Experience) -> Result<(), DomainError>;

    /// Updates an existing experience with an optimistic version check.
    ///
    /// On success the persisted aggregate, with its version
    /// incremented, is returned; the caller must treat it as the
    /// current state.
    ///
    /// # Errors
    ///
    /// - `ExperienceNotFound` if the id has no match
    /// - `VersionConflict` if the stored version differs
    async fn update(&self, experience: &Experience) -> Result<Experience, DomainError>;
}

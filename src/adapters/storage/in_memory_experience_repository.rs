//! In-memory Experience repository.
//!
//! Backing store for tests and development. Serializes writes per
//! aggregate id with an optimistic version check under a single
//! `RwLock`, mirroring what a database adapter enforces with a
//! `WHERE version = $n` clause.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::experience::Experience;
use crate::domain::foundation::{DomainError, ErrorCode, ExperienceId, ShareCode, UserId};
use crate::ports::ExperienceRepository;

/// In-memory storage for Experience aggregates.
#[derive(Clone, Default)]
pub struct InMemoryExperienceRepository {
    experiences: Arc<RwLock<HashMap<ExperienceId, Experience>>>,
}

impl InMemoryExperienceRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests).
    pub async fn clear(&self) {
        self.experiences.write().await.clear();
    }

    /// Number of stored experiences, soft-deleted included.
    pub async fn count(&self) -> usize {
        self.experiences.read().await.len()
    }
}

#[async_trait]
impl ExperienceRepository for InMemoryExperienceRepository {
    async fn find_by_id(&self, id: ExperienceId) -> Result<Option<Experience>, DomainError> {
        Ok(self.experiences.read().await.get(&id).cloned())
    }

    async fn find_by_share_code(
        &self,
        code: &ShareCode,
    ) -> Result<Option<Experience>, DomainError> {
        Ok(self
            .experiences
            .read()
            .await
            .values()
            .find(|exp| &exp.share_code == code)
            .cloned())
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Experience>, DomainError> {
        let mut result: Vec<Experience> = self
            .experiences
            .read()
            .await
            .values()
            .filter(|exp| &exp.owner_id == owner && !exp.deleted)
            .cloned()
            .collect();
        result.sort_by_key(|exp| *exp.created_at.as_datetime());
        Ok(result)
    }

    async fn save(&self, experience: &Experience) -> Result<(), DomainError> {
        let mut store = self.experiences.write().await;
        if store.contains_key(&experience.id) {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Experience {} already exists", experience.id),
            ));
        }
        if store
            .values()
            .any(|existing| existing.share_code == experience.share_code)
        {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Share code {} already in use", experience.share_code),
            ));
        }
        store.insert(experience.id, experience.clone());
        Ok(())
    }

    async fn update(&self, experience: &Experience) -> Result<Experience, DomainError> {
        let mut store = self.experiences.write().await;
        let stored = store.get(&experience.id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ExperienceNotFound,
                format!("Experience {} not found", experience.id),
            )
        })?;

        if stored.version != experience.version {
            return Err(DomainError::conflict(format!(
                "Experience {} was modified concurrently (stored version {}, given {})",
                experience.id, stored.version, experience.version
            )));
        }

        let mut persisted = experience.clone();
        persisted.version += 1;
        store.insert(persisted.id, persisted.clone());
        Ok(persisted)
    }
}

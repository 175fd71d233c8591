//! In-memory Experience Card repository.
//!
//! Owner mutations go through the optimistic `update`; engagement
//! events are applied to the stored card under the write lock, as
//! increments, so they neither race each other nor bump the version
//! owner edits are checked against.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::card::{Engagement, ExperienceCard};
use crate::domain::foundation::{CardCode, CardId, DomainError, ErrorCode, ExperienceId};
use crate::ports::CardRepository;

/// In-memory storage for Experience Card aggregates.
#[derive(Clone)]
pub struct InMemoryCardRepository {
    cards: Arc<RwLock<HashMap<CardId, ExperienceCard>>>,
    interaction_log_cap: usize,
}

impl InMemoryCardRepository {
    /// Create a new empty repository with the given interaction-log cap.
    pub fn new(interaction_log_cap: usize) -> Self {
        Self {
            cards: Arc::new(RwLock::new(HashMap::new())),
            interaction_log_cap,
        }
    }

    /// Clear all stored data (useful for tests).
    pub async fn clear(&self) {
        self.cards.write().await.clear();
    }

    /// Number of stored cards, soft-deleted included.
    pub async fn count(&self) -> usize {
        self.cards.read().await.len()
    }
}

#[async_trait]
impl CardRepository for InMemoryCardRepository {
    async fn find_by_id(&self, id: CardId) -> Result<Option<ExperienceCard>, DomainError> {
        Ok(self.cards.read().await.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &CardCode) -> Result<Option<ExperienceCard>, DomainError> {
        Ok(self
            .cards
            .read()
            .await
            .values()
            .find(|card| &card.code == code)
            .cloned())
    }

    async fn find_by_experience_id(
        &self,
        experience_id: ExperienceId,
    ) -> Result<Option<ExperienceCard>, DomainError> {
        Ok(self
            .cards
            .read()
            .await
            .values()
            .find(|card| card.experience_id == experience_id && !card.deleted)
            .cloned())
    }

    async fn save(&self, card: &ExperienceCard) -> Result<(), DomainError> {
        let mut store = self.cards.write().await;
        if store.contains_key(&card.id) {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Card {} already exists", card.id),
            ));
        }
        if store.values().any(|existing| existing.code == card.code) {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Card code {} already in use", card.code),
            ));
        }
        if store
            .values()
            .any(|existing| existing.experience_id == card.experience_id && !existing.deleted)
        {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!(
                    "Experience {} already has a card",
                    card.experience_id
                ),
            ));
        }
        store.insert(card.id, card.clone());
        Ok(())
    }

    async fn update(&self, card: &ExperienceCard) -> Result<ExperienceCard, DomainError> {
        let mut store = self.cards.write().await;
        let stored = store.get(&card.id).ok_or_else(|| {
            DomainError::new(ErrorCode::CardNotFound, format!("Card {} not found", card.id))
        })?;

        if stored.version != card.version {
            return Err(DomainError::conflict(format!(
                "Card {} was modified concurrently (stored version {}, given {})",
                card.id, stored.version, card.version
            )));
        }

        let mut persisted = card.clone();
        persisted.version += 1;
        // Engagement state belongs to the store, not the caller's
        // possibly stale copy; counters applied since the caller's read
        // must survive the owner's write.
        persisted.stats = stored.stats.clone();
        persisted.liked_by = stored.liked_by.clone();
        persisted.saved_by = stored.saved_by.clone();
        persisted.cloned_to = stored.cloned_to.clone();
        store.insert(persisted.id, persisted.clone());
        Ok(persisted)
    }

    async fn record_engagement(
        &self,
        id: CardId,
        engagement: Engagement,
    ) -> Result<ExperienceCard, DomainError> {
        let mut store = self.cards.write().await;
        let card = store.get_mut(&id).ok_or_else(|| {
            DomainError::new(ErrorCode::CardNotFound, format!("Card {} not found", id))
        })?;

        card.apply_engagement(engagement, self.interaction_log_cap);
        Ok(card.clone())
    }
}

//! Experience Card orchestration service.
//!
//! Owner-scoped card management (content, settings, location sharing,
//! deactivation, the delete saga) plus the public surface addressed by
//! card code: view, share, like/save toggles, cloning, and the
//! distance query. Public reads always go through the privacy
//! projection, re-derived per request.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::card::{
    estimate_travel, CardContentUpdate, CardError, CardSettingsUpdate, Engagement, ExperienceCard,
    PublicCardView, PublicStats, TravelEstimate,
};
use crate::domain::experience::{Experience, ExperienceError};
use crate::domain::foundation::{CardCode, CardId, GeoPoint, OwnedByUser, UserId};
use crate::ports::{CardRepository, ExperienceRepository};

use super::experience_service::ExperienceService;

/// Result of a like toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct LikeOutcome {
    pub liked: bool,
    pub total_likes: u64,
}

/// Result of a save toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub saved: bool,
    pub total_saves: u64,
}

/// Orchestration layer for the Experience Card aggregate.
pub struct ExperienceCardService {
    cards: Arc<dyn CardRepository>,
    experiences: Arc<dyn ExperienceRepository>,
    experience_service: Arc<ExperienceService>,
}

impl ExperienceCardService {
    pub fn new(
        cards: Arc<dyn CardRepository>,
        experiences: Arc<dyn ExperienceRepository>,
        experience_service: Arc<ExperienceService>,
    ) -> Self {
        Self {
            cards,
            experiences,
            experience_service,
        }
    }

    /// Fetches a card, owner-scoped.
    pub async fn get(&self, actor: &UserId, id: CardId) -> Result<ExperienceCard, CardError> {
        self.load_owned(actor, id).await
    }

    /// Updates the card's editable presentation fields.
    pub async fn update_content(
        &self,
        actor: &UserId,
        id: CardId,
        update: CardContentUpdate,
    ) -> Result<ExperienceCard, CardError> {
        let mut card = self.load_owned(actor, id).await?;
        card.update_content(update)?;
        Ok(self.cards.update(&card).await?)
    }

    /// Applies a settings update.
    pub async fn update_settings(
        &self,
        actor: &UserId,
        id: CardId,
        update: CardSettingsUpdate,
    ) -> Result<ExperienceCard, CardError> {
        let mut card = self.load_owned(actor, id).await?;
        card.update_settings(update);
        Ok(self.cards.update(&card).await?)
    }

    /// Overwrites the owner's live location.
    ///
    /// # Errors
    ///
    /// Rejected unless real-time location sharing is enabled on the
    /// card's settings.
    pub async fn update_location(
        &self,
        actor: &UserId,
        id: CardId,
        point: GeoPoint,
        label: Option<String>,
    ) -> Result<ExperienceCard, CardError> {
        let mut card = self.load_owned(actor, id).await?;
        card.update_owner_location(point, label)?;
        Ok(self.cards.update(&card).await?)
    }

    /// Stops sharing the owner's location.
    pub async fn stop_location(
        &self,
        actor: &UserId,
        id: CardId,
    ) -> Result<ExperienceCard, CardError> {
        let mut card = self.load_owned(actor, id).await?;
        card.stop_location_sharing();
        Ok(self.cards.update(&card).await?)
    }

    /// Hides the card from public view. Reversible.
    pub async fn deactivate(&self, actor: &UserId, id: CardId) -> Result<ExperienceCard, CardError> {
        let mut card = self.load_owned(actor, id).await?;
        card.deactivate();
        info!(card_id = %id, "card deactivated");
        Ok(self.cards.update(&card).await?)
    }

    /// Restores a deactivated card.
    pub async fn reactivate(&self, actor: &UserId, id: CardId) -> Result<ExperienceCard, CardError> {
        let mut card = self.load_owned(actor, id).await?;
        card.reactivate();
        Ok(self.cards.update(&card).await?)
    }

    /// Soft-deletes the card, then clears the card linkage on the
    /// source experience.
    ///
    /// The two steps form a saga: the second is idempotent, and a
    /// retried delete converges even if the first attempt failed
    /// between the steps.
    pub async fn delete(&self, actor: &UserId, id: CardId) -> Result<(), CardError> {
        let mut card = self
            .cards
            .find_by_id(id)
            .await?
            .ok_or(CardError::NotFound(id))?;
        card.check_ownership(actor)?;

        if !card.deleted {
            card.mark_deleted();
            self.cards.update(&card).await?;
            info!(card_id = %id, "card soft-deleted");
        }

        // Step two: clear the back-link. Tolerates an already-cleared
        // linkage so retries converge.
        if let Some(mut experience) = self.experiences.find_by_id(card.experience_id).await? {
            if experience.card_id == Some(card.id) {
                experience.clear_card_link();
                self.experiences.update(&experience).await?;
            }
        }

        Ok(())
    }

    /// Public card view by code; records a view.
    pub async fn view_by_code(
        &self,
        code: &CardCode,
        viewer: Option<&UserId>,
    ) -> Result<PublicCardView, CardError> {
        let card = self.load_viewable(code).await?;

        let updated = match self
            .cards
            .record_engagement(
                card.id,
                Engagement::View {
                    viewer: viewer.cloned(),
                },
            )
            .await
        {
            Ok(updated) => updated,
            // The page must load even if the view count write fails.
            Err(err) => {
                warn!(card_code = %code, error = %err, "failed to record card view");
                card
            }
        };

        Ok(PublicCardView::project(&updated))
    }

    /// Records a share of the card's link.
    pub async fn record_share(
        &self,
        code: &CardCode,
        user: Option<&UserId>,
    ) -> Result<PublicStats, CardError> {
        let card = self.load_viewable(code).await?;
        let updated = self
            .cards
            .record_engagement(card.id, Engagement::Share { user: user.cloned() })
            .await?;

        Ok(PublicCardView::project(&updated).stats)
    }

    /// Toggles the acting user's like on the card.
    ///
    /// Set membership is the single source of truth: liking twice
    /// returns the set (and the reported total) to its original state.
    pub async fn toggle_like(
        &self,
        code: &CardCode,
        user: &UserId,
    ) -> Result<LikeOutcome, CardError> {
        let card = self.load_viewable(code).await?;
        let updated = self
            .cards
            .record_engagement(card.id, Engagement::ToggleLike { user: user.clone() })
            .await?;

        Ok(LikeOutcome {
            liked: updated.is_liked_by(user),
            total_likes: updated.total_likes(),
        })
    }

    /// Toggles the acting user's save on the card.
    pub async fn toggle_save(
        &self,
        code: &CardCode,
        user: &UserId,
    ) -> Result<SaveOutcome, CardError> {
        let card = self.load_viewable(code).await?;
        let updated = self
            .cards
            .record_engagement(card.id, Engagement::ToggleSave { user: user.clone() })
            .await?;

        Ok(SaveOutcome {
            saved: updated.is_saved_by(user),
            total_saves: updated.stats.saves,
        })
    }

    /// Clones the card's trip into a new draft experience owned by the
    /// acting user, through the Experience service.
    pub async fn clone_by_code(
        &self,
        actor: &UserId,
        code: &CardCode,
        new_start: chrono::NaiveDate,
    ) -> Result<Experience, ExperienceError> {
        // Visibility is checked here so a hidden card cannot be cloned
        // by someone who saved its code earlier.
        self.load_viewable(code)
            .await
            .map_err(|err| match err {
                CardError::CodeNotFound(code) => ExperienceError::ShareCodeNotFound(code),
                CardError::Expired => {
                    ExperienceError::Forbidden("card has expired".to_string())
                }
                other => ExperienceError::Infrastructure(other.to_string()),
            })?;

        self.experience_service
            .clone_from_card(actor, code, new_start)
            .await
    }

    /// Distance and coarse travel-time estimate from a viewer to the
    /// card's destination. Stateless; records nothing.
    pub async fn distance_from_viewer(
        &self,
        code: &CardCode,
        viewer: GeoPoint,
    ) -> Result<TravelEstimate, CardError> {
        let card = self.load_viewable(code).await?;
        let destination = card.trip.destination.point.ok_or_else(|| {
            CardError::validation("destination", "destination has no coordinates")
        })?;

        Ok(estimate_travel(viewer, destination))
    }

    async fn load_owned(&self, actor: &UserId, id: CardId) -> Result<ExperienceCard, CardError> {
        let card = self
            .cards
            .find_by_id(id)
            .await?
            .filter(|card| !card.deleted)
            .ok_or(CardError::NotFound(id))?;
        card.check_ownership(actor)?;
        Ok(card)
    }

    async fn load_viewable(&self, code: &CardCode) -> Result<ExperienceCard, CardError> {
        let card = self
            .cards
            .find_by_code(code)
            .await?
            .ok_or_else(|| CardError::code_not_found(code.to_string()))?;

        if card.deleted || !card.is_active || !card.settings.is_public {
            // Hidden cards are indistinguishable from missing ones.
            return Err(CardError::code_not_found(code.to_string()));
        }
        if card.is_expired() {
            return Err(CardError::Expired);
        }
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::discount::StaticDiscountValidator;
    use crate::adapters::media::PlaceholderMediaGenerator;
    use crate::adapters::payment::MockPaymentProvider;
    use crate::adapters::storage::{InMemoryCardRepository, InMemoryExperienceRepository};
    use crate::config::{EngineConfig, SharingConfig};
    use crate::domain::card::CardSettings;
    use crate::domain::experience::{CreateExperience, ItineraryItem};
    use crate::domain::foundation::{
        Location, Money, Timestamp, TravelerCounts,
    };

    struct Harness {
        cards: Arc<InMemoryCardRepository>,
        experiences: Arc<InMemoryExperienceRepository>,
        experience_service: Arc<ExperienceService>,
        service: ExperienceCardService,
    }

    fn harness() -> Harness {
        let experiences = Arc::new(InMemoryExperienceRepository::new());
        let cards = Arc::new(InMemoryCardRepository::new(50));

        let experience_service = Arc::new(ExperienceService::new(
            experiences.clone(),
            cards.clone(),
            Arc::new(MockPaymentProvider::new()),
            Arc::new(StaticDiscountValidator::new()),
            Arc::new(PlaceholderMediaGenerator::new()),
            EngineConfig::default(),
            SharingConfig::default(),
        ));

        let service = ExperienceCardService::new(
            cards.clone(),
            experiences.clone(),
            experience_service.clone(),
        );

        Harness {
            cards,
            experiences,
            experience_service,
            service,
        }
    }

    fn owner() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn viewer() -> UserId {
        UserId::new("viewer-1").unwrap()
    }

    fn start() -> chrono::NaiveDate {
        Timestamp::today() + chrono::Duration::days(30)
    }

    async fn confirmed_card(h: &Harness, settings: Option<CardSettings>) -> ExperienceCard {
        let destination = Location::named("Lagos")
            .unwrap()
            .with_point(GeoPoint::new(6.5244, 3.3792).unwrap());
        let exp = h
            .experience_service
            .create(
                &owner(),
                CreateExperience {
                    title: "Lagos Getaway".to_string(),
                    description: None,
                    destination,
                    origin: None,
                    start_date: start(),
                    end_date: start() + chrono::Duration::days(2),
                    travelers: TravelerCounts::new(2, 0, 0),
                    preferences: vec![],
                    agent_id: None,
                    currency: None,
                },
            )
            .await
            .unwrap();
        h.experience_service
            .add_item(
                &owner(),
                exp.id,
                ItineraryItem::dining(
                    "Tarkwa Grill",
                    Money::from_major(50),
                    2,
                    start() + chrono::Duration::days(1),
                ),
            )
            .await
            .unwrap();
        let outcome = h
            .experience_service
            .checkout(&owner(), exp.id, None)
            .await
            .unwrap();
        h.experience_service
            .confirm_payment(exp.id, &outcome.payment.reference, None, settings)
            .await
            .unwrap()
            .card
    }

    #[tokio::test]
    async fn view_by_code_records_a_view_and_projects() {
        let h = harness();
        let card = confirmed_card(&h, None).await;

        let view = h.service.view_by_code(&card.code, Some(&viewer())).await.unwrap();
        assert_eq!(view.stats.views, 1);
        assert_eq!(view.destination, "Lagos");
        // Default settings hide prices.
        assert!(view.pricing.is_none());

        let stored = h.cards.find_by_id(card.id).await.unwrap().unwrap();
        assert_eq!(stored.stats.views, 1);
        assert_eq!(stored.stats.unique_viewers, 1);
    }

    #[tokio::test]
    async fn view_of_unknown_code_is_not_found() {
        let h = harness();
        let result = h
            .service
            .view_by_code(&CardCode::generate(), None)
            .await;
        assert!(matches!(result, Err(CardError::CodeNotFound(_))));
    }

    #[tokio::test]
    async fn deactivated_card_reads_as_not_found() {
        let h = harness();
        let card = confirmed_card(&h, None).await;

        h.service.deactivate(&owner(), card.id).await.unwrap();
        let result = h.service.view_by_code(&card.code, None).await;
        assert!(matches!(result, Err(CardError::CodeNotFound(_))));

        h.service.reactivate(&owner(), card.id).await.unwrap();
        assert!(h.service.view_by_code(&card.code, None).await.is_ok());
    }

    #[tokio::test]
    async fn expired_card_is_rejected_as_expired() {
        let h = harness();
        let card = confirmed_card(&h, None).await;

        h.service
            .update_settings(
                &owner(),
                card.id,
                CardSettingsUpdate {
                    expires_at: Some(Some(Timestamp::now().add_days(-1))),
                    ..CardSettingsUpdate::default()
                },
            )
            .await
            .unwrap();

        let result = h.service.view_by_code(&card.code, None).await;
        assert!(matches!(result, Err(CardError::Expired)));
    }

    #[tokio::test]
    async fn like_toggle_is_symmetric_through_the_service() {
        let h = harness();
        let card = confirmed_card(&h, None).await;
        let user = viewer();

        let first = h.service.toggle_like(&card.code, &user).await.unwrap();
        assert!(first.liked);
        assert_eq!(first.total_likes, 1);

        let second = h.service.toggle_like(&card.code, &user).await.unwrap();
        assert!(!second.liked);
        assert_eq!(second.total_likes, 0);
    }

    #[tokio::test]
    async fn save_toggle_keeps_counter_in_lockstep() {
        let h = harness();
        let card = confirmed_card(&h, None).await;

        let saved = h.service.toggle_save(&card.code, &viewer()).await.unwrap();
        assert!(saved.saved);
        assert_eq!(saved.total_saves, 1);

        let unsaved = h.service.toggle_save(&card.code, &viewer()).await.unwrap();
        assert!(!unsaved.saved);
        assert_eq!(unsaved.total_saves, 0);
    }

    #[tokio::test]
    async fn share_recording_increments_stats() {
        let h = harness();
        let card = confirmed_card(&h, None).await;

        let stats = h.service.record_share(&card.code, None).await.unwrap();
        assert_eq!(stats.shares, 1);
    }

    #[tokio::test]
    async fn settings_update_is_owner_only() {
        let h = harness();
        let card = confirmed_card(&h, None).await;

        let result = h
            .service
            .update_settings(&viewer(), card.id, CardSettingsUpdate::default())
            .await;
        assert!(matches!(result, Err(CardError::Forbidden(_))));
    }

    #[tokio::test]
    async fn location_updates_are_gated_by_settings() {
        let h = harness();
        let card = confirmed_card(&h, None).await;
        let point = GeoPoint::new(6.5244, 3.3792).unwrap();

        let result = h
            .service
            .update_location(&owner(), card.id, point, None)
            .await;
        assert!(matches!(result, Err(CardError::LocationSharingDisabled)));

        h.service
            .update_settings(
                &owner(),
                card.id,
                CardSettingsUpdate {
                    show_real_time_location: Some(true),
                    ..CardSettingsUpdate::default()
                },
            )
            .await
            .unwrap();

        let updated = h
            .service
            .update_location(&owner(), card.id, point, Some("Ikoyi".to_string()))
            .await
            .unwrap();
        assert!(updated.owner_location.is_some());

        let stopped = h.service.stop_location(&owner(), card.id).await.unwrap();
        assert!(stopped.owner_location.is_none());
    }

    #[tokio::test]
    async fn delete_saga_clears_the_experience_linkage() {
        let h = harness();
        let card = confirmed_card(&h, None).await;

        h.service.delete(&owner(), card.id).await.unwrap();

        let stored = h.cards.find_by_id(card.id).await.unwrap().unwrap();
        assert!(stored.deleted);

        let experience = h
            .experiences
            .find_by_id(card.experience_id)
            .await
            .unwrap()
            .unwrap();
        assert!(experience.card_id.is_none());
        assert!(!experience.card_generated);

        // Retrying the saga converges.
        h.service.delete(&owner(), card.id).await.unwrap();
    }

    #[tokio::test]
    async fn clone_by_code_delegates_to_the_experience_service() {
        let h = harness();
        let card = confirmed_card(&h, None).await;

        let clone = h
            .service
            .clone_by_code(&viewer(), &card.code, start() + chrono::Duration::days(60))
            .await
            .unwrap();
        assert!(clone.is_clone);
        assert_eq!(clone.owner_id, viewer());

        let stored = h.cards.find_by_id(card.id).await.unwrap().unwrap();
        assert_eq!(stored.stats.clones, 1);
    }

    #[tokio::test]
    async fn clone_by_code_respects_visibility() {
        let h = harness();
        let card = confirmed_card(&h, None).await;
        h.service.deactivate(&owner(), card.id).await.unwrap();

        let result = h
            .service
            .clone_by_code(&viewer(), &card.code, start() + chrono::Duration::days(60))
            .await;
        assert!(matches!(result, Err(ExperienceError::ShareCodeNotFound(_))));
    }

    #[tokio::test]
    async fn distance_query_estimates_without_recording() {
        let h = harness();
        let card = confirmed_card(&h, None).await;

        let estimate = h
            .service
            .distance_from_viewer(&card.code, GeoPoint::new(9.0765, 7.3986).unwrap())
            .await
            .unwrap();
        assert!(estimate.distance_km > 400.0);
        assert!(estimate.flight_hours.is_some());

        let stored = h.cards.find_by_id(card.id).await.unwrap().unwrap();
        assert_eq!(stored.stats.views, 0);
    }
}

//! Experience orchestration service.
//!
//! Enforces ownership and lifecycle legality, drives checkout and the
//! payment-confirmation callback, and implements clone-with-date-shift.
//! Every mutation loads the aggregate, applies the domain operation,
//! and writes back through the repository's optimistic version check,
//! so concurrent writers on the same experience never silently lose an
//! update. Every operation returns the freshly recomputed aggregate.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{EngineConfig, SharingConfig};
use crate::domain::card::{
    CardSettings, Engagement, ExperienceCard, OwnerSnapshot,
};
use crate::domain::experience::{
    CreateExperience, Experience, ExperienceError, ExperienceStatus, ExperienceUpdate, ItemPatch,
    ItineraryItem,
};
use crate::domain::foundation::{
    CardCode, ExperienceId, ItemId, OwnedByUser, ShareCode, UserId,
};
use crate::ports::{
    CardRepository, DiscountValidation, DiscountValidator, ExperienceRepository, MediaGenerator,
    PaymentProvider, PaymentRequest, PaymentSession,
};

/// Optional owner profile used to snapshot identity onto a card.
///
/// Supplied by the identity collaborator when available; its absence
/// never blocks confirmation.
#[derive(Debug, Clone, Default)]
pub struct OwnerProfile {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Result of starting checkout.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub experience: Experience,
    pub payment: PaymentSession,
}

/// Result of a confirmed payment: the confirmed experience and its
/// (idempotently generated) card.
#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    pub experience: Experience,
    pub card: ExperienceCard,
}

/// Orchestration layer for the Experience aggregate.
pub struct ExperienceService {
    experiences: Arc<dyn ExperienceRepository>,
    cards: Arc<dyn CardRepository>,
    payments: Arc<dyn PaymentProvider>,
    discounts: Arc<dyn DiscountValidator>,
    media: Arc<dyn MediaGenerator>,
    engine: EngineConfig,
    sharing: SharingConfig,
}

impl ExperienceService {
    pub fn new(
        experiences: Arc<dyn ExperienceRepository>,
        cards: Arc<dyn CardRepository>,
        payments: Arc<dyn PaymentProvider>,
        discounts: Arc<dyn DiscountValidator>,
        media: Arc<dyn MediaGenerator>,
        engine: EngineConfig,
        sharing: SharingConfig,
    ) -> Self {
        Self {
            experiences,
            cards,
            payments,
            discounts,
            media,
            engine,
            sharing,
        }
    }

    /// Creates a new draft experience for the acting user.
    pub async fn create(
        &self,
        actor: &UserId,
        input: CreateExperience,
    ) -> Result<Experience, ExperienceError> {
        let experience =
            Experience::create(actor.clone(), input, self.engine.service_fee_rate())?;
        self.experiences.save(&experience).await?;
        info!(experience_id = %experience.id, owner = %actor, "experience created");
        Ok(experience)
    }

    /// Fetches an experience, owner-scoped.
    pub async fn get(
        &self,
        actor: &UserId,
        id: ExperienceId,
    ) -> Result<Experience, ExperienceError> {
        self.load_owned(actor, id).await
    }

    /// Lists the acting user's experiences.
    pub async fn list_for_owner(&self, actor: &UserId) -> Result<Vec<Experience>, ExperienceError> {
        Ok(self.experiences.find_by_owner(actor).await?)
    }

    /// Canonical public URL for an experience's share page.
    pub fn share_url_for(&self, experience: &Experience) -> String {
        format!(
            "{}/{}",
            self.sharing.experience_url_base.trim_end_matches('/'),
            experience.share_code
        )
    }

    /// Public share-page fetch by share code; records a view.
    pub async fn view_by_share_code(
        &self,
        code: &ShareCode,
    ) -> Result<Experience, ExperienceError> {
        let mut experience = self
            .experiences
            .find_by_share_code(code)
            .await?
            .filter(|exp| !exp.deleted)
            .ok_or_else(|| ExperienceError::ShareCodeNotFound(code.to_string()))?;

        experience.record_view();
        match self.experiences.update(&experience).await {
            Ok(persisted) => Ok(persisted),
            // A lost view under concurrent traffic is acceptable; the
            // page itself must still load.
            Err(err) => {
                warn!(share_code = %code, error = %err, "failed to record share-page view");
                Ok(experience)
            }
        }
    }

    /// Updates trip parameters while the experience is mutable.
    pub async fn update(
        &self,
        actor: &UserId,
        id: ExperienceId,
        update: ExperienceUpdate,
    ) -> Result<Experience, ExperienceError> {
        let mut experience = self.load_owned(actor, id).await?;
        experience.update_details(update)?;
        Ok(self.experiences.update(&experience).await?)
    }

    /// Soft-deletes an experience.
    pub async fn delete(&self, actor: &UserId, id: ExperienceId) -> Result<(), ExperienceError> {
        let mut experience = self.load_owned(actor, id).await?;
        experience.mark_deleted()?;
        self.experiences.update(&experience).await?;
        info!(experience_id = %id, "experience soft-deleted");
        Ok(())
    }

    /// Adds an item built by one of the typed constructors.
    pub async fn add_item(
        &self,
        actor: &UserId,
        id: ExperienceId,
        item: ItineraryItem,
    ) -> Result<Experience, ExperienceError> {
        let mut experience = self.load_owned(actor, id).await?;
        experience.add_item(item)?;
        debug!(experience_id = %id, "item added, derived state recomputed");
        Ok(self.experiences.update(&experience).await?)
    }

    /// Applies a partial update to an item.
    pub async fn update_item(
        &self,
        actor: &UserId,
        id: ExperienceId,
        item_id: ItemId,
        patch: ItemPatch,
    ) -> Result<Experience, ExperienceError> {
        let mut experience = self.load_owned(actor, id).await?;
        experience.update_item(item_id, patch)?;
        Ok(self.experiences.update(&experience).await?)
    }

    /// Removes an item by id.
    pub async fn remove_item(
        &self,
        actor: &UserId,
        id: ExperienceId,
        item_id: ItemId,
    ) -> Result<Experience, ExperienceError> {
        let mut experience = self.load_owned(actor, id).await?;
        experience.remove_item(item_id)?;
        Ok(self.experiences.update(&experience).await?)
    }

    /// Reorders items to match the given id order; omitted items are
    /// appended in their previous relative order.
    pub async fn reorder_items(
        &self,
        actor: &UserId,
        id: ExperienceId,
        order: Vec<ItemId>,
    ) -> Result<Experience, ExperienceError> {
        let mut experience = self.load_owned(actor, id).await?;
        experience.reorder_items(&order)?;
        Ok(self.experiences.update(&experience).await?)
    }

    /// Validates a discount code against the external allow-list and
    /// applies it.
    pub async fn apply_discount(
        &self,
        actor: &UserId,
        id: ExperienceId,
        code: &str,
    ) -> Result<Experience, ExperienceError> {
        let mut experience = self.load_owned(actor, id).await?;
        let rate = self.validate_discount(code).await?;
        experience.apply_discount(code, rate)?;
        Ok(self.experiences.update(&experience).await?)
    }

    /// Starts checkout: recomputes totals, transitions to pending, and
    /// opens a payment session with the external provider.
    pub async fn checkout(
        &self,
        actor: &UserId,
        id: ExperienceId,
        discount_code: Option<&str>,
    ) -> Result<CheckoutOutcome, ExperienceError> {
        let mut experience = self.load_owned(actor, id).await?;

        if let Some(code) = discount_code {
            let rate = self.validate_discount(code).await?;
            experience.apply_discount(code, rate)?;
        }

        experience.begin_checkout()?;

        let session = self
            .payments
            .create_payment(PaymentRequest {
                experience_id: experience.id,
                amount: experience.pricing().grand_total,
                currency: experience.pricing().currency.clone(),
                description: format!("Wayfarer trip: {}", experience.title),
                idempotency_key: Some(format!("exp-{}", experience.id)),
            })
            .await
            .map_err(|err| ExperienceError::payment_failed(err.message))?;

        experience.payment_reference = Some(session.reference.clone());
        let persisted = self.experiences.update(&experience).await?;
        info!(
            experience_id = %id,
            amount = %persisted.pricing().grand_total,
            "checkout started"
        );

        Ok(CheckoutOutcome {
            experience: persisted,
            payment: session,
        })
    }

    /// Lands the payment provider's success callback.
    ///
    /// Confirms the experience and generates its card as one logical
    /// transition. The whole operation is idempotent: a retried
    /// callback on an already confirmed experience returns the
    /// existing card instead of failing or duplicating it.
    pub async fn confirm_payment(
        &self,
        id: ExperienceId,
        payment_reference: &str,
        owner_profile: Option<OwnerProfile>,
        card_settings: Option<CardSettings>,
    ) -> Result<ConfirmOutcome, ExperienceError> {
        let mut experience = self
            .experiences
            .find_by_id(id)
            .await?
            .filter(|exp| !exp.deleted)
            .ok_or(ExperienceError::NotFound(id))?;

        if let Some(expected) = &experience.payment_reference {
            if expected != payment_reference {
                return Err(ExperienceError::payment_failed(format!(
                    "unknown payment reference '{}'",
                    payment_reference
                )));
            }
        }

        // Retried callback: the transition already happened, return the
        // existing card.
        if experience.status == ExperienceStatus::Confirmed && experience.card_generated {
            if let Some(card) = self.cards.find_by_experience_id(id).await? {
                debug!(experience_id = %id, card_id = %card.id, "confirmation retried, returning existing card");
                return Ok(ConfirmOutcome { experience, card });
            }
        }

        experience.confirm_payment()?;

        let card = self
            .generate_card(&experience, owner_profile.unwrap_or_default(), card_settings)
            .await?;

        experience.attach_card(card.id);
        let persisted = self.experiences.update(&experience).await?;
        info!(experience_id = %id, card_id = %card.id, "payment confirmed, card generated");

        Ok(ConfirmOutcome {
            experience: persisted,
            card,
        })
    }

    /// Clones the experience behind a card into a fresh draft owned by
    /// the acting user, with all dates shifted to the new start.
    pub async fn clone_from_card(
        &self,
        actor: &UserId,
        card_code: &CardCode,
        new_start: chrono::NaiveDate,
    ) -> Result<Experience, ExperienceError> {
        let card = self
            .cards
            .find_by_code(card_code)
            .await?
            .filter(|card| !card.deleted)
            .ok_or_else(|| {
                ExperienceError::ShareCodeNotFound(card_code.to_string())
            })?;

        if !card.settings.allow_cloning {
            return Err(ExperienceError::Forbidden(
                "cloning is disabled for this card".to_string(),
            ));
        }

        let source = self
            .experiences
            .find_by_id(card.experience_id)
            .await?
            .ok_or(ExperienceError::NotFound(card.experience_id))?;

        let clone = Experience::clone_from(
            &source,
            card.code.clone(),
            actor.clone(),
            new_start,
            self.engine.service_fee_rate(),
        )?;
        self.experiences.save(&clone).await?;

        // Engagement recording is retryable on its own; a failure here
        // must not roll back the clone the user already owns.
        if let Err(err) = self
            .cards
            .record_engagement(
                card.id,
                Engagement::Clone {
                    experience_id: clone.id,
                    user: actor.clone(),
                },
            )
            .await
        {
            warn!(card_id = %card.id, error = %err, "failed to record clone on card");
        }

        match self.experiences.find_by_id(source.id).await {
            Ok(Some(mut fresh_source)) => {
                fresh_source.record_clone();
                if let Err(err) = self.experiences.update(&fresh_source).await {
                    warn!(experience_id = %source.id, error = %err, "failed to bump source clone counter");
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(experience_id = %source.id, error = %err, "failed to reload source for clone counter");
            }
        }

        info!(
            card_code = %card_code,
            clone_id = %clone.id,
            owner = %actor,
            "experience cloned from card"
        );
        Ok(clone)
    }

    /// Cancels an experience.
    pub async fn cancel(
        &self,
        actor: &UserId,
        id: ExperienceId,
    ) -> Result<Experience, ExperienceError> {
        let mut experience = self.load_owned(actor, id).await?;
        experience.cancel()?;
        Ok(self.experiences.update(&experience).await?)
    }

    /// Idempotently generates the card for a confirmed experience.
    async fn generate_card(
        &self,
        experience: &Experience,
        profile: OwnerProfile,
        settings: Option<CardSettings>,
    ) -> Result<ExperienceCard, ExperienceError> {
        if let Some(existing) = self
            .cards
            .find_by_experience_id(experience.id)
            .await?
        {
            return Ok(existing);
        }

        let owner = OwnerSnapshot {
            user_id: experience.owner_id.clone(),
            display_name: profile.display_name,
            avatar_url: profile.avatar_url,
        };
        let mut card = ExperienceCard::from_experience(
            experience,
            owner,
            settings.unwrap_or_default(),
            &self.sharing.card_url_base,
            self.engine.highlight_cap,
        )
        .map_err(|err| ExperienceError::Infrastructure(err.to_string()))?;

        // QR generation is cosmetic; its failure never blocks the
        // confirmation transition.
        match self.media.qr_for(&card.share_url).await {
            Ok(media) => card.qr_image = Some(media.0),
            Err(err) => {
                warn!(card_id = %card.id, error = %err, "QR generation failed");
            }
        }

        self.cards.save(&card).await?;
        Ok(card)
    }

    async fn validate_discount(&self, code: &str) -> Result<crate::domain::foundation::Percentage, ExperienceError> {
        match self.discounts.validate(code).await? {
            DiscountValidation::Valid { rate, .. } => Ok(rate),
            DiscountValidation::Invalid(reason) => Err(ExperienceError::invalid_discount(
                code,
                reason.user_message(),
            )),
        }
    }

    async fn load_owned(
        &self,
        actor: &UserId,
        id: ExperienceId,
    ) -> Result<Experience, ExperienceError> {
        let experience = self
            .experiences
            .find_by_id(id)
            .await?
            .filter(|exp| !exp.deleted)
            .ok_or(ExperienceError::NotFound(id))?;
        experience.check_ownership(actor)?;
        Ok(experience)
    }
}

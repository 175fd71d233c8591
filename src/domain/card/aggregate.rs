//! Experience Card aggregate entity.
//!
//! A card is the publicly shareable snapshot of a confirmed Experience.
//! It owns its own copies of the trip data — destination, dates,
//! travelers, pricing — so later edits to the source experience never
//! retroactively change a published card. The only live link back is
//! the source experience id.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::experience::{DayBucket, Experience, ExperienceStatus, ItemType};
use crate::domain::foundation::{
    CardCode, CardId, Currency, ExperienceId, GeoPoint, Location, Money, OwnedByUser, Timestamp,
    TravelerCounts, UserId,
};

use super::errors::CardError;
use super::settings::{CardSettings, CardSettingsUpdate};
use super::stats::{CardStats, Engagement, InteractionKind};

/// Frozen owner identity captured at card creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSnapshot {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Frozen trip parameters captured at card creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSnapshot {
    pub destination: Location,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub travelers: TravelerCounts,
}

/// Frozen pricing captured at card creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSnapshot {
    pub items_subtotal: Money,
    pub service_fee: Money,
    pub grand_total: Money,
    pub price_per_person: Money,
    pub currency: Currency,
}

/// A teaser item derived from the source experience's itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardHighlight {
    pub item_type: ItemType,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// The owner's live location, shared while the setting allows it.
///
/// Only the current position is kept; no history is retained here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerLocation {
    pub point: GeoPoint,
    pub label: Option<String>,
    pub updated_at: Timestamp,
}

/// Partial update of the card's editable presentation fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardContentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
}

/// The shareable snapshot of a confirmed Experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceCard {
    pub id: CardId,
    pub code: CardCode,
    pub experience_id: ExperienceId,

    pub owner: OwnerSnapshot,

    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub qr_image: Option<String>,
    pub share_url: String,

    pub trip: TripSnapshot,
    pub highlights: Vec<CardHighlight>,
    /// Full itinerary copy, captured only when opted in at creation.
    pub itinerary: Option<Vec<DayBucket>>,
    pub pricing: Option<PricingSnapshot>,

    pub settings: CardSettings,
    pub stats: CardStats,

    pub owner_location: Option<OwnerLocation>,

    pub liked_by: HashSet<UserId>,
    pub saved_by: HashSet<UserId>,

    /// Experiences spawned by cloning this card.
    pub cloned_to: Vec<ExperienceId>,

    pub is_active: bool,
    pub deleted: bool,
    pub version: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ExperienceCard {
    /// Materializes a card from a confirmed Experience.
    ///
    /// Copies the trip fields, derives up to `highlight_cap` highlights
    /// from the source's items, and freezes a pricing snapshot. The
    /// full itinerary is copied only when the settings opt in.
    ///
    /// # Errors
    ///
    /// Returns `SourceNotConfirmed` unless the experience status is
    /// `confirmed`.
    pub fn from_experience(
        experience: &Experience,
        owner: OwnerSnapshot,
        settings: CardSettings,
        share_url_base: &str,
        highlight_cap: usize,
    ) -> Result<Self, CardError> {
        if experience.status != ExperienceStatus::Confirmed {
            return Err(CardError::SourceNotConfirmed {
                status: experience.status.to_string(),
            });
        }

        let code = CardCode::generate();
        let share_url = format!("{}/{}", share_url_base.trim_end_matches('/'), code);

        let highlights = experience
            .items()
            .iter()
            .take(highlight_cap)
            .map(|item| CardHighlight {
                item_type: item.item_type,
                name: item.name.clone(),
                description: item.location_name.clone(),
                image_url: None,
            })
            .collect();

        let pricing = experience.pricing();
        let now = Timestamp::now();

        Ok(Self {
            id: CardId::new(),
            code,
            experience_id: experience.id,
            owner,
            title: experience.title.clone(),
            description: experience.description.clone(),
            cover_image: None,
            qr_image: None,
            share_url,
            trip: TripSnapshot {
                destination: experience.destination.clone(),
                start_date: experience.start_date,
                end_date: experience.end_date,
                travelers: experience.travelers,
            },
            highlights,
            itinerary: settings
                .include_full_itinerary
                .then(|| experience.itinerary().to_vec()),
            pricing: Some(PricingSnapshot {
                items_subtotal: pricing.items_subtotal,
                service_fee: pricing.service_fee,
                grand_total: pricing.grand_total,
                price_per_person: pricing.price_per_person,
                currency: pricing.currency.clone(),
            }),
            settings,
            stats: CardStats::default(),
            owner_location: None,
            liked_by: HashSet::new(),
            saved_by: HashSet::new(),
            cloned_to: Vec::new(),
            is_active: true,
            deleted: false,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an engagement event: counter increments, toggle set
    /// membership, lineage, and the bounded interaction log.
    ///
    /// Storage adapters call this under their own lock so concurrent
    /// engagements are never lost to read-modify-write races.
    pub fn apply_engagement(&mut self, engagement: Engagement, log_cap: usize) {
        match engagement {
            Engagement::View { viewer } => {
                self.stats.views += 1;
                let is_unique = viewer
                    .as_ref()
                    .map(|user| !self.stats.has_logged_view_by(user))
                    .unwrap_or(false);
                if is_unique {
                    self.stats.unique_viewers += 1;
                }
                self.stats.push_interaction(InteractionKind::View, viewer, log_cap);
            }
            Engagement::Share { user } => {
                self.stats.shares += 1;
                self.stats.push_interaction(InteractionKind::Share, user, log_cap);
            }
            Engagement::Clone {
                experience_id,
                user,
            } => {
                self.stats.clones += 1;
                self.cloned_to.push(experience_id);
                self.stats
                    .push_interaction(InteractionKind::Clone, Some(user), log_cap);
            }
            Engagement::ToggleLike { user } => {
                if self.liked_by.remove(&user) {
                    self.stats
                        .push_interaction(InteractionKind::Unlike, Some(user), log_cap);
                } else {
                    self.liked_by.insert(user.clone());
                    self.stats
                        .push_interaction(InteractionKind::Like, Some(user), log_cap);
                }
            }
            Engagement::ToggleSave { user } => {
                let kind = if self.saved_by.remove(&user) {
                    InteractionKind::Unsave
                } else {
                    self.saved_by.insert(user.clone());
                    InteractionKind::Save
                };
                // The save counter tracks set size exactly, so the two
                // can never drift apart.
                self.stats.saves = self.saved_by.len() as u64;
                self.stats.push_interaction(kind, Some(user), log_cap);
            }
        }
        self.touch();
    }

    /// Number of likes; always the like-set's size.
    pub fn total_likes(&self) -> u64 {
        self.liked_by.len() as u64
    }

    /// True if the given user currently likes the card.
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.liked_by.contains(user)
    }

    /// True if the given user currently has the card saved.
    pub fn is_saved_by(&self, user: &UserId) -> bool {
        self.saved_by.contains(user)
    }

    /// Updates the editable presentation fields.
    pub fn update_content(&mut self, update: CardContentUpdate) -> Result<(), CardError> {
        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(CardError::validation("title", "title cannot be empty"));
            }
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(cover) = update.cover_image {
            self.cover_image = Some(cover);
        }
        self.touch();
        Ok(())
    }

    /// Applies a settings update.
    pub fn update_settings(&mut self, update: CardSettingsUpdate) {
        self.settings.apply(update);
        self.touch();
    }

    /// Overwrites the owner's current location.
    ///
    /// # Errors
    ///
    /// Rejected unless real-time location sharing is enabled.
    pub fn update_owner_location(
        &mut self,
        point: GeoPoint,
        label: Option<String>,
    ) -> Result<(), CardError> {
        if !self.settings.show_real_time_location {
            return Err(CardError::LocationSharingDisabled);
        }
        self.owner_location = Some(OwnerLocation {
            point,
            label,
            updated_at: Timestamp::now(),
        });
        self.touch();
        Ok(())
    }

    /// Stops sharing the owner's location and clears the stored point.
    pub fn stop_location_sharing(&mut self) {
        self.owner_location = None;
        self.touch();
    }

    /// True once the configured expiry instant has passed.
    pub fn is_expired(&self) -> bool {
        self.settings
            .expires_at
            .map(|expiry| Timestamp::now().is_after(&expiry))
            .unwrap_or(false)
    }

    /// True when the card may be served to the public.
    pub fn is_viewable(&self) -> bool {
        self.is_active && !self.deleted && self.settings.is_public && !self.is_expired()
    }

    /// Hides the card from public view. Reversible.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    /// Restores a deactivated card.
    pub fn reactivate(&mut self) {
        self.is_active = true;
        self.touch();
    }

    /// Soft-deletes the card. The service clears the experience's card
    /// linkage as the second saga step.
    pub fn mark_deleted(&mut self) {
        self.deleted = true;
        self.is_active = false;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

impl OwnedByUser for ExperienceCard {
    fn owner_id(&self) -> &UserId {
        &self.owner.user_id
    }
}

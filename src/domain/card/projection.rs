//! Public projection of an Experience Card.
//!
//! The projection is re-derived from the card and its settings on every
//! read; it is never cached pre-filtered. Anything the settings do not
//! explicitly reveal — owner identity, prices, live location, the full
//! itinerary — is absent from the projection, not merely nulled at the
//! transport layer.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::experience::{trip_length_days, ItemType};
use crate::domain::foundation::Money;

use super::aggregate::{CardHighlight, ExperienceCard, OwnerLocation};

/// Engagement numbers safe for public display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicStats {
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
    pub clones: u64,
    pub saves: u64,
}

/// Pricing fields revealed only when `show_prices` is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicPricing {
    pub grand_total: Money,
    pub price_per_person: Money,
    pub currency: String,
}

/// One itinerary entry on the public view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicItineraryEntry {
    pub item_type: ItemType,
    pub name: String,
    pub location_name: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Money>,
}

/// One day on the public itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicItineraryDay {
    pub day_number: u32,
    pub date: NaiveDate,
    pub entries: Vec<PublicItineraryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<Money>,
}

/// What an anonymous viewer sees when opening a card by its code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicCardView {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub qr_image: Option<String>,
    pub share_url: String,

    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: u32,
    pub traveler_count: u32,

    pub highlights: Vec<CardHighlight>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<Vec<PublicItineraryDay>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PublicPricing>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_location: Option<OwnerLocation>,

    pub allow_cloning: bool,
    pub stats: PublicStats,
}

impl PublicCardView {
    /// Derives the public view from the card's current state and
    /// settings.
    pub fn project(card: &ExperienceCard) -> Self {
        let settings = &card.settings;

        let pricing = if settings.show_prices {
            card.pricing.as_ref().map(|snapshot| PublicPricing {
                grand_total: snapshot.grand_total,
                price_per_person: snapshot.price_per_person,
                currency: snapshot.currency.as_str().to_string(),
            })
        } else {
            None
        };

        let itinerary = if settings.include_full_itinerary {
            card.itinerary.as_ref().map(|days| {
                days.iter()
                    .map(|day| PublicItineraryDay {
                        day_number: day.day_number,
                        date: day.date,
                        entries: day
                            .items
                            .iter()
                            .map(|item| PublicItineraryEntry {
                                item_type: item.item_type,
                                name: item.name.clone(),
                                location_name: item.location_name.clone(),
                                start_time: item.start_time,
                                end_time: item.end_time,
                                total_price: settings.show_prices.then_some(item.total_price),
                            })
                            .collect(),
                        total_cost: settings.show_prices.then_some(day.total_cost),
                    })
                    .collect()
            })
        } else {
            None
        };

        let owner_name = settings
            .show_owner_name
            .then(|| card.owner.display_name.clone())
            .flatten();
        // The avatar is only revealed together with the name.
        let owner_avatar = (settings.show_owner_name && settings.show_owner_avatar)
            .then(|| card.owner.avatar_url.clone())
            .flatten();

        let owner_location = if settings.show_real_time_location {
            card.owner_location.clone()
        } else {
            None
        };

        Self {
            code: card.code.to_string(),
            title: card.title.clone(),
            description: card.description.clone(),
            cover_image: card.cover_image.clone(),
            qr_image: card.qr_image.clone(),
            share_url: card.share_url.clone(),
            destination: card.trip.destination.name.clone(),
            start_date: card.trip.start_date,
            end_date: card.trip.end_date,
            duration_days: trip_length_days(card.trip.start_date, card.trip.end_date),
            traveler_count: card.trip.travelers.total(),
            highlights: card.highlights.clone(),
            itinerary,
            pricing,
            owner_name,
            owner_avatar,
            owner_location,
            allow_cloning: settings.allow_cloning,
            stats: PublicStats {
                views: card.stats.views,
                likes: card.total_likes(),
                shares: card.stats.shares,
                clones: card.stats.clones,
                saves: card.stats.saves,
            },
        }
    }
}

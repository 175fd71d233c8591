//! Experience aggregate entity.
//!
//! The Experience is the mutable trip-in-progress a user builds by
//! adding bookable items. Pricing and the day-by-day itinerary are
//! derived fields, recomputed wholesale after every mutation; no code
//! path mutates the item collection without triggering a recompute,
//! which is why the collection is private to this module.
//!
//! # Invariants
//!
//! - `share_code` is globally unique and assigned once, at creation
//! - pricing totals are a pure function of items + traveler count
//! - itinerary buckets cover every calendar day of the trip, inclusive
//! - item mutation is rejected once the status has left draft/pending

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AgentId, CardCode, CardId, Currency, ExperienceId, ItemId, Location, OwnedByUser, Percentage,
    ShareCode, StateMachine, Timestamp, TravelerCounts, UserId,
};

use super::errors::ExperienceError;
use super::item::{ItemPatch, ItineraryItem};
use super::itinerary::{build_itinerary, DayBucket};
use super::pricing::PriceBreakdown;
use super::status::ExperienceStatus;

/// Input for creating a new Experience.
#[derive(Debug, Clone)]
pub struct CreateExperience {
    pub title: String,
    pub description: Option<String>,
    pub destination: Location,
    pub origin: Option<Location>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: TravelerCounts,
    pub preferences: Vec<String>,
    pub agent_id: Option<AgentId>,
    pub currency: Option<Currency>,
}

/// Partial update of trip parameters. `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct ExperienceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub destination: Option<Location>,
    pub origin: Option<Location>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub travelers: Option<TravelerCounts>,
    pub preferences: Option<Vec<String>>,
}

/// The mutable trip-builder aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: ExperienceId,
    pub owner_id: UserId,
    pub agent_id: Option<AgentId>,

    pub title: String,
    pub description: Option<String>,
    pub destination: Location,
    pub origin: Option<Location>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: TravelerCounts,
    pub preferences: Vec<String>,

    items: Vec<ItineraryItem>,
    itinerary: Vec<DayBucket>,
    pricing: PriceBreakdown,

    pub status: ExperienceStatus,

    pub share_code: ShareCode,
    pub view_count: u64,
    pub share_count: u64,
    pub clone_count: u64,

    pub card_id: Option<CardId>,
    pub card_generated: bool,

    pub cloned_from_experience: Option<ExperienceId>,
    pub cloned_from_card: Option<CardCode>,
    pub is_clone: bool,

    pub payment_reference: Option<String>,

    pub deleted: bool,
    pub version: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Experience {
    /// Creates a new draft Experience.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the title is blank, the start date
    /// is in the past, or the end date precedes the start date.
    pub fn create(
        owner_id: UserId,
        input: CreateExperience,
        service_fee_rate: Percentage,
    ) -> Result<Self, ExperienceError> {
        if input.title.trim().is_empty() {
            return Err(ExperienceError::validation("title", "title cannot be empty"));
        }
        if input.start_date < Timestamp::today() {
            return Err(ExperienceError::validation(
                "start_date",
                "trip cannot start in the past",
            ));
        }
        Self::validate_date_range(input.start_date, input.end_date)?;

        let currency = input.currency.unwrap_or_default();
        let now = Timestamp::now();
        let mut experience = Self {
            id: ExperienceId::new(),
            owner_id,
            agent_id: input.agent_id,
            title: input.title,
            description: input.description,
            destination: input.destination,
            origin: input.origin,
            start_date: input.start_date,
            end_date: input.end_date,
            travelers: input.travelers,
            preferences: input.preferences,
            items: Vec::new(),
            itinerary: Vec::new(),
            pricing: PriceBreakdown::new(service_fee_rate, currency),
            status: ExperienceStatus::Draft,
            share_code: ShareCode::generate(),
            view_count: 0,
            share_count: 0,
            clone_count: 0,
            card_id: None,
            card_generated: false,
            cloned_from_experience: None,
            cloned_from_card: None,
            is_clone: false,
            payment_reference: None,
            deleted: false,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        experience.recompute_derived();
        Ok(experience)
    }

    /// Creates a new draft Experience from a card's source, with every
    /// item's schedule shifted to the new start date.
    ///
    /// Items keep their pricing fields; booking state is reset. The
    /// clone records provenance back to the source experience and the
    /// card it was cloned through.
    pub fn clone_from(
        source: &Experience,
        card_code: CardCode,
        new_owner: UserId,
        new_start: NaiveDate,
        service_fee_rate: Percentage,
    ) -> Result<Self, ExperienceError> {
        if new_start < Timestamp::today() {
            return Err(ExperienceError::validation(
                "start_date",
                "trip cannot start in the past",
            ));
        }

        let offset_days = (new_start - source.start_date).num_days();
        let new_end = source.end_date + chrono::Duration::days(offset_days);

        let items = source
            .items
            .iter()
            .map(|item| {
                let mut item = item.clone();
                item.shift_schedule(offset_days);
                item.reset_booking();
                item
            })
            .collect();

        let now = Timestamp::now();
        let mut clone = Self {
            id: ExperienceId::new(),
            owner_id: new_owner,
            agent_id: None,
            title: source.title.clone(),
            description: source.description.clone(),
            destination: source.destination.clone(),
            origin: source.origin.clone(),
            start_date: new_start,
            end_date: new_end,
            travelers: source.travelers,
            preferences: source.preferences.clone(),
            items,
            itinerary: Vec::new(),
            pricing: PriceBreakdown::new(service_fee_rate, source.pricing.currency.clone()),
            status: ExperienceStatus::Draft,
            share_code: ShareCode::generate(),
            view_count: 0,
            share_count: 0,
            clone_count: 0,
            card_id: None,
            card_generated: false,
            cloned_from_experience: Some(source.id),
            cloned_from_card: Some(card_code),
            is_clone: true,
            payment_reference: None,
            deleted: false,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        clone.recompute_derived();
        Ok(clone)
    }

    /// The item collection, in sort order.
    pub fn items(&self) -> &[ItineraryItem] {
        &self.items
    }

    /// The derived day-by-day itinerary.
    pub fn itinerary(&self) -> &[DayBucket] {
        &self.itinerary
    }

    /// The derived pricing breakdown.
    pub fn pricing(&self) -> &PriceBreakdown {
        &self.pricing
    }

    /// Trip length in days, inclusive of both endpoints.
    pub fn trip_length_days(&self) -> u32 {
        super::itinerary::trip_length_days(self.start_date, self.end_date)
    }

    /// Appends an item, assigning it the next ordering index.
    ///
    /// # Errors
    ///
    /// Rejected once the status has progressed past pending.
    pub fn add_item(&mut self, mut item: ItineraryItem) -> Result<ItemId, ExperienceError> {
        self.ensure_mutable("add items to")?;
        item.sort_order = self.items.len() as u32;
        let id = item.id;
        self.items.push(item);
        self.recompute_derived();
        Ok(id)
    }

    /// Applies a partial update to the item with the given id.
    pub fn update_item(&mut self, id: ItemId, patch: ItemPatch) -> Result<(), ExperienceError> {
        self.ensure_mutable("update items of")?;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(ExperienceError::ItemNotFound(id))?;
        item.apply_patch(patch);
        self.recompute_derived();
        Ok(())
    }

    /// Removes the item with the given id.
    pub fn remove_item(&mut self, id: ItemId) -> Result<(), ExperienceError> {
        self.ensure_mutable("remove items from")?;
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            return Err(ExperienceError::ItemNotFound(id));
        }
        self.recompute_derived();
        Ok(())
    }

    /// Reassigns ordering indices to match the given id order.
    ///
    /// Ids listed take the given order; items omitted from the list are
    /// appended afterwards preserving their previous relative order. An
    /// id that does not belong to this experience is a validation error.
    pub fn reorder_items(&mut self, order: &[ItemId]) -> Result<(), ExperienceError> {
        self.ensure_mutable("reorder items of")?;

        for id in order {
            if !self.items.iter().any(|item| item.id == *id) {
                return Err(ExperienceError::validation(
                    "order",
                    format!("unknown item id {}", id),
                ));
            }
        }

        let mut remaining = std::mem::take(&mut self.items);
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in order {
            if let Some(pos) = remaining.iter().position(|item| item.id == *id) {
                reordered.push(remaining.remove(pos));
            }
        }
        reordered.append(&mut remaining);

        for (index, item) in reordered.iter_mut().enumerate() {
            item.sort_order = index as u32;
        }
        self.items = reordered;
        self.recompute_derived();
        Ok(())
    }

    /// Updates trip parameters while the experience is still mutable.
    ///
    /// Date or traveler changes trigger a full recompute, which also
    /// re-derives every item's day number.
    pub fn update_details(&mut self, update: ExperienceUpdate) -> Result<(), ExperienceError> {
        self.ensure_mutable("update")?;

        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(ExperienceError::validation("title", "title cannot be empty"));
            }
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(destination) = update.destination {
            self.destination = destination;
        }
        if let Some(origin) = update.origin {
            self.origin = Some(origin);
        }

        let start = update.start_date.unwrap_or(self.start_date);
        let end = update.end_date.unwrap_or(self.end_date);
        Self::validate_date_range(start, end)?;
        self.start_date = start;
        self.end_date = end;

        if let Some(travelers) = update.travelers {
            self.travelers = travelers;
        }
        if let Some(preferences) = update.preferences {
            self.preferences = preferences;
        }

        self.recompute_derived();
        Ok(())
    }

    /// Records a validated discount and recomputes totals.
    pub fn apply_discount(
        &mut self,
        code: impl Into<String>,
        rate: Percentage,
    ) -> Result<(), ExperienceError> {
        self.ensure_mutable("apply a discount to")?;
        self.pricing.set_discount(code, rate);
        self.recompute_derived();
        Ok(())
    }

    /// Starts checkout: freezes totals and moves to pending.
    ///
    /// # Errors
    ///
    /// Requires at least one item and a draft or pending status.
    pub fn begin_checkout(&mut self) -> Result<(), ExperienceError> {
        if self.items.is_empty() {
            return Err(ExperienceError::validation(
                "items",
                "cannot check out an empty experience",
            ));
        }
        if !self.status.is_mutable() {
            return Err(ExperienceError::invalid_state(self.status, "check out"));
        }
        self.recompute_derived();
        if self.status == ExperienceStatus::Draft {
            self.transition(ExperienceStatus::Pending, "check out")?;
        }
        Ok(())
    }

    /// Lands the payment confirmation callback: marks the trip fully
    /// paid and moves to confirmed.
    ///
    /// The transition itself is strict (pending only); retried
    /// callbacks are absorbed by the service, which detects an already
    /// confirmed experience with a generated card.
    pub fn confirm_payment(&mut self) -> Result<(), ExperienceError> {
        self.transition(ExperienceStatus::Confirmed, "confirm payment for")?;
        self.pricing.mark_paid_in_full();
        self.touch();
        Ok(())
    }

    /// Links the generated card to this experience.
    pub fn attach_card(&mut self, card_id: CardId) {
        self.card_id = Some(card_id);
        self.card_generated = true;
        self.touch();
    }

    /// Clears the card linkage (second step of the card-deletion saga).
    ///
    /// Safe to call when no card is linked, so retries converge.
    pub fn clear_card_link(&mut self) {
        self.card_id = None;
        self.card_generated = false;
        self.touch();
    }

    /// Cancels the trip.
    pub fn cancel(&mut self) -> Result<(), ExperienceError> {
        self.transition(ExperienceStatus::Cancelled, "cancel")?;
        self.touch();
        Ok(())
    }

    /// Marks the trip as underway.
    pub fn start_trip(&mut self) -> Result<(), ExperienceError> {
        self.transition(ExperienceStatus::InProgress, "start")?;
        self.touch();
        Ok(())
    }

    /// Marks the trip as completed.
    pub fn complete_trip(&mut self) -> Result<(), ExperienceError> {
        self.transition(ExperienceStatus::Completed, "complete")?;
        self.touch();
        Ok(())
    }

    /// Soft-deletes the experience.
    ///
    /// # Errors
    ///
    /// Forbidden once the trip is confirmed or underway.
    pub fn mark_deleted(&mut self) -> Result<(), ExperienceError> {
        if !self.status.allows_deletion() {
            return Err(ExperienceError::invalid_state(self.status, "delete"));
        }
        self.deleted = true;
        self.touch();
        Ok(())
    }

    /// Records a public view of the share page.
    pub fn record_view(&mut self) {
        self.view_count += 1;
        self.touch();
    }

    /// Records a share of the share link.
    pub fn record_share(&mut self) {
        self.share_count += 1;
        self.touch();
    }

    /// Records a clone taken from this experience's card.
    pub fn record_clone(&mut self) {
        self.clone_count += 1;
        self.touch();
    }

    fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ExperienceError> {
        if end < start {
            return Err(ExperienceError::validation(
                "end_date",
                "end date cannot precede start date",
            ));
        }
        Ok(())
    }

    fn ensure_mutable(&self, attempted: &str) -> Result<(), ExperienceError> {
        if self.status.is_mutable() {
            Ok(())
        } else {
            Err(ExperienceError::invalid_state(self.status, attempted))
        }
    }

    fn transition(
        &mut self,
        target: ExperienceStatus,
        attempted: &str,
    ) -> Result<(), ExperienceError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| ExperienceError::invalid_state(self.status, attempted))?;
        Ok(())
    }

    /// Re-derives day numbers, pricing, and the itinerary from the
    /// current items. Called after every mutation.
    fn recompute_derived(&mut self) {
        for item in &mut self.items {
            item.day_number = item.day_number_for(self.start_date);
        }
        self.pricing.recompute(&self.items, self.travelers.total());
        self.itinerary = build_itinerary(&self.items, self.start_date, self.end_date);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

impl OwnedByUser for Experience {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;

    fn owner() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn start() -> NaiveDate {
        Timestamp::today() + chrono::Duration::days(30)
    }

    fn create_input(days: i64) -> CreateExperience {
        CreateExperience {
            title: "Lagos Getaway".to_string(),
            description: None,
            destination: Location::named("Lagos").unwrap(),
            origin: None,
            start_date: start(),
            end_date: start() + chrono::Duration::days(days - 1),
            travelers: TravelerCounts::new(2, 0, 0),
            preferences: vec![],
            agent_id: None,
            currency: None,
        }
    }

    fn three_day_trip() -> Experience {
        Experience::create(owner(), create_input(3), Percentage::new(5)).unwrap()
    }

    fn hotel() -> ItineraryItem {
        ItineraryItem::accommodation(
            "Harbor Hotel",
            start(),
            start() + chrono::Duration::days(2),
            Money::from_major(100),
            2,
        )
    }

    fn dinner() -> ItineraryItem {
        ItineraryItem::dining(
            "Tarkwa Grill",
            Money::from_major(50),
            2,
            start() + chrono::Duration::days(1),
        )
    }

    // Creation

    #[test]
    fn create_starts_in_draft_with_share_code() {
        let exp = three_day_trip();
        assert_eq!(exp.status, ExperienceStatus::Draft);
        assert!(!exp.share_code.as_str().is_empty());
        assert_eq!(exp.itinerary().len(), 3);
        assert!(exp.items().is_empty());
    }

    #[test]
    fn create_rejects_past_start_date() {
        let mut input = create_input(3);
        input.start_date = Timestamp::today() - chrono::Duration::days(1);
        let result = Experience::create(owner(), input, Percentage::new(5));
        assert!(matches!(result, Err(ExperienceError::Validation { .. })));
    }

    #[test]
    fn create_rejects_end_before_start() {
        let mut input = create_input(3);
        input.end_date = input.start_date - chrono::Duration::days(1);
        let result = Experience::create(owner(), input, Percentage::new(5));
        assert!(matches!(result, Err(ExperienceError::Validation { .. })));
    }

    #[test]
    fn create_rejects_blank_title() {
        let mut input = create_input(3);
        input.title = "  ".to_string();
        assert!(Experience::create(owner(), input, Percentage::new(5)).is_err());
    }

    #[test]
    fn share_codes_are_unique_per_experience() {
        let a = three_day_trip();
        let b = three_day_trip();
        assert_ne!(a.share_code, b.share_code);
    }

    // Item mutation and derived data

    #[test]
    fn add_item_recomputes_pricing_and_itinerary() {
        let mut exp = three_day_trip();
        exp.add_item(hotel()).unwrap();
        exp.add_item(dinner()).unwrap();

        assert_eq!(exp.pricing().items_subtotal, Money::from_major(300));
        assert_eq!(exp.pricing().service_fee, Money::from_major(15));
        assert_eq!(exp.pricing().grand_total, Money::from_major(315));
        assert_eq!(exp.pricing().price_per_person, Money::from_cents(15_750));
        assert_eq!(exp.itinerary().len(), 3);
        assert_eq!(exp.itinerary()[1].items.len(), 1);
    }

    #[test]
    fn items_get_sequential_sort_orders() {
        let mut exp = three_day_trip();
        exp.add_item(hotel()).unwrap();
        exp.add_item(dinner()).unwrap();

        let orders: Vec<_> = exp.items().iter().map(|i| i.sort_order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn day_numbers_follow_trip_start() {
        let mut exp = three_day_trip();
        exp.add_item(hotel()).unwrap();
        exp.add_item(dinner()).unwrap();

        assert_eq!(exp.items()[0].day_number, 1);
        assert_eq!(exp.items()[1].day_number, 2);
    }

    #[test]
    fn remove_item_recomputes_totals() {
        let mut exp = three_day_trip();
        exp.add_item(hotel()).unwrap();
        let dinner_id = exp.add_item(dinner()).unwrap();

        exp.remove_item(dinner_id).unwrap();
        assert_eq!(exp.pricing().items_subtotal, Money::from_major(200));
        assert_eq!(exp.items().len(), 1);
    }

    #[test]
    fn remove_unknown_item_is_not_found() {
        let mut exp = three_day_trip();
        let result = exp.remove_item(ItemId::new());
        assert!(matches!(result, Err(ExperienceError::ItemNotFound(_))));
    }

    #[test]
    fn update_item_recomputes_totals() {
        let mut exp = three_day_trip();
        let id = exp.add_item(dinner()).unwrap();

        exp.update_item(
            id,
            ItemPatch {
                quantity: Some(4),
                ..ItemPatch::default()
            },
        )
        .unwrap();

        assert_eq!(exp.pricing().items_subtotal, Money::from_major(200));
    }

    #[test]
    fn mutation_order_does_not_change_final_pricing() {
        // add hotel, add dinner, remove hotel == add dinner directly
        let mut via_removal = three_day_trip();
        let hotel_id = via_removal.add_item(hotel()).unwrap();
        via_removal.add_item(dinner()).unwrap();
        via_removal.remove_item(hotel_id).unwrap();

        let mut direct = three_day_trip();
        direct.add_item(dinner()).unwrap();

        assert_eq!(
            via_removal.pricing().grand_total,
            direct.pricing().grand_total
        );
        assert_eq!(
            via_removal.pricing().items_subtotal,
            direct.pricing().items_subtotal
        );
    }

    // Reorder policy

    #[test]
    fn reorder_applies_given_order() {
        let mut exp = three_day_trip();
        let a = exp.add_item(hotel()).unwrap();
        let b = exp.add_item(dinner()).unwrap();

        exp.reorder_items(&[b, a]).unwrap();

        assert_eq!(exp.items()[0].id, b);
        assert_eq!(exp.items()[1].id, a);
        assert_eq!(exp.items()[0].sort_order, 0);
        assert_eq!(exp.items()[1].sort_order, 1);
    }

    #[test]
    fn reorder_appends_omitted_items_instead_of_dropping_them() {
        let mut exp = three_day_trip();
        let a = exp.add_item(hotel()).unwrap();
        let b = exp.add_item(dinner()).unwrap();
        let c = exp
            .add_item(ItineraryItem::event(
                "Jazz Night",
                Money::from_major(30),
                2,
                start() + chrono::Duration::days(1),
            ))
            .unwrap();

        // Only c is listed; a and b keep their relative order after it.
        exp.reorder_items(&[c]).unwrap();

        let ids: Vec<_> = exp.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![c, a, b]);
        assert_eq!(exp.items().len(), 3);
    }

    #[test]
    fn reorder_rejects_foreign_item_ids() {
        let mut exp = three_day_trip();
        exp.add_item(hotel()).unwrap();

        let result = exp.reorder_items(&[ItemId::new()]);
        assert!(matches!(result, Err(ExperienceError::Validation { .. })));
        assert_eq!(exp.items().len(), 1);
    }

    // Trip parameter updates

    #[test]
    fn date_change_rebuilds_itinerary_and_day_numbers() {
        let mut exp = three_day_trip();
        exp.add_item(dinner()).unwrap();

        exp.update_details(ExperienceUpdate {
            start_date: Some(start() - chrono::Duration::days(0)),
            end_date: Some(start() + chrono::Duration::days(4)),
            ..ExperienceUpdate::default()
        })
        .unwrap();

        assert_eq!(exp.itinerary().len(), 5);
        assert_eq!(exp.items()[0].day_number, 2);
    }

    #[test]
    fn traveler_change_recomputes_per_person_price() {
        let mut exp = three_day_trip();
        exp.add_item(hotel()).unwrap();
        exp.add_item(dinner()).unwrap();

        exp.update_details(ExperienceUpdate {
            travelers: Some(TravelerCounts::new(3, 0, 0)),
            ..ExperienceUpdate::default()
        })
        .unwrap();

        assert_eq!(exp.pricing().price_per_person, Money::from_cents(10_500));
    }

    // Lifecycle

    #[test]
    fn checkout_requires_at_least_one_item() {
        let mut exp = three_day_trip();
        let result = exp.begin_checkout();
        assert!(matches!(result, Err(ExperienceError::Validation { .. })));
        assert_eq!(exp.status, ExperienceStatus::Draft);
    }

    #[test]
    fn checkout_moves_draft_to_pending() {
        let mut exp = three_day_trip();
        exp.add_item(dinner()).unwrap();
        exp.begin_checkout().unwrap();
        assert_eq!(exp.status, ExperienceStatus::Pending);
    }

    #[test]
    fn checkout_is_repeatable_while_pending() {
        let mut exp = three_day_trip();
        exp.add_item(dinner()).unwrap();
        exp.begin_checkout().unwrap();
        exp.begin_checkout().unwrap();
        assert_eq!(exp.status, ExperienceStatus::Pending);
    }

    #[test]
    fn confirm_payment_marks_fully_paid() {
        let mut exp = three_day_trip();
        exp.add_item(dinner()).unwrap();
        exp.begin_checkout().unwrap();
        exp.confirm_payment().unwrap();

        assert_eq!(exp.status, ExperienceStatus::Confirmed);
        assert_eq!(exp.pricing().balance_due, Money::ZERO);
        assert_eq!(exp.pricing().amount_paid, exp.pricing().grand_total);
    }

    #[test]
    fn confirm_payment_requires_pending() {
        let mut exp = three_day_trip();
        let result = exp.confirm_payment();
        assert!(matches!(result, Err(ExperienceError::InvalidState { .. })));
    }

    #[test]
    fn confirmed_experience_rejects_item_mutation() {
        let mut exp = three_day_trip();
        exp.add_item(dinner()).unwrap();
        exp.begin_checkout().unwrap();
        exp.confirm_payment().unwrap();

        let before = exp.items().to_vec();

        assert!(matches!(
            exp.add_item(hotel()),
            Err(ExperienceError::InvalidState { .. })
        ));
        let id = before[0].id;
        assert!(exp.update_item(id, ItemPatch::default()).is_err());
        assert!(exp.remove_item(id).is_err());
        assert!(exp.reorder_items(&[id]).is_err());

        assert_eq!(exp.items(), before.as_slice());
    }

    #[test]
    fn delete_is_blocked_once_confirmed() {
        let mut exp = three_day_trip();
        exp.add_item(dinner()).unwrap();
        exp.begin_checkout().unwrap();
        exp.confirm_payment().unwrap();

        assert!(matches!(
            exp.mark_deleted(),
            Err(ExperienceError::InvalidState { .. })
        ));
        assert!(!exp.deleted);
    }

    #[test]
    fn draft_can_be_soft_deleted() {
        let mut exp = three_day_trip();
        exp.mark_deleted().unwrap();
        assert!(exp.deleted);
    }

    #[test]
    fn cancel_is_terminal() {
        let mut exp = three_day_trip();
        exp.cancel().unwrap();
        assert_eq!(exp.status, ExperienceStatus::Cancelled);
        assert!(exp.begin_checkout().is_err() || exp.items().is_empty());
    }

    #[test]
    fn confirmed_trip_can_start_and_complete() {
        let mut exp = three_day_trip();
        exp.add_item(dinner()).unwrap();
        exp.begin_checkout().unwrap();
        exp.confirm_payment().unwrap();
        exp.start_trip().unwrap();
        exp.complete_trip().unwrap();
        assert_eq!(exp.status, ExperienceStatus::Completed);
    }

    // Discounts

    #[test]
    fn apply_discount_reduces_grand_total() {
        let mut exp = three_day_trip();
        exp.add_item(hotel()).unwrap();
        exp.add_item(dinner()).unwrap();

        exp.apply_discount("SUMMER10", Percentage::new(10)).unwrap();

        assert_eq!(exp.pricing().discount_amount, Money::from_major(30));
        assert_eq!(exp.pricing().grand_total, Money::from_major(285));
    }

    // Cloning

    #[test]
    fn clone_shifts_every_item_by_the_day_offset() {
        let mut source = three_day_trip();
        source.add_item(hotel()).unwrap();
        source.add_item(dinner()).unwrap();
        source.begin_checkout().unwrap();
        source.confirm_payment().unwrap();

        let new_start = start() + chrono::Duration::days(39);
        let card_code = CardCode::generate();
        let clone = Experience::clone_from(
            &source,
            card_code.clone(),
            UserId::new("user-2").unwrap(),
            new_start,
            Percentage::new(5),
        )
        .unwrap();

        assert_eq!(clone.status, ExperienceStatus::Draft);
        assert_eq!(clone.start_date, new_start);
        assert_eq!(clone.end_date, new_start + chrono::Duration::days(2));
        assert_eq!(clone.items().len(), source.items().len());
        assert_eq!(
            clone.items()[0].scheduled_date,
            Some(new_start)
        );
        assert_eq!(
            clone.items()[1].scheduled_date,
            Some(new_start + chrono::Duration::days(1))
        );
        assert!(clone.is_clone);
        assert_eq!(clone.cloned_from_experience, Some(source.id));
        assert_eq!(clone.cloned_from_card, Some(card_code));
        assert_ne!(clone.share_code, source.share_code);
    }

    #[test]
    fn clone_preserves_pricing_and_resets_bookings() {
        let mut source = three_day_trip();
        source.add_item(hotel()).unwrap();
        let dinner_id = source.add_item(dinner()).unwrap();
        source
            .update_item(
                dinner_id,
                ItemPatch {
                    vendor_id: Some("vendor-9".to_string()),
                    ..ItemPatch::default()
                },
            )
            .unwrap();

        // Simulate a confirmed booking on the source item.
        let mut confirmed_source = source.clone();
        confirmed_source.items[1].booking_reference = Some("BK-1".to_string());
        confirmed_source.items[1].booking_confirmed = true;

        let clone = Experience::clone_from(
            &confirmed_source,
            CardCode::generate(),
            UserId::new("user-2").unwrap(),
            start() + chrono::Duration::days(10),
            Percentage::new(5),
        )
        .unwrap();

        assert_eq!(
            clone.pricing().items_subtotal,
            confirmed_source.pricing().items_subtotal
        );
        assert!(clone.items().iter().all(|i| i.booking_reference.is_none()));
        assert!(clone.items().iter().all(|i| !i.booking_confirmed));
    }

    // Sharing counters

    #[test]
    fn counters_increment_independently() {
        let mut exp = three_day_trip();
        exp.record_view();
        exp.record_view();
        exp.record_share();
        exp.record_clone();

        assert_eq!(exp.view_count, 2);
        assert_eq!(exp.share_count, 1);
        assert_eq!(exp.clone_count, 1);
    }

    // Card linkage

    #[test]
    fn attach_and_clear_card_link() {
        let mut exp = three_day_trip();
        let card_id = CardId::new();
        exp.attach_card(card_id);
        assert_eq!(exp.card_id, Some(card_id));
        assert!(exp.card_generated);

        exp.clear_card_link();
        assert!(exp.card_id.is_none());
        assert!(!exp.card_generated);

        // Clearing twice is harmless.
        exp.clear_card_link();
        assert!(exp.card_id.is_none());
    }
}

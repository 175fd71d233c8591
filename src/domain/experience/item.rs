//! Itinerary item value object.
//!
//! One bookable unit inside an Experience: a hotel stay, a ride, an
//! event, an activity, a meal, a place visit, or a flight. Items are
//! owned by their Experience and never exist outside one.
//!
//! Every item shares a common envelope (identity, scheduling, pricing,
//! ordering) and carries a strongly-typed detail payload per item type.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Currency, GeoPoint, ItemId, Money};

/// The fixed set of bookable item types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Accommodation,
    Ride,
    Event,
    Activity,
    Dining,
    Place,
    Flight,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemType::Accommodation => "accommodation",
            ItemType::Ride => "ride",
            ItemType::Event => "event",
            ItemType::Activity => "activity",
            ItemType::Dining => "dining",
            ItemType::Place => "place",
            ItemType::Flight => "flight",
        };
        write!(f, "{}", s)
    }
}

/// Type-specific detail payload, one variant per item type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemDetails {
    Accommodation {
        check_in: NaiveDate,
        check_out: NaiveDate,
        nights: u32,
        room_type: Option<String>,
        guests: u32,
    },
    Ride {
        pickup: String,
        dropoff: String,
        vehicle_class: Option<String>,
        passengers: u32,
        distance_km: Option<f64>,
    },
    Event {
        venue: Option<String>,
        tickets: u32,
        ticket_tier: Option<String>,
    },
    Activity {
        participants: u32,
        duration_hours: Option<f64>,
        difficulty: Option<String>,
    },
    Dining {
        guests: u32,
        cuisine: Option<String>,
        reservation_time: Option<NaiveTime>,
    },
    Place {
        visitors: u32,
        entry_fee: Money,
        visit_duration_hours: Option<f64>,
    },
    Flight {
        origin_airport: String,
        destination_airport: String,
        airline: Option<String>,
        flight_number: Option<String>,
        passengers: u32,
        cabin_class: Option<String>,
    },
}

impl ItemDetails {
    /// Returns the item type this payload belongs to.
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemDetails::Accommodation { .. } => ItemType::Accommodation,
            ItemDetails::Ride { .. } => ItemType::Ride,
            ItemDetails::Event { .. } => ItemType::Event,
            ItemDetails::Activity { .. } => ItemType::Activity,
            ItemDetails::Dining { .. } => ItemType::Dining,
            ItemDetails::Place { .. } => ItemType::Place,
            ItemDetails::Flight { .. } => ItemType::Flight,
        }
    }
}

/// A single bookable unit inside an Experience.
///
/// # Invariants
///
/// - `total_price = unit_price × quantity`, unless `is_free` forces it
///   to zero. `recompute_total` restores the invariant after any edit.
/// - `day_number` is 1-based from the trip start date and is re-derived
///   by the owning Experience on every recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    pub id: ItemId,
    pub item_type: ItemType,
    pub name: String,
    pub vendor_id: Option<String>,
    pub location_name: Option<String>,
    pub location: Option<GeoPoint>,
    pub scheduled_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub unit_price: Money,
    pub quantity: u32,
    pub is_free: bool,
    pub total_price: Money,
    pub currency: Currency,
    pub details: ItemDetails,
    pub sort_order: u32,
    pub day_number: u32,
    pub booking_reference: Option<String>,
    pub booking_confirmed: bool,
}

impl ItineraryItem {
    fn new(name: impl Into<String>, unit_price: Money, quantity: u32, details: ItemDetails) -> Self {
        let mut item = Self {
            id: ItemId::new(),
            item_type: details.item_type(),
            name: name.into(),
            vendor_id: None,
            location_name: None,
            location: None,
            scheduled_date: None,
            start_time: None,
            end_time: None,
            unit_price,
            quantity,
            is_free: false,
            total_price: Money::ZERO,
            currency: Currency::default(),
            details,
            sort_order: 0,
            day_number: 1,
            booking_reference: None,
            booking_confirmed: false,
        };
        item.recompute_total();
        item
    }

    /// A stay priced as nights × nightly rate, scheduled on check-in.
    pub fn accommodation(
        name: impl Into<String>,
        check_in: NaiveDate,
        check_out: NaiveDate,
        nightly_rate: Money,
        guests: u32,
    ) -> Self {
        let nights = (check_out - check_in).num_days().max(1) as u32;
        let mut item = Self::new(
            name,
            nightly_rate,
            nights,
            ItemDetails::Accommodation {
                check_in,
                check_out,
                nights,
                room_type: None,
                guests,
            },
        );
        item.scheduled_date = Some(check_in);
        item
    }

    /// A transfer priced as passengers × fare.
    pub fn ride(
        name: impl Into<String>,
        pickup: impl Into<String>,
        dropoff: impl Into<String>,
        fare: Money,
        passengers: u32,
        scheduled_date: NaiveDate,
    ) -> Self {
        let mut item = Self::new(
            name,
            fare,
            passengers,
            ItemDetails::Ride {
                pickup: pickup.into(),
                dropoff: dropoff.into(),
                vehicle_class: None,
                passengers,
                distance_km: None,
            },
        );
        item.scheduled_date = Some(scheduled_date);
        item
    }

    /// An event priced as tickets × ticket price.
    pub fn event(
        name: impl Into<String>,
        ticket_price: Money,
        tickets: u32,
        scheduled_date: NaiveDate,
    ) -> Self {
        let mut item = Self::new(
            name,
            ticket_price,
            tickets,
            ItemDetails::Event {
                venue: None,
                tickets,
                ticket_tier: None,
            },
        );
        item.scheduled_date = Some(scheduled_date);
        item
    }

    /// An activity priced as participants × rate.
    pub fn activity(
        name: impl Into<String>,
        rate: Money,
        participants: u32,
        scheduled_date: NaiveDate,
    ) -> Self {
        let mut item = Self::new(
            name,
            rate,
            participants,
            ItemDetails::Activity {
                participants,
                duration_hours: None,
                difficulty: None,
            },
        );
        item.scheduled_date = Some(scheduled_date);
        item
    }

    /// A meal priced as guests × price per guest.
    pub fn dining(
        name: impl Into<String>,
        price_per_guest: Money,
        guests: u32,
        scheduled_date: NaiveDate,
    ) -> Self {
        let mut item = Self::new(
            name,
            price_per_guest,
            guests,
            ItemDetails::Dining {
                guests,
                cuisine: None,
                reservation_time: None,
            },
        );
        item.scheduled_date = Some(scheduled_date);
        item
    }

    /// A place visit priced as visitors × entry fee.
    ///
    /// Free-entry places are marked free rather than zero-priced so the
    /// pricing invariant stays explicit.
    pub fn place(
        name: impl Into<String>,
        entry_fee: Money,
        visitors: u32,
        scheduled_date: NaiveDate,
    ) -> Self {
        let mut item = Self::new(
            name,
            entry_fee,
            visitors,
            ItemDetails::Place {
                visitors,
                entry_fee,
                visit_duration_hours: None,
            },
        );
        item.scheduled_date = Some(scheduled_date);
        if entry_fee.is_zero() {
            item.mark_free();
        }
        item
    }

    /// A flight priced as passengers × fare.
    pub fn flight(
        name: impl Into<String>,
        origin_airport: impl Into<String>,
        destination_airport: impl Into<String>,
        fare: Money,
        passengers: u32,
        scheduled_date: NaiveDate,
    ) -> Self {
        let mut item = Self::new(
            name,
            fare,
            passengers,
            ItemDetails::Flight {
                origin_airport: origin_airport.into(),
                destination_airport: destination_airport.into(),
                airline: None,
                flight_number: None,
                passengers,
                cabin_class: None,
            },
        );
        item.scheduled_date = Some(scheduled_date);
        item
    }

    /// Attaches a vendor reference.
    pub fn with_vendor(mut self, vendor_id: impl Into<String>) -> Self {
        self.vendor_id = Some(vendor_id.into());
        self
    }

    /// Attaches a display location.
    pub fn with_location(mut self, name: impl Into<String>, point: Option<GeoPoint>) -> Self {
        self.location_name = Some(name.into());
        self.location = point;
        self
    }

    /// Sets start and end times within the scheduled day.
    pub fn with_times(mut self, start: NaiveTime, end: Option<NaiveTime>) -> Self {
        self.start_time = Some(start);
        self.end_time = end;
        self
    }

    /// Sets the pricing currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Marks the item as free of charge; the total is forced to zero.
    pub fn mark_free(&mut self) {
        self.is_free = true;
        self.recompute_total();
    }

    /// Restores the unit-price × quantity total invariant.
    pub fn recompute_total(&mut self) {
        self.total_price = if self.is_free {
            Money::ZERO
        } else {
            self.unit_price.times(self.quantity)
        };
    }

    /// 1-based day number of this item relative to the trip start.
    ///
    /// Items scheduled before the trip start clamp to day 1, as do
    /// items with no scheduled date.
    pub fn day_number_for(&self, trip_start: NaiveDate) -> u32 {
        match self.scheduled_date {
            Some(date) => ((date - trip_start).num_days() + 1).max(1) as u32,
            None => 1,
        }
    }

    /// Shifts the scheduled date (and accommodation stay window) by the
    /// given number of days. Used when cloning into new trip dates.
    pub fn shift_schedule(&mut self, offset_days: i64) {
        if let Some(date) = self.scheduled_date {
            self.scheduled_date = Some(date + chrono::Duration::days(offset_days));
        }
        if let ItemDetails::Accommodation {
            check_in,
            check_out,
            ..
        } = &mut self.details
        {
            *check_in += chrono::Duration::days(offset_days);
            *check_out += chrono::Duration::days(offset_days);
        }
    }

    /// Clears booking state. Cloned items start unbooked.
    pub fn reset_booking(&mut self) {
        self.booking_reference = None;
        self.booking_confirmed = false;
    }

    /// Applies a partial update, then restores the pricing invariant.
    pub fn apply_patch(&mut self, patch: ItemPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(is_free) = patch.is_free {
            self.is_free = is_free;
        }
        if let Some(date) = patch.scheduled_date {
            self.scheduled_date = Some(date);
        }
        if let Some(start) = patch.start_time {
            self.start_time = Some(start);
        }
        if let Some(end) = patch.end_time {
            self.end_time = Some(end);
        }
        if let Some(vendor) = patch.vendor_id {
            self.vendor_id = Some(vendor);
        }
        if let Some(details) = patch.details {
            self.details = details;
        }
        self.recompute_total();
    }
}

/// Partial update for an itinerary item. `None` fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub unit_price: Option<Money>,
    pub quantity: Option<u32>,
    pub is_free: Option<bool>,
    pub scheduled_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub vendor_id: Option<String>,
    pub details: Option<ItemDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accommodation_totals_nights_times_rate() {
        let item = ItineraryItem::accommodation(
            "Harbor Hotel",
            date(2024, 8, 1),
            date(2024, 8, 3),
            Money::from_major(100),
            2,
        );

        assert_eq!(item.item_type, ItemType::Accommodation);
        assert_eq!(item.quantity, 2); // two nights
        assert_eq!(item.total_price, Money::from_major(200));
        assert_eq!(item.scheduled_date, Some(date(2024, 8, 1)));
    }

    #[test]
    fn accommodation_counts_at_least_one_night() {
        let item = ItineraryItem::accommodation(
            "Day-use Room",
            date(2024, 8, 1),
            date(2024, 8, 1),
            Money::from_major(80),
            1,
        );
        assert_eq!(item.quantity, 1);
        assert_eq!(item.total_price, Money::from_major(80));
    }

    #[test]
    fn dining_totals_guests_times_price() {
        let item =
            ItineraryItem::dining("Tarkwa Grill", Money::from_major(50), 2, date(2024, 8, 2));
        assert_eq!(item.total_price, Money::from_major(100));
    }

    #[test]
    fn event_totals_tickets_times_price() {
        let item = ItineraryItem::event("Jazz Night", Money::from_major(30), 3, date(2024, 8, 2));
        assert_eq!(item.total_price, Money::from_major(90));
    }

    #[test]
    fn flight_totals_passengers_times_fare() {
        let item = ItineraryItem::flight(
            "LOS-ABV",
            "LOS",
            "ABV",
            Money::from_major(120),
            2,
            date(2024, 8, 1),
        );
        assert_eq!(item.total_price, Money::from_major(240));
    }

    #[test]
    fn free_place_has_zero_total() {
        let item = ItineraryItem::place("City Park", Money::ZERO, 4, date(2024, 8, 2));
        assert!(item.is_free);
        assert_eq!(item.total_price, Money::ZERO);
    }

    #[test]
    fn mark_free_forces_total_to_zero() {
        let mut item =
            ItineraryItem::activity("Kayaking", Money::from_major(40), 2, date(2024, 8, 2));
        assert_eq!(item.total_price, Money::from_major(80));

        item.mark_free();
        assert_eq!(item.total_price, Money::ZERO);
    }

    #[test]
    fn day_number_is_one_on_trip_start() {
        let item = ItineraryItem::dining("Lunch", Money::from_major(20), 1, date(2024, 8, 1));
        assert_eq!(item.day_number_for(date(2024, 8, 1)), 1);
    }

    #[test]
    fn day_number_is_two_one_day_after_start() {
        let item = ItineraryItem::dining("Lunch", Money::from_major(20), 1, date(2024, 8, 2));
        assert_eq!(item.day_number_for(date(2024, 8, 1)), 2);
    }

    #[test]
    fn day_number_clamps_to_one_before_start() {
        let item = ItineraryItem::dining("Lunch", Money::from_major(20), 1, date(2024, 7, 30));
        assert_eq!(item.day_number_for(date(2024, 8, 1)), 1);
    }

    #[test]
    fn undated_item_defaults_to_day_one() {
        let mut item = ItineraryItem::dining("Lunch", Money::from_major(20), 1, date(2024, 8, 2));
        item.scheduled_date = None;
        assert_eq!(item.day_number_for(date(2024, 8, 1)), 1);
    }

    #[test]
    fn shift_schedule_moves_date_and_stay_window() {
        let mut item = ItineraryItem::accommodation(
            "Harbor Hotel",
            date(2024, 6, 1),
            date(2024, 6, 3),
            Money::from_major(100),
            2,
        );
        item.shift_schedule(39);

        assert_eq!(item.scheduled_date, Some(date(2024, 7, 10)));
        match &item.details {
            ItemDetails::Accommodation {
                check_in,
                check_out,
                ..
            } => {
                assert_eq!(*check_in, date(2024, 7, 10));
                assert_eq!(*check_out, date(2024, 7, 12));
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn reset_booking_clears_confirmation() {
        let mut item = ItineraryItem::event("Jazz Night", Money::from_major(30), 2, date(2024, 8, 2));
        item.booking_reference = Some("BK-441".to_string());
        item.booking_confirmed = true;

        item.reset_booking();
        assert!(item.booking_reference.is_none());
        assert!(!item.booking_confirmed);
    }

    #[test]
    fn apply_patch_restores_total_invariant() {
        let mut item =
            ItineraryItem::dining("Dinner", Money::from_major(50), 2, date(2024, 8, 2));

        item.apply_patch(ItemPatch {
            quantity: Some(4),
            ..ItemPatch::default()
        });

        assert_eq!(item.total_price, Money::from_major(200));
    }

    #[test]
    fn details_serialize_with_type_tag() {
        let item = ItineraryItem::ride(
            "Airport Transfer",
            "MMA2",
            "Victoria Island",
            Money::from_major(25),
            2,
            date(2024, 8, 1),
        );
        let json = serde_json::to_string(&item.details).unwrap();
        assert!(json.contains("\"type\":\"ride\""));
        assert!(json.contains("\"pickup\":\"MMA2\""));
    }
}

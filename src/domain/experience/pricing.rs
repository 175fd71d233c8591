//! Pricing breakdown for an Experience.
//!
//! The breakdown is purely derived data: `recompute` maps the current
//! item collection and traveler count to category subtotals and totals,
//! and is re-run wholesale after every mutation. It is never trusted as
//! a cache across mutations.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Currency, Money, Percentage};

use super::item::{ItemType, ItineraryItem};

/// Cost breakdown across item categories plus derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    // Category subtotals
    pub accommodation: Money,
    pub transport: Money,
    pub events: Money,
    pub activities: Money,
    pub dining: Money,
    pub flights: Money,

    /// Sum of the six category subtotals.
    pub items_subtotal: Money,

    /// Platform fee rate applied to the items subtotal.
    pub service_fee_rate: Percentage,
    pub service_fee: Money,

    pub taxes: Money,

    pub discount_code: Option<String>,
    pub discount_rate: Percentage,
    pub discount_amount: Money,

    pub grand_total: Money,
    pub currency: Currency,

    /// Grand total divided across travelers. When the traveler count is
    /// zero the previous value is retained rather than dividing by zero.
    pub price_per_person: Money,

    pub amount_paid: Money,
    pub balance_due: Money,
}

impl PriceBreakdown {
    /// Creates an empty breakdown with the given fee rate.
    pub fn new(service_fee_rate: Percentage, currency: Currency) -> Self {
        Self {
            accommodation: Money::ZERO,
            transport: Money::ZERO,
            events: Money::ZERO,
            activities: Money::ZERO,
            dining: Money::ZERO,
            flights: Money::ZERO,
            items_subtotal: Money::ZERO,
            service_fee_rate,
            service_fee: Money::ZERO,
            taxes: Money::ZERO,
            discount_code: None,
            discount_rate: Percentage::ZERO,
            discount_amount: Money::ZERO,
            grand_total: Money::ZERO,
            currency,
            price_per_person: Money::ZERO,
            amount_paid: Money::ZERO,
            balance_due: Money::ZERO,
        }
    }

    /// Recomputes the whole breakdown from the current items and
    /// traveler count. Deterministic and side-effect free.
    pub fn recompute(&mut self, items: &[ItineraryItem], traveler_count: u32) {
        self.accommodation = Money::ZERO;
        self.transport = Money::ZERO;
        self.events = Money::ZERO;
        self.activities = Money::ZERO;
        self.dining = Money::ZERO;
        self.flights = Money::ZERO;

        for item in items {
            let bucket = match item.item_type {
                ItemType::Accommodation => &mut self.accommodation,
                ItemType::Ride => &mut self.transport,
                ItemType::Event => &mut self.events,
                // Place visits count toward the activities subtotal.
                ItemType::Activity | ItemType::Place => &mut self.activities,
                ItemType::Dining => &mut self.dining,
                ItemType::Flight => &mut self.flights,
            };
            *bucket += item.total_price;
        }

        self.items_subtotal = self.accommodation
            + self.transport
            + self.events
            + self.activities
            + self.dining
            + self.flights;

        self.service_fee = self.items_subtotal.percent_of(self.service_fee_rate);
        self.discount_amount = self.items_subtotal.percent_of(self.discount_rate);
        self.grand_total =
            self.items_subtotal + self.service_fee + self.taxes - self.discount_amount;

        if let Ok(per_person) = self.grand_total.split_between(traveler_count) {
            self.price_per_person = per_person;
        }

        self.balance_due = self.grand_total - self.amount_paid;
    }

    /// Records a validated discount. The caller recomputes immediately.
    pub fn set_discount(&mut self, code: impl Into<String>, rate: Percentage) {
        self.discount_code = Some(code.into());
        self.discount_rate = rate;
    }

    /// Marks the grand total as fully paid.
    pub fn mark_paid_in_full(&mut self) {
        self.amount_paid = self.grand_total;
        self.balance_due = Money::ZERO;
    }
}

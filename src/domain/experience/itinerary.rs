//! Day-by-day itinerary derived from an Experience's items.
//!
//! The builder is a pure function from the item collection and the trip
//! date range to an ordered list of day buckets. It is recomputed
//! wholesale after every item mutation, never incrementally.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Money;

use super::item::ItineraryItem;

/// One calendar day of the trip.
///
/// Every day between the trip start and end appears exactly once, even
/// with no scheduled items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    /// 1-based day number; the trip start date is day 1.
    pub day_number: u32,
    pub date: NaiveDate,
    pub items: Vec<ItineraryItem>,
    /// Sum of the contained items' total prices.
    pub total_cost: Money,
    /// Earliest start time among the day's items.
    pub start_time: Option<NaiveTime>,
    /// Latest end time among the day's items (falling back to start times).
    pub end_time: Option<NaiveTime>,
}

/// Number of calendar days in the inclusive range `[start, end]`.
pub fn trip_length_days(start: NaiveDate, end: NaiveDate) -> u32 {
    ((end - start).num_days() + 1).max(0) as u32
}

/// Builds one bucket per calendar day in `[start, end]`, in date order.
///
/// Items are placed on their derived day number (undated items land on
/// day 1; dates before the trip clamp to day 1). Within a day, items
/// with no start time sort first, then by start time, then by their
/// explicit ordering index. Items scheduled past the trip end have no
/// bucket to land in and are left to the pricing totals only.
pub fn build_itinerary(
    items: &[ItineraryItem],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DayBucket> {
    let total_days = trip_length_days(start, end);
    let mut buckets: Vec<DayBucket> = (0..total_days)
        .map(|offset| DayBucket {
            day_number: offset + 1,
            date: start + chrono::Duration::days(i64::from(offset)),
            items: Vec::new(),
            total_cost: Money::ZERO,
            start_time: None,
            end_time: None,
        })
        .collect();

    for item in items {
        let day = item.day_number_for(start);
        if let Some(bucket) = buckets.get_mut(day.saturating_sub(1) as usize) {
            bucket.items.push(item.clone());
        }
    }

    for bucket in &mut buckets {
        bucket
            .items
            .sort_by_key(|item| (item.start_time, item.sort_order));
        bucket.total_cost = bucket.items.iter().map(|item| item.total_price).sum();
        bucket.start_time = bucket.items.iter().filter_map(|item| item.start_time).min();
        bucket.end_time = bucket
            .items
            .iter()
            .filter_map(|item| item.end_time.or(item.start_time))
            .max();
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;
    use proptest::prelude::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn empty_trip_still_covers_every_day() {
        let buckets = build_itinerary(&[], date(1), date(3));

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].day_number, 1);
        assert_eq!(buckets[0].date, date(1));
        assert_eq!(buckets[2].date, date(3));
        assert!(buckets.iter().all(|b| b.items.is_empty()));
    }

    #[test]
    fn single_day_trip_has_one_bucket() {
        let buckets = build_itinerary(&[], date(5), date(5));
        assert_eq!(buckets.len(), 1);
    }

    #[test]
    fn items_land_on_their_scheduled_day() {
        let items = vec![
            ItineraryItem::dining("Dinner", Money::from_major(50), 2, date(2)),
            ItineraryItem::event("Show", Money::from_major(30), 2, date(3)),
        ];
        let buckets = build_itinerary(&items, date(1), date(3));

        assert!(buckets[0].items.is_empty());
        assert_eq!(buckets[1].items.len(), 1);
        assert_eq!(buckets[1].items[0].name, "Dinner");
        assert_eq!(buckets[2].items[0].name, "Show");
    }

    #[test]
    fn undated_items_land_on_day_one() {
        let mut item = ItineraryItem::dining("Brunch", Money::from_major(20), 1, date(2));
        item.scheduled_date = None;

        let buckets = build_itinerary(&[item], date(1), date(3));
        assert_eq!(buckets[0].items.len(), 1);
    }

    #[test]
    fn bucket_totals_sum_item_prices() {
        let items = vec![
            ItineraryItem::dining("Lunch", Money::from_major(20), 2, date(2)),
            ItineraryItem::event("Show", Money::from_major(30), 1, date(2)),
        ];
        let buckets = build_itinerary(&items, date(1), date(3));

        assert_eq!(buckets[1].total_cost, Money::from_major(70));
        assert_eq!(buckets[0].total_cost, Money::ZERO);
    }

    #[test]
    fn untimed_items_sort_before_timed_ones() {
        let mut timed = ItineraryItem::event("Show", Money::from_major(30), 1, date(2));
        timed = timed.with_times(time(9, 0), Some(time(11, 0)));
        timed.sort_order = 0;

        let mut untimed = ItineraryItem::dining("Lunch", Money::from_major(20), 1, date(2));
        untimed.sort_order = 5;

        let buckets = build_itinerary(&[timed, untimed], date(1), date(3));
        let day2 = &buckets[1];
        assert_eq!(day2.items[0].name, "Lunch");
        assert_eq!(day2.items[1].name, "Show");
    }

    #[test]
    fn timed_items_sort_by_start_time_then_order() {
        let mut late = ItineraryItem::event("Evening Show", Money::from_major(30), 1, date(2))
            .with_times(time(19, 0), None);
        late.sort_order = 0;

        let mut early = ItineraryItem::activity("Hike", Money::from_major(10), 1, date(2))
            .with_times(time(7, 0), Some(time(10, 0)));
        early.sort_order = 3;

        let buckets = build_itinerary(&[late, early], date(1), date(3));
        let names: Vec<_> = buckets[1].items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Hike", "Evening Show"]);
    }

    #[test]
    fn bucket_times_span_first_and_last_items() {
        let first = ItineraryItem::activity("Hike", Money::from_major(10), 1, date(2))
            .with_times(time(7, 0), Some(time(10, 0)));
        let last = ItineraryItem::event("Show", Money::from_major(30), 1, date(2))
            .with_times(time(19, 0), Some(time(22, 0)));

        let buckets = build_itinerary(&[last, first], date(1), date(3));
        assert_eq!(buckets[1].start_time, Some(time(7, 0)));
        assert_eq!(buckets[1].end_time, Some(time(22, 0)));
    }

    #[test]
    fn item_scheduled_past_trip_end_gets_no_bucket() {
        let item = ItineraryItem::dining("Late Dinner", Money::from_major(20), 1, date(9));
        let buckets = build_itinerary(&[item], date(1), date(3));
        assert!(buckets.iter().all(|b| b.items.is_empty()));
    }

    proptest! {
        #[test]
        fn bucket_count_always_matches_trip_length(
            start_day in 1u32..15,
            extra_days in 0i64..14,
        ) {
            let start = date(start_day);
            let end = start + chrono::Duration::days(extra_days);
            let buckets = build_itinerary(&[], start, end);
            prop_assert_eq!(buckets.len() as i64, extra_days + 1);
        }

        #[test]
        fn day_numbers_are_sequential_from_one(extra_days in 0i64..14) {
            let start = date(1);
            let end = start + chrono::Duration::days(extra_days);
            let buckets = build_itinerary(&[], start, end);
            for (idx, bucket) in buckets.iter().enumerate() {
                prop_assert_eq!(bucket.day_number as usize, idx + 1);
                prop_assert_eq!(bucket.date, start + chrono::Duration::days(idx as i64));
            }
        }
    }
}

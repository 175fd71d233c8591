//! Traveler count value object.

use serde::{Deserialize, Serialize};

/// Head counts for a trip, split by age band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelerCounts {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl TravelerCounts {
    /// Creates traveler counts.
    pub fn new(adults: u32, children: u32, infants: u32) -> Self {
        Self {
            adults,
            children,
            infants,
        }
    }

    /// Counts for a single adult traveler.
    pub fn solo() -> Self {
        Self::new(1, 0, 0)
    }

    /// Total number of travelers across all age bands.
    pub fn total(&self) -> u32 {
        self.adults + self.children + self.infants
    }
}

impl Default for TravelerCounts {
    fn default() -> Self {
        Self::solo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_all_bands() {
        let counts = TravelerCounts::new(2, 1, 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn default_is_one_adult() {
        assert_eq!(TravelerCounts::default().total(), 1);
    }
}

//! Experience lifecycle state machine.
//!
//! The trip builder moves from a mutable draft through checkout and
//! payment to a confirmed, card-backed trip.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an Experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceStatus {
    /// Being built. Items and trip parameters are freely mutable.
    Draft,

    /// Checkout started, awaiting payment confirmation. Still mutable.
    Pending,

    /// Payment confirmed. The item collection is frozen and the
    /// Experience Card has been generated.
    Confirmed,

    /// The trip is underway.
    InProgress,

    /// The trip has ended.
    Completed,

    /// Abandoned before or instead of travel.
    Cancelled,
}

impl ExperienceStatus {
    /// Returns true if items and trip parameters may still be mutated.
    pub fn is_mutable(&self) -> bool {
        matches!(self, ExperienceStatus::Draft | ExperienceStatus::Pending)
    }

    /// Returns true if soft deletion is allowed in this status.
    ///
    /// Deletion is disallowed once a trip is confirmed or underway.
    pub fn allows_deletion(&self) -> bool {
        !matches!(
            self,
            ExperienceStatus::Confirmed | ExperienceStatus::InProgress
        )
    }
}

impl fmt::Display for ExperienceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExperienceStatus::Draft => "draft",
            ExperienceStatus::Pending => "pending",
            ExperienceStatus::Confirmed => "confirmed",
            ExperienceStatus::InProgress => "in_progress",
            ExperienceStatus::Completed => "completed",
            ExperienceStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

impl StateMachine for ExperienceStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ExperienceStatus::*;
        matches!(
            (self, target),
            // From DRAFT
            (Draft, Pending)
                | (Draft, Cancelled)
            // From PENDING
                | (Pending, Confirmed)
                | (Pending, Cancelled)
            // From CONFIRMED
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
            // From IN_PROGRESS
                | (InProgress, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ExperienceStatus::*;
        match self {
            Draft => vec![Pending, Cancelled],
            Pending => vec![Confirmed, Cancelled],
            Confirmed => vec![InProgress, Cancelled],
            InProgress => vec![Completed],
            Completed => vec![],
            Cancelled => vec![],
        }
    }
}

//! Engagement statistics and the bounded interaction log.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ExperienceId, Timestamp, UserId};

/// A single recorded interaction with a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEntry {
    pub kind: InteractionKind,
    /// Acting user, when the interaction was authenticated.
    pub user_id: Option<UserId>,
    pub occurred_at: Timestamp,
}

/// Kinds of interactions kept in the recent log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    View,
    Share,
    Clone,
    Like,
    Unlike,
    Save,
    Unsave,
}

/// Engagement counters plus a bounded recent-interaction log.
///
/// The log is not an audit trail: entries beyond the cap drop oldest
/// first, and unique-viewer counting is only as accurate as what the
/// log still holds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CardStats {
    pub views: u64,
    pub unique_viewers: u64,
    pub shares: u64,
    pub clones: u64,
    pub saves: u64,
    pub recent: VecDeque<InteractionEntry>,
}

impl CardStats {
    /// Appends an interaction, dropping the oldest entry past `cap`.
    pub fn push_interaction(
        &mut self,
        kind: InteractionKind,
        user_id: Option<UserId>,
        cap: usize,
    ) {
        self.recent.push_back(InteractionEntry {
            kind,
            user_id,
            occurred_at: Timestamp::now(),
        });
        while self.recent.len() > cap {
            self.recent.pop_front();
        }
    }

    /// True if the log still holds a view by this user.
    pub fn has_logged_view_by(&self, user_id: &UserId) -> bool {
        self.recent.iter().any(|entry| {
            entry.kind == InteractionKind::View && entry.user_id.as_ref() == Some(user_id)
        })
    }
}

/// An engagement event applied to a card at the storage layer.
///
/// Engagements are increments, not read-modify-write updates, so
/// concurrent public traffic cannot lose counts (the repository applies
/// them atomically under its own lock, outside optimistic versioning).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Engagement {
    View { viewer: Option<UserId> },
    Share { user: Option<UserId> },
    Clone { experience_id: ExperienceId, user: UserId },
    ToggleLike { user: UserId },
    ToggleSave { user: UserId },
}

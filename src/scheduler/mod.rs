//! Spaced-repetition review scheduling.
//!
//! Cards move forward through `to-learn -> once-checked -> twice-checked ->
//! fully-memorized`, one step per successful review. The wait before the next
//! review is 24 hours after the first step and 48 hours after the second;
//! memorized cards are never scheduled again.
//!
//! Every operation takes the current instant from the caller and never reads
//! the system clock.

mod card;
mod progress;
mod status;

pub use card::Flashcard;
pub use progress::StatusCounts;
pub use status::Status;

use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

/// Wait after the first successful review.
pub const FIRST_REVIEW_INTERVAL: Duration = Duration::hours(24);
/// Wait after the second successful review.
pub const SECOND_REVIEW_INTERVAL: Duration = Duration::hours(48);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("invalid flashcard status: {value:?}")]
    InvalidState { value: String },
}

/// Apply one successful review at `now`.
///
/// A `fully-memorized` card is returned unchanged.
pub fn advance(card: &Flashcard, now: OffsetDateTime) -> Flashcard {
    let mut next = card.clone();
    match card.status {
        Status::ToLearn => {
            next.status = Status::OnceChecked;
            next.status_once_checked_at.get_or_insert(now);
            next.next_review_at = Some(now + FIRST_REVIEW_INTERVAL);
        }
        Status::OnceChecked => {
            next.status = Status::TwiceChecked;
            next.status_twice_checked_at.get_or_insert(now);
            next.next_review_at = Some(now + SECOND_REVIEW_INTERVAL);
        }
        Status::TwiceChecked => {
            next.status = Status::FullyMemorized;
            next.status_fully_memorized_at.get_or_insert(now);
            next.next_review_at = None;
        }
        Status::FullyMemorized => {
            debug!(card_id = %card.id, "review of memorized card ignored");
            return next;
        }
    }
    next.last_checked_at = Some(now);
    next.updated_at = now;
    debug!(card_id = %card.id, from = %card.status, to = %next.status, "card advanced");
    next
}

/// Whether `card` may be shown for review at `now`.
pub fn is_due(card: &Flashcard, now: OffsetDateTime) -> bool {
    if card.status.is_terminal() {
        return false;
    }
    match card.next_review_at {
        None => true,
        Some(at) => at <= now,
    }
}

/// Sort cards so the most overdue come first.
///
/// Cards without `next_review_at` lead, then ascending `next_review_at`, with
/// `created_at` breaking ties.
pub fn due_ordering(mut cards: Vec<Flashcard>) -> Vec<Flashcard> {
    // `None < Some(_)` gives the nulls-first order directly.
    cards.sort_by(|a, b| {
        a.next_review_at
            .cmp(&b.next_review_at)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    cards
}

/// Remaining wait before `card` becomes due: zero when it already is,
/// `None` when it never will be again.
pub fn time_until_due(card: &Flashcard, now: OffsetDateTime) -> Option<Duration> {
    if card.status.is_terminal() {
        return None;
    }
    match card.next_review_at {
        Some(at) if at > now => Some(at - now),
        _ => Some(Duration::ZERO),
    }
}

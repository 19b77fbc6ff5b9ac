use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::scheduler::{is_due, Flashcard, SchedulerError, Status, StatusCounts};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    InvalidState(#[from] SchedulerError),
}

/// Result of a review attempt against the stored card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Card after the review. Memorized cards come back unchanged.
    Reviewed(Flashcard),
    /// Card is scheduled later than `now`; nothing was written.
    NotDue(Flashcard),
    Missing,
}

/// Persistence for flashcards. Every query is scoped to the owning user.
#[async_trait]
pub trait FlashcardStore: Send + Sync {
    async fn insert(&self, card: &Flashcard) -> Result<Flashcard, StoreError>;

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Flashcard>, StoreError>;

    /// Cards in any of `statuses`, newest first.
    async fn list(
        &self,
        owner: Uuid,
        statuses: &[Status],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Flashcard>, StoreError>;

    /// Up to `limit` cards due at `now`, most overdue first.
    async fn due(
        &self,
        owner: Uuid,
        now: OffsetDateTime,
        limit: i64,
    ) -> Result<Vec<Flashcard>, StoreError>;

    /// Apply one successful review to a card if it is due at `now`. The read,
    /// the due check, the call to [`crate::scheduler::advance`] and the write
    /// happen atomically for the card.
    async fn review(
        &self,
        owner: Uuid,
        id: Uuid,
        now: OffsetDateTime,
    ) -> Result<ReviewOutcome, StoreError>;

    /// Returns false when no such card exists for `owner`.
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError>;

    async fn status_counts(&self, owner: Uuid) -> Result<StatusCounts, StoreError>;
}

/// A card accepts a review once it is due. Memorized cards accept it as a no-op.
pub fn reviewable(card: &Flashcard, now: OffsetDateTime) -> bool {
    card.status.is_terminal() || is_due(card, now)
}

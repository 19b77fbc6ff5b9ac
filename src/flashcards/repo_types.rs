use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::scheduler::{Flashcard, SchedulerError};

/// Flashcard as stored in the `flashcards` table.
#[derive(Debug, Clone, FromRow)]
pub struct FlashcardRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub status: String,               // raw status string, decoded on conversion
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub status_once_checked_at: Option<OffsetDateTime>,
    pub status_twice_checked_at: Option<OffsetDateTime>,
    pub status_fully_memorized_at: Option<OffsetDateTime>,
    pub last_checked_at: Option<OffsetDateTime>,
    pub next_review_at: Option<OffsetDateTime>,
}

impl TryFrom<FlashcardRow> for Flashcard {
    type Error = SchedulerError;

    fn try_from(r: FlashcardRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            owner: r.user_id,
            content: r.content,
            status: r.status.parse()?,
            created_at: r.created_at,
            updated_at: r.updated_at,
            status_once_checked_at: r.status_once_checked_at,
            status_twice_checked_at: r.status_twice_checked_at,
            status_fully_memorized_at: r.status_fully_memorized_at,
            last_checked_at: r.last_checked_at,
            next_review_at: r.next_review_at,
        })
    }
}

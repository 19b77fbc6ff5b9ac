use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::Status;

/// A flashcard together with its review history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub owner: Uuid,
    pub content: String,
    pub status: Status,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub status_once_checked_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub status_twice_checked_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub status_fully_memorized_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_checked_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub next_review_at: Option<OffsetDateTime>,
}

impl Flashcard {
    /// New card in `to-learn`, reviewable immediately.
    pub fn new(owner: Uuid, content: impl Into<String>, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            content: content.into(),
            status: Status::ToLearn,
            created_at: now,
            updated_at: now,
            status_once_checked_at: None,
            status_twice_checked_at: None,
            status_fully_memorized_at: None,
            last_checked_at: None,
            next_review_at: Some(now),
        }
    }
}

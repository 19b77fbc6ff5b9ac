use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::{
    repo_types::FlashcardRow,
    store::{reviewable, FlashcardStore, ReviewOutcome, StoreError},
};
use crate::scheduler::{self, Flashcard, Status, StatusCounts};

const COLUMNS: &str = "id, user_id, content, status, created_at, updated_at, \
     status_once_checked_at, status_twice_checked_at, status_fully_memorized_at, \
     last_checked_at, next_review_at";

/// Postgres-backed [`FlashcardStore`].
#[derive(Clone)]
pub struct PgFlashcardStore {
    db: PgPool,
}

impl PgFlashcardStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn decode(rows: Vec<FlashcardRow>) -> Result<Vec<Flashcard>, StoreError> {
    rows.into_iter()
        .map(|r| Flashcard::try_from(r).map_err(StoreError::from))
        .collect()
}

#[async_trait]
impl FlashcardStore for PgFlashcardStore {
    async fn insert(&self, card: &Flashcard) -> Result<Flashcard, StoreError> {
        let row = sqlx::query_as::<_, FlashcardRow>(&format!(
            r#"
            INSERT INTO flashcards (id, user_id, content, status, created_at, updated_at, next_review_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(card.id)
        .bind(card.owner)
        .bind(&card.content)
        .bind(card.status.as_str())
        .bind(card.created_at)
        .bind(card.updated_at)
        .bind(card.next_review_at)
        .fetch_one(&self.db)
        .await?;
        Ok(Flashcard::try_from(row)?)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Flashcard>, StoreError> {
        let row = sqlx::query_as::<_, FlashcardRow>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM flashcards
            WHERE id = $1 AND user_id = $2
            "#
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Flashcard::try_from).transpose()?)
    }

    async fn list(
        &self,
        owner: Uuid,
        statuses: &[Status],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Flashcard>, StoreError> {
        let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
        let rows = sqlx::query_as::<_, FlashcardRow>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM flashcards
            WHERE user_id = $1 AND status = ANY($2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(owner)
        .bind(statuses)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        decode(rows)
    }

    async fn due(
        &self,
        owner: Uuid,
        now: OffsetDateTime,
        limit: i64,
    ) -> Result<Vec<Flashcard>, StoreError> {
        let rows = sqlx::query_as::<_, FlashcardRow>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM flashcards
            WHERE user_id = $1
              AND status <> 'fully-memorized'
              AND (next_review_at IS NULL OR next_review_at <= $2)
            ORDER BY next_review_at ASC NULLS FIRST, created_at ASC
            LIMIT $3
            "#
        ))
        .bind(owner)
        .bind(now)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        decode(rows)
    }

    async fn review(
        &self,
        owner: Uuid,
        id: Uuid,
        now: OffsetDateTime,
    ) -> Result<ReviewOutcome, StoreError> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, FlashcardRow>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM flashcards
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(ReviewOutcome::Missing);
        };
        let card = Flashcard::try_from(row)?;
        if !reviewable(&card, now) {
            debug!(card_id = %id, next_review_at = ?card.next_review_at, "card not due yet");
            tx.commit().await?;
            return Ok(ReviewOutcome::NotDue(card));
        }
        let next = scheduler::advance(&card, now);
        if next == card {
            debug!(card_id = %id, "review left card unchanged; skipping write");
            tx.commit().await?;
            return Ok(ReviewOutcome::Reviewed(card));
        }

        let row = sqlx::query_as::<_, FlashcardRow>(&format!(
            r#"
            UPDATE flashcards
            SET status = $3,
                status_once_checked_at = $4,
                status_twice_checked_at = $5,
                status_fully_memorized_at = $6,
                last_checked_at = $7,
                next_review_at = $8,
                updated_at = $9
            WHERE id = $1 AND user_id = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(next.status.as_str())
        .bind(next.status_once_checked_at)
        .bind(next.status_twice_checked_at)
        .bind(next.status_fully_memorized_at)
        .bind(next.last_checked_at)
        .bind(next.next_review_at)
        .bind(next.updated_at)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(ReviewOutcome::Reviewed(Flashcard::try_from(row)?))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM flashcards
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn status_counts(&self, owner: Uuid) -> Result<StatusCounts, StoreError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT status, COUNT(*)
            FROM flashcards
            WHERE user_id = $1
            GROUP BY status
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;

        let mut counts = StatusCounts::default();
        for (status, n) in rows {
            counts.add(status.parse()?, n.max(0) as u64);
        }
        Ok(counts)
    }
}

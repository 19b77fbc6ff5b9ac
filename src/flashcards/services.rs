use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use super::store::{FlashcardStore, ReviewOutcome, StoreError};
use crate::scheduler::{self, Flashcard, SchedulerError, Status};

pub const MAX_CONTENT_CHARS: usize = 2000;

#[derive(Debug, Error)]
pub enum FlashcardError {
    #[error("content must not be empty")]
    EmptyContent,
    #[error("content exceeds {max} characters")]
    ContentTooLong { max: usize },
    #[error("flashcard not found")]
    NotFound,
    #[error("flashcard is not due for another {due_in_seconds} seconds")]
    NotDue { due_in_seconds: i64 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub async fn create_card(
    store: &dyn FlashcardStore,
    owner: Uuid,
    content: &str,
    now: OffsetDateTime,
) -> Result<Flashcard, FlashcardError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(FlashcardError::EmptyContent);
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(FlashcardError::ContentTooLong {
            max: MAX_CONTENT_CHARS,
        });
    }
    let card = store.insert(&Flashcard::new(owner, content, now)).await?;
    info!(card_id = %card.id, %owner, "flashcard created");
    Ok(card)
}

/// Cards to show for review at `now`, most overdue first.
pub async fn due_cards(
    store: &dyn FlashcardStore,
    owner: Uuid,
    now: OffsetDateTime,
    limit: i64,
) -> Result<Vec<Flashcard>, FlashcardError> {
    let candidates = store.due(owner, now, limit).await?;
    let fetched = candidates.len();
    let due: Vec<_> = candidates
        .into_iter()
        .filter(|card| scheduler::is_due(card, now))
        .collect();
    if due.len() != fetched {
        debug!(fetched, kept = due.len(), "store returned cards that are not due");
    }
    Ok(scheduler::due_ordering(due))
}

pub async fn review_card(
    store: &dyn FlashcardStore,
    owner: Uuid,
    id: Uuid,
    now: OffsetDateTime,
) -> Result<Flashcard, FlashcardError> {
    match store.review(owner, id, now).await? {
        ReviewOutcome::Reviewed(card) => {
            info!(card_id = %id, status = %card.status, "flashcard reviewed");
            Ok(card)
        }
        ReviewOutcome::NotDue(card) => {
            let due_in_seconds = scheduler::time_until_due(&card, now)
                .map(|d| d.whole_seconds())
                .unwrap_or_default();
            debug!(card_id = %id, due_in_seconds, "review before due time rejected");
            Err(FlashcardError::NotDue { due_in_seconds })
        }
        ReviewOutcome::Missing => Err(FlashcardError::NotFound),
    }
}

/// Parse a comma-separated status filter. Absent or blank means every status.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Vec<Status>, SchedulerError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Status::ALL.to_vec());
    };
    let mut statuses = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let status: Status = part.parse()?;
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }
    Ok(statuses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::store::memory::MemoryStore;
    use time::{macros::datetime, Duration};

    #[test]
    fn status_filter_defaults_to_all() {
        assert_eq!(parse_status_filter(None).unwrap(), Status::ALL.to_vec());
        assert_eq!(parse_status_filter(Some("  ")).unwrap(), Status::ALL.to_vec());
    }

    #[test]
    fn status_filter_parses_list() {
        let parsed = parse_status_filter(Some("to-learn, once-checked,to-learn")).unwrap();
        assert_eq!(parsed, vec![Status::ToLearn, Status::OnceChecked]);
    }

    #[test]
    fn status_filter_rejects_unknown() {
        let err = parse_status_filter(Some("to-learn,learned")).unwrap_err();
        assert_eq!(err, SchedulerError::InvalidState { value: "learned".into() });
    }

    #[tokio::test]
    async fn create_trims_and_validates_content() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let now = datetime!(2024-01-01 00:00 UTC);

        let card = create_card(&store, owner, "  Guten Morgen  ", now).await.unwrap();
        assert_eq!(card.content, "Guten Morgen");
        assert_eq!(card.status, Status::ToLearn);

        assert!(matches!(
            create_card(&store, owner, "   ", now).await,
            Err(FlashcardError::EmptyContent)
        ));
        let long = "x".repeat(MAX_CONTENT_CHARS + 1);
        assert!(matches!(
            create_card(&store, owner, &long, now).await,
            Err(FlashcardError::ContentTooLong { .. })
        ));
    }

    #[tokio::test]
    async fn due_cards_follow_review_schedule() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let t = datetime!(2024-01-01 00:00 UTC);

        let first = create_card(&store, owner, "eins", t).await.unwrap();
        let second = create_card(&store, owner, "zwei", t + Duration::minutes(1)).await.unwrap();

        let due = due_cards(&store, owner, t + Duration::minutes(5), 10).await.unwrap();
        let ids: Vec<_> = due.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);

        review_card(&store, owner, first.id, t + Duration::minutes(5)).await.unwrap();
        let due = due_cards(&store, owner, t + Duration::hours(1), 10).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, second.id);

        let due = due_cards(&store, owner, t + Duration::hours(25), 10).await.unwrap();
        let ids: Vec<_> = due.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn reviews_wait_for_each_interval() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let t = datetime!(2024-01-01 00:00 UTC);
        let card = create_card(&store, owner, "vier", t).await.unwrap();

        let once = review_card(&store, owner, card.id, t).await.unwrap();
        assert_eq!(once.status, Status::OnceChecked);

        for early in [Duration::minutes(1), Duration::minutes(2), Duration::hours(23)] {
            let err = review_card(&store, owner, card.id, t + early).await.unwrap_err();
            let expected = (Duration::hours(24) - early).whole_seconds();
            assert!(matches!(
                err,
                FlashcardError::NotDue { due_in_seconds } if due_in_seconds == expected
            ));
        }
        assert_eq!(store.get(owner, card.id).await.unwrap(), Some(once.clone()));

        let twice = review_card(&store, owner, card.id, t + Duration::hours(24)).await.unwrap();
        assert_eq!(twice.status, Status::TwiceChecked);
        assert!(matches!(
            review_card(&store, owner, card.id, t + Duration::hours(71)).await,
            Err(FlashcardError::NotDue { .. })
        ));

        let memorized = review_card(&store, owner, card.id, t + Duration::hours(72)).await.unwrap();
        assert_eq!(memorized.status, Status::FullyMemorized);
        assert_eq!(memorized.next_review_at, None);

        let again = review_card(&store, owner, card.id, t + Duration::hours(73)).await.unwrap();
        assert_eq!(again, memorized);
    }

    #[tokio::test]
    async fn review_of_missing_card_is_not_found() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let now = datetime!(2024-01-01 00:00 UTC);
        let card = create_card(&store, owner, "drei", now).await.unwrap();

        let stranger = Uuid::new_v4();
        assert!(matches!(
            review_card(&store, stranger, card.id, now).await,
            Err(FlashcardError::NotFound)
        ));
    }
}

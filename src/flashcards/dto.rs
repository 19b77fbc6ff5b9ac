use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::scheduler::{self, Flashcard, StatusCounts};

#[derive(Debug, Deserialize)]
pub struct CreateFlashcardRequest {
    pub content: String,
}

/// A card plus its review state as seen at request time.
#[derive(Debug, Serialize)]
pub struct FlashcardResponse {
    #[serde(flatten)]
    pub card: Flashcard,
    pub due: bool,
    pub due_in_seconds: Option<i64>, // null once memorized
}

impl FlashcardResponse {
    pub fn at(card: Flashcard, now: OffsetDateTime) -> Self {
        let due = scheduler::is_due(&card, now);
        let due_in_seconds = scheduler::time_until_due(&card, now).map(|d| d.whole_seconds());
        Self {
            card,
            due,
            due_in_seconds,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub counts: StatusCounts,
    pub total: u64,
    pub progress: f64,
}

impl From<StatusCounts> for StatsResponse {
    fn from(counts: StatusCounts) -> Self {
        Self {
            total: counts.total(),
            progress: counts.progress(),
            counts,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Comma-separated statuses, e.g. `to-learn,once-checked`.
    pub status: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 20 }

#[derive(Debug, Deserialize)]
pub struct DueQuery {
    pub limit: Option<i64>,
}

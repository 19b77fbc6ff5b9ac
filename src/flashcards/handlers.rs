use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateFlashcardRequest, DueQuery, FlashcardResponse, ListQuery, StatsResponse},
    services::{self, FlashcardError},
};
use crate::{auth::extractors::AuthUser, state::AppState};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/flashcards", get(list_flashcards))
        .route("/flashcards/due", get(due_flashcards))
        .route("/flashcards/stats", get(flashcard_stats))
        .route("/flashcards/:id", get(get_flashcard))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/flashcards", post(create_flashcard))
        .route("/flashcards/:id", axum::routing::delete(delete_flashcard))
        .route("/flashcards/:id/review", post(review_flashcard))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_flashcards(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<FlashcardResponse>>, (StatusCode, String)> {
    let statuses = services::parse_status_filter(q.status.as_deref())
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let cards = state
        .store
        .list(user_id, &statuses, q.limit.clamp(1, 200), q.offset.max(0))
        .await
        .map_err(|e| internal(FlashcardError::from(e)))?;

    let now = OffsetDateTime::now_utc();
    Ok(Json(
        cards
            .into_iter()
            .map(|c| FlashcardResponse::at(c, now))
            .collect(),
    ))
}

/// POST /flashcards { content: "..." }
#[instrument(skip(state, body))]
pub async fn create_flashcard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateFlashcardRequest>,
) -> Result<(StatusCode, HeaderMap, Json<FlashcardResponse>), (StatusCode, String)> {
    let now = OffsetDateTime::now_utc();
    let card = services::create_card(state.store.as_ref(), user_id, &body.content, now)
        .await
        .map_err(reject)?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/v1/flashcards/{}", card.id)) {
        headers.insert(header::LOCATION, location);
    }

    Ok((
        StatusCode::CREATED,
        headers,
        Json(FlashcardResponse::at(card, now)),
    ))
}

#[instrument(skip(state))]
pub async fn due_flashcards(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DueQuery>,
) -> Result<Json<Vec<FlashcardResponse>>, (StatusCode, String)> {
    let limit = state.config.review.due_limit(q.limit);
    let now = OffsetDateTime::now_utc();
    let cards = services::due_cards(state.store.as_ref(), user_id, now, limit)
        .await
        .map_err(reject)?;
    Ok(Json(
        cards
            .into_iter()
            .map(|c| FlashcardResponse::at(c, now))
            .collect(),
    ))
}

#[instrument(skip(state))]
pub async fn flashcard_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    let counts = state
        .store
        .status_counts(user_id)
        .await
        .map_err(|e| internal(FlashcardError::from(e)))?;
    Ok(Json(counts.into()))
}

#[instrument(skip(state))]
pub async fn get_flashcard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FlashcardResponse>, (StatusCode, String)> {
    let card = state
        .store
        .get(user_id, id)
        .await
        .map_err(|e| internal(FlashcardError::from(e)))?
        .ok_or_else(|| reject(FlashcardError::NotFound))?;
    Ok(Json(FlashcardResponse::at(card, OffsetDateTime::now_utc())))
}

/// POST /flashcards/:id/review — record one successful review; 409 before the card is due.
#[instrument(skip(state))]
pub async fn review_flashcard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FlashcardResponse>, (StatusCode, String)> {
    let now = OffsetDateTime::now_utc();
    let card = services::review_card(state.store.as_ref(), user_id, id, now)
        .await
        .map_err(reject)?;
    Ok(Json(FlashcardResponse::at(card, now)))
}

#[instrument(skip(state))]
pub async fn delete_flashcard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = state
        .store
        .delete(user_id, id)
        .await
        .map_err(|e| internal(FlashcardError::from(e)))?;
    if !deleted {
        return Err(reject(FlashcardError::NotFound));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn reject(e: FlashcardError) -> (StatusCode, String) {
    match e {
        FlashcardError::EmptyContent | FlashcardError::ContentTooLong { .. } => {
            warn!(error = %e, "rejected flashcard content");
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        FlashcardError::NotFound => (StatusCode::NOT_FOUND, "Flashcard not found".into()),
        FlashcardError::NotDue { .. } => (StatusCode::CONFLICT, e.to_string()),
        FlashcardError::Store(_) => internal(e),
    }
}

fn internal(e: FlashcardError) -> (StatusCode, String) {
    error!(error = %e, "flashcard store failure");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

mod dto;
pub mod handlers;
pub mod repo;
mod repo_types;
pub mod services;
pub mod store;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}

//! Verification of Supabase access tokens. Sign-up, sign-in and token
//! issuance stay with Supabase Auth.

use crate::state::AppState;
use axum::Router;

mod claims;
pub mod extractors;
pub mod handlers;
pub mod jwt;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::me_routes())
}

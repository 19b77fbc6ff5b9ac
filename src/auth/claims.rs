use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of a Supabase access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // auth.users.id
    pub exp: usize,     // expires at (unix timestamp)
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>, // "authenticated" for signed-in users
}

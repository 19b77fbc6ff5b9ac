use axum::extract::FromRef;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::debug;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

/// Verification keys for access tokens issued by Supabase Auth.
/// The service never signs tokens itself.
#[derive(Clone)]
pub struct JwtKeys {
    pub decoding: DecodingKey,
    pub audience: String,
    pub issuer: Option<String>,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            audience: cfg.audience.clone(),
            issuer: cfg.issuer.clone(),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(std::slice::from_ref(&self.audience));
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(std::slice::from_ref(issuer));
        }
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, role = ?data.claims.role, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use time::OffsetDateTime;
    use uuid::Uuid;

    /// Mint a token the way Supabase Auth does, with `exp` relative to now.
    pub fn sign(secret: &str, aud: &str, iss: Option<&str>, sub: Uuid, ttl_secs: i64) -> String {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let mut claims = json!({
            "sub": sub,
            "aud": aud,
            "exp": now + ttl_secs,
            "iat": now,
            "email": "learner@example.com",
            "role": "authenticated",
        });
        if let Some(iss) = iss {
            claims["iss"] = json!(iss);
        }
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("sign test token")
    }
}

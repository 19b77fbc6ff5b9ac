use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

/// Verification settings for Supabase-issued access tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub audience: String,
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewConfig {
    pub due_default_limit: i64,
    pub due_max_limit: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub review: ReviewConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("SUPABASE_JWT_SECRET")
                .context("SUPABASE_JWT_SECRET is not set")?,
            audience: std::env::var("SUPABASE_JWT_AUDIENCE")
                .unwrap_or_else(|_| "authenticated".into()),
            issuer: std::env::var("SUPABASE_JWT_ISSUER").ok(),
        };
        let review = ReviewConfig {
            due_default_limit: env_or("DUE_DEFAULT_LIMIT", 10),
            due_max_limit: env_or("DUE_MAX_LIMIT", 100),
        };
        Ok(Self {
            database_url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            jwt,
            review,
        })
    }
}

impl ReviewConfig {
    /// Clamp a requested due-list size to `1..=due_max_limit`.
    pub fn due_limit(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.due_default_limit)
            .clamp(1, self.due_max_limit.max(1))
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_missing_or_garbage() {
        assert_eq!(env_or("FLASHDECK_TEST_UNSET_VAR", 7i64), 7);

        std::env::set_var("FLASHDECK_TEST_GARBAGE_VAR", "not-a-number");
        assert_eq!(env_or("FLASHDECK_TEST_GARBAGE_VAR", 3u32), 3);

        std::env::set_var("FLASHDECK_TEST_NUMBER_VAR", "42");
        assert_eq!(env_or("FLASHDECK_TEST_NUMBER_VAR", 3u32), 42);
    }

    #[test]
    fn due_limit_is_clamped() {
        let review = ReviewConfig {
            due_default_limit: 10,
            due_max_limit: 100,
        };
        assert_eq!(review.due_limit(None), 10);
        assert_eq!(review.due_limit(Some(0)), 1);
        assert_eq!(review.due_limit(Some(-5)), 1);
        assert_eq!(review.due_limit(Some(25)), 25);
        assert_eq!(review.due_limit(Some(10_000)), 100);
    }
}

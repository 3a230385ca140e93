use std::env;

/// Request-handling knobs with environment overrides.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub token_ttl_secs: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024,
            token_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_body_bytes: env_usize("NOTEHIVE_MAX_BODY_BYTES", defaults.max_body_bytes),
            token_ttl_secs: env_i64("NOTEHIVE_TOKEN_TTL_SECS", defaults.token_ttl_secs),
        }
    }
}

pub(crate) fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}

//! Bearer-token issuance/verification and password hashing.
//!
//! Tokens sign `user_id\nexpiry` with HMAC-SHA256:
//! `base64url(payload).hex(signature)`. Passwords are stored as
//! `hex(salt)$hex(sha256(salt || password))` with a random 16-byte salt.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use notehive_core::{time, Error, Result, UserId};
use notehive_model::User;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::http::response::error_response;
use crate::middleware::request_id_of;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Authenticated caller, resolved by the middleware and handed to handlers
/// as a request extension. Domain operations receive `user.id` explicitly.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user: User,
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: Arc<str>,
    ttl_secs: i64,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into().into(),
            ttl_secs,
        }
    }

    #[must_use]
    pub fn issue(&self, user_id: &UserId) -> String {
        self.issue_with_expiry(user_id, time::unix_secs() + self.ttl_secs)
    }

    #[must_use]
    pub fn issue_with_expiry(&self, user_id: &UserId, expires_at: i64) -> String {
        let payload = format!("{user_id}\n{expires_at}");
        let signature = self.sign(&payload);
        format!("{}.{}", URL_SAFE_NO_PAD.encode(&payload), signature)
    }

    pub fn verify(&self, token: &str) -> Result<UserId> {
        let invalid = || Error::unauthenticated("invalid or expired token");
        let (payload_b64, signature_hex) = token.split_once('.').ok_or_else(invalid)?;
        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| invalid())?;
        let payload = String::from_utf8(payload_bytes).map_err(|_| invalid())?;

        let signature = hex::decode(signature_hex).map_err(|_| invalid())?;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| Error::storage("hmac key setup failed"))?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let (user_id, expires_at) = payload.split_once('\n').ok_or_else(invalid)?;
        let expires_at: i64 = expires_at.parse().map_err(|_| invalid())?;
        if expires_at < time::unix_secs() {
            return Err(invalid());
        }
        UserId::new(user_id).map_err(|_| invalid())
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("hmac accepts keys of any length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    format!("{}${}", hex::encode(salt), digest_hex(&salt, password))
}

#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    digest_hex(&salt, password) == digest
}

fn digest_hex(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

/// Resolves the bearer credential to a caller before any protected handler
/// runs; failures answer 401 without touching the route.
pub async fn require_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let request_id = request_id_of(request.extensions());

    let Some(token) = bearer_token(&request) else {
        return error_response(
            &Error::unauthenticated("authentication required; provide a bearer token"),
            &request_id,
        );
    };

    let user_id = match state.tokens.verify(token) {
        Ok(id) => id,
        Err(err) => return error_response(&err, &request_id),
    };

    let user = match state.store.user_by_id(&user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!(request_id = %request_id, "token subject no longer exists");
            return error_response(
                &Error::unauthenticated("user not found; token is invalid"),
                &request_id,
            );
        }
        Err(err) => return error_response(&err, &request_id),
    };

    request.extensions_mut().insert(Caller { user });
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify() {
        let signer = TokenSigner::new("secret", 3600);
        let user = UserId::generate();
        let token = signer.issue(&user);
        assert_eq!(signer.verify(&token).expect("verify"), user);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let signer = TokenSigner::new("secret", 3600);
        let user = UserId::generate();
        let token = signer.issue_with_expiry(&user, time::unix_secs() - 1);
        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let signer = TokenSigner::new("secret", 3600);
        let other_signer = TokenSigner::new("other-secret", 3600);
        let user = UserId::generate();
        let token = other_signer.issue(&user);
        assert!(signer.verify(&token).is_err());
        assert!(signer.verify("garbage").is_err());
        assert!(signer.verify("").is_err());
    }

    #[test]
    fn password_hashing_round_trips() {
        let stored = hash_password("correct horse");
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("wrong horse", &stored));
        assert!(!verify_password("correct horse", "malformed"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }
}

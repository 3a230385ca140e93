use notehive_api::{user_summary, AuthResponse, LoginRequest, RegisterRequest, UserDto, UserResponse};
use notehive_core::{Error, Result};
use notehive_model::{User, MIN_PASSWORD_LEN};
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::AppState;

pub async fn register(state: &AppState, req: RegisterRequest) -> Result<AuthResponse> {
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::invalid_argument(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let user = User::new(&req.name, &req.email, hash_password(&req.password))?;
    // The unique index is the real guard; this check just produces a nicer
    // message in the common case.
    if state.store.user_by_email(&user.email).await?.is_some() {
        return Err(Error::conflict("a user with this email already exists"));
    }
    state.store.insert_user(&user).await?;
    info!(user_id = %user.id, "user registered");
    Ok(AuthResponse {
        token: state.tokens.issue(&user.id),
        user: user_summary(&user),
    })
}

pub async fn login(state: &AppState, req: LoginRequest) -> Result<AuthResponse> {
    // One indistinct message for unknown email and wrong password.
    let rejected = || Error::unauthenticated("invalid email or password");
    let email = req.email.trim().to_ascii_lowercase();
    let user = state
        .store
        .user_by_email(&email)
        .await?
        .ok_or_else(rejected)?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(rejected());
    }
    Ok(AuthResponse {
        token: state.tokens.issue(&user.id),
        user: user_summary(&user),
    })
}

#[must_use]
pub fn current_user(user: &User) -> UserResponse {
    UserResponse {
        user: UserDto {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        },
    }
}

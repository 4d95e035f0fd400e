//! Handlers for the `/auth` resource (login, password reset, session check).

use archive_core::error::CoreError;
use archive_db::models::password_reset::CreatePasswordReset;
use archive_db::models::user::UserResponse;
use archive_db::repositories::{PasswordResetRepo, UserRepo};
use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_session_token;
use crate::auth::password::{
    hash_password_blocking, validate_password_strength, verify_password_blocking,
};
use crate::auth::reset::{
    build_reset_url, generate_reset_token, hash_reset_token, RESET_TOKEN_TTL_MINS,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`. `username` may also be an email.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Successful login: a session token plus the public user fields.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub message: String,
    /// Only populated in development mode, where no email is sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_url: Option<String>,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with username (or email) + password. Every failure is the
/// same generic 401 so the response does not reveal which part was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    input.validate()?;

    let user = UserRepo::find_by_login(&state.pool, input.username.trim())
        .await?
        .ok_or(AppError::Core(CoreError::InvalidCredentials))?;

    let password_valid =
        verify_password_blocking(input.password, user.password_hash.clone()).await?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(AppError::Core(CoreError::InvalidCredentials));
    }

    let token = generate_session_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// POST /api/auth/forgot-password
///
/// Issue a single-use reset token for the account with this email. In
/// development the link is returned in the body; otherwise it is emailed and
/// a delivery failure is surfaced as an error.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<ForgotPasswordResponse>> {
    input.validate()?;

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or(AppError::Core(CoreError::EmailNotFound))?;
    let email = user
        .email
        .clone()
        .ok_or(AppError::Core(CoreError::EmailNotFound))?;

    let (token, token_hash) = generate_reset_token();
    PasswordResetRepo::create(
        &state.pool,
        &CreatePasswordReset {
            email: email.clone(),
            token_hash,
            expires_at: Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINS),
        },
    )
    .await?;

    let reset_url = build_reset_url(&state.config.frontend_url, &token);

    if state.config.app_env.is_development() {
        tracing::info!(user_id = user.id, "Password reset issued, link returned in response");
        return Ok(Json(ForgotPasswordResponse {
            message: "Development mode: Use this reset link".to_string(),
            reset_url: Some(reset_url),
        }));
    }

    let sender = state.reset_sender.as_ref().ok_or_else(|| {
        AppError::InternalError("Password reset email delivery is not configured".into())
    })?;
    sender
        .send_reset_link(&email, &reset_url)
        .await
        .map_err(|e| AppError::Delivery(e.to_string()))?;

    tracing::info!(user_id = user.id, "Password reset issued, link emailed");

    Ok(Json(ForgotPasswordResponse {
        message: "Password reset email sent".to_string(),
        reset_url: None,
    }))
}

/// POST /api/auth/reset-password
///
/// Redeem a reset token. The password change and the token consumption
/// happen in one transaction, so a token can only ever be used once.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    input.validate()?;
    validate_password_strength(&input.new_password, state.config.min_password_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let token_hash = hash_reset_token(input.token.trim());

    // Cheap pre-check so a bad token does not cost an Argon2 hash.
    if PasswordResetRepo::find_redeemable(&state.pool, &token_hash)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::InvalidOrExpiredToken));
    }

    let new_hash = hash_password_blocking(input.new_password).await?;
    if !PasswordResetRepo::redeem(&state.pool, &token_hash, &new_hash).await? {
        return Err(AppError::Core(CoreError::InvalidOrExpiredToken));
    }

    tracing::info!("Password reset completed");
    Ok(Json(MessageResponse::new("Password reset successful")))
}

/// GET /api/auth/me
///
/// Return the account behind the bearer token.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    Ok(Json(UserResponse::from(&user)))
}

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::{self, password, Claims};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// POST /api/auth/login - verify credentials and issue a session token.
///
/// Unknown usernames and wrong passwords are indistinguishable to the caller;
/// both come back as `invalid_credentials`.
pub async fn login_post(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let mut field_errors = HashMap::new();
    if payload.username.trim().is_empty() {
        field_errors.insert("username".to_string(), "Username is required".to_string());
    }
    if payload.password.is_empty() {
        field_errors.insert("password".to_string(), "Password is required".to_string());
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation("Invalid input", Some(field_errors)));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(&payload.username)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(ApiError::invalid_credentials)?;

    if !password::verify_password(&user.password_hash, &payload.password) {
        return Err(ApiError::invalid_credentials());
    }

    let claims = Claims::new(user.id, user.username.clone(), user.role);
    let token = auth::generate_jwt(&claims).map_err(|e| {
        tracing::error!("token issuance failed: {}", e);
        ApiError::internal("Failed to issue token")
    })?;

    tracing::info!("user '{}' logged in", user.username);

    Ok(ApiResponse::success(LoginResponse { user, token }))
}

use axum::extract::{Extension, Path, State};
use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/users - admin-only listing of all identities.
pub async fn users_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<User>> {
    user.authorize(&[Role::Admin])?;

    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY last_name, first_name")
        .fetch_all(&state.pool)
        .await?;

    Ok(ApiResponse::success(users))
}

/// GET /api/users/:id - a single identity. Callers may fetch themselves;
/// anyone else requires the admin role.
pub async fn user_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<User> {
    if user.role != Role::Admin && user.id != id {
        return Err(ApiError::forbidden());
    }

    let found = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(found))
}

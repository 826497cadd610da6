use axum::extract::State;

use crate::database::models::InstructorWithUser;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/instructors - active instructors with their contact details.
pub async fn instructors_get(State(state): State<AppState>) -> ApiResult<Vec<InstructorWithUser>> {
    let instructors = sqlx::query_as::<_, InstructorWithUser>(
        "SELECT i.id, i.user_id, i.license_number, i.hire_date, i.specializations, i.status,
                u.first_name, u.last_name, u.email, u.phone
         FROM instructors i
         JOIN users u ON i.user_id = u.id
         WHERE i.status = 'active'
         ORDER BY u.last_name, u.first_name",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(instructors))
}

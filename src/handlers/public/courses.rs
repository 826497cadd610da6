use axum::extract::State;

use crate::database::models::Course;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/courses - the open course catalog, browsable without a token.
pub async fn courses_get(State(state): State<AppState>) -> ApiResult<Vec<Course>> {
    let courses =
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE status = 'active' ORDER BY name")
            .fetch_all(&state.pool)
            .await?;

    Ok(ApiResponse::success(courses))
}

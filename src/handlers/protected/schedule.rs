use axum::extract::{Extension, Query, State};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::ScheduleEntry;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub instructor_id: Option<Uuid>,
}

/// GET /api/schedule - lessons within a date window, defaulting to the week
/// starting today. Instructor callers only ever see their own lessons unless
/// they ask for a specific colleague.
pub async fn schedule_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ScheduleQuery>,
) -> ApiResult<Vec<ScheduleEntry>> {
    let start = query.start_date.unwrap_or_else(|| Utc::now().date_naive());
    let end = query.end_date.unwrap_or(start + Duration::days(7));

    let instructor_filter = match query.instructor_id {
        Some(id) => Some(id),
        None if user.role == Role::Instructor => {
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM instructors WHERE user_id = $1")
                .bind(user.id)
                .fetch_optional(&state.pool)
                .await?
        }
        None => None,
    };

    let lessons = sqlx::query_as::<_, ScheduleEntry>(
        "SELECT l.id, l.enrollment_id, l.instructor_id, l.vehicle_id, l.lesson_type,
                l.start_time, l.end_time, l.duration, l.status, l.notes,
                e.student_id,
                su.first_name AS student_first_name, su.last_name AS student_last_name,
                iu.first_name AS instructor_first_name, iu.last_name AS instructor_last_name,
                v.make AS vehicle_make, v.model AS vehicle_model, v.vehicle_number
         FROM lessons l
         JOIN enrollments e ON l.enrollment_id = e.id
         JOIN students s ON e.student_id = s.id
         JOIN users su ON s.user_id = su.id
         JOIN instructors i ON l.instructor_id = i.id
         JOIN users iu ON i.user_id = iu.id
         LEFT JOIN vehicles v ON l.vehicle_id = v.id
         WHERE l.start_time::date BETWEEN $1 AND $2
         AND ($3::uuid IS NULL OR l.instructor_id = $3)
         ORDER BY l.start_time",
    )
    .bind(start)
    .bind(end)
    .bind(instructor_filter)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(lessons))
}

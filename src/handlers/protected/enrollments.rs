use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::EnrollmentWithCourse;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: Uuid,
    pub course_id: Uuid,
}

/// POST /api/enrollments - enroll an existing student in an existing course.
pub async fn enrollment_post(
    State(state): State<AppState>,
    Json(payload): Json<CreateEnrollmentRequest>,
) -> ApiResult<EnrollmentWithCourse> {
    let student_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE id = $1")
        .bind(payload.student_id)
        .fetch_one(&state.pool)
        .await?;
    if student_exists == 0 {
        return Err(ApiError::not_found("Student not found"));
    }

    let course_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE id = $1")
        .bind(payload.course_id)
        .fetch_one(&state.pool)
        .await?;
    if course_exists == 0 {
        return Err(ApiError::not_found("Course not found"));
    }

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO enrollments (id, student_id, course_id, enrollment_date)
         VALUES ($1, $2, $3, CURRENT_DATE)",
    )
    .bind(id)
    .bind(payload.student_id)
    .bind(payload.course_id)
    .execute(&state.pool)
    .await?;

    let enrollment = sqlx::query_as::<_, EnrollmentWithCourse>(
        "SELECT e.id, e.student_id, e.course_id, e.enrollment_date, e.completion_date,
                e.status, e.theory_progress, e.practical_progress, e.total_paid,
                c.name AS course_name, c.license_type, c.theory_hours, c.practical_hours, c.price
         FROM enrollments e
         JOIN courses c ON e.course_id = c.id
         WHERE e.id = $1",
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::created(enrollment))
}

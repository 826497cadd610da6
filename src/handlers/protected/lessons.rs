use axum::extract::{Extension, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::LessonDetail;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateLessonRequest {
    pub enrollment_id: Uuid,
    pub instructor_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub lesson_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
}

/// POST /api/lessons - schedule a lesson. Duration is derived from the
/// start/end pair; practical lessons must name a vehicle.
pub async fn lesson_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateLessonRequest>,
) -> ApiResult<LessonDetail> {
    user.authorize(&[Role::Admin, Role::Instructor])?;
    validate(&payload)?;

    let duration = lesson_duration_minutes(payload.start_time, payload.end_time)
        .ok_or_else(|| ApiError::bad_request("End time must be after start time"))?;

    let enrollment_exists: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE id = $1")
            .bind(payload.enrollment_id)
            .fetch_one(&state.pool)
            .await?;
    if enrollment_exists == 0 {
        return Err(ApiError::not_found("Enrollment not found"));
    }

    let instructor_exists: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM instructors WHERE id = $1")
            .bind(payload.instructor_id)
            .fetch_one(&state.pool)
            .await?;
    if instructor_exists == 0 {
        return Err(ApiError::not_found("Instructor not found"));
    }

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO lessons
         (id, enrollment_id, instructor_id, vehicle_id, lesson_type, start_time, end_time, duration, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(id)
    .bind(payload.enrollment_id)
    .bind(payload.instructor_id)
    .bind(payload.vehicle_id)
    .bind(&payload.lesson_type)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .bind(duration)
    .bind(&payload.notes)
    .execute(&state.pool)
    .await?;

    let lesson = sqlx::query_as::<_, LessonDetail>(
        "SELECT l.id, l.enrollment_id, l.instructor_id, l.vehicle_id, l.lesson_type,
                l.start_time, l.end_time, l.duration, l.status, l.notes,
                u.first_name AS instructor_first_name, u.last_name AS instructor_last_name,
                v.make AS vehicle_make, v.model AS vehicle_model, v.vehicle_number
         FROM lessons l
         JOIN instructors i ON l.instructor_id = i.id
         JOIN users u ON i.user_id = u.id
         LEFT JOIN vehicles v ON l.vehicle_id = v.id
         WHERE l.id = $1",
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::created(lesson))
}

/// Whole minutes between start and end, or None when the window is empty or
/// inverted.
fn lesson_duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<i32> {
    let minutes = (end - start).num_minutes();
    if minutes <= 0 {
        None
    } else {
        Some(minutes as i32)
    }
}

fn validate(payload: &CreateLessonRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if payload.lesson_type != "theory" && payload.lesson_type != "practical" {
        field_errors.insert(
            "lesson_type".to_string(),
            "Valid lesson type is required".to_string(),
        );
    }
    if payload.lesson_type == "practical" && payload.vehicle_id.is_none() {
        field_errors.insert(
            "vehicle_id".to_string(),
            "Vehicle ID is required for practical lessons".to_string(),
        );
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation("Invalid input", Some(field_errors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0).unwrap()
    }

    #[test]
    fn duration_is_whole_minutes_between_bounds() {
        assert_eq!(lesson_duration_minutes(at(9, 0), at(10, 30)), Some(90));
    }

    #[test]
    fn inverted_or_empty_windows_have_no_duration() {
        assert_eq!(lesson_duration_minutes(at(10, 0), at(10, 0)), None);
        assert_eq!(lesson_duration_minutes(at(11, 0), at(10, 0)), None);
    }

    #[test]
    fn practical_lessons_require_a_vehicle() {
        let payload = CreateLessonRequest {
            enrollment_id: Uuid::new_v4(),
            instructor_id: Uuid::new_v4(),
            vehicle_id: None,
            lesson_type: "practical".to_string(),
            start_time: at(9, 0),
            end_time: at(10, 0),
            notes: None,
        };
        assert!(validate(&payload).is_err());

        let theory = CreateLessonRequest {
            lesson_type: "theory".to_string(),
            ..payload
        };
        assert!(validate(&theory).is_ok());
    }
}

use axum::extract::{Extension, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::Role;
use crate::database::models;
use crate::database::models::exam::{Exam, EXAM_RESULTS};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateExamRequest {
    pub student_id: Uuid,
    pub exam_type: String,
    pub license_type: String,
    pub exam_date: NaiveDate,
    pub result: Option<String>,
    pub score: Option<i32>,
    pub notes: Option<String>,
}

/// POST /api/exams - record an exam; the result defaults to pending until
/// graded.
pub async fn exam_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateExamRequest>,
) -> ApiResult<Exam> {
    user.authorize(&[Role::Admin, Role::Instructor])?;
    validate(&payload)?;

    let student_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE id = $1")
        .bind(payload.student_id)
        .fetch_one(&state.pool)
        .await?;
    if student_exists == 0 {
        return Err(ApiError::not_found("Student not found"));
    }

    let exam = sqlx::query_as::<_, Exam>(
        "INSERT INTO exams
         (id, student_id, exam_type, license_type, exam_date, result, score, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.student_id)
    .bind(&payload.exam_type)
    .bind(&payload.license_type)
    .bind(payload.exam_date)
    .bind(payload.result.as_deref().unwrap_or("pending"))
    .bind(payload.score)
    .bind(&payload.notes)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::created(exam))
}

fn validate(payload: &CreateExamRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if payload.exam_type != "theory" && payload.exam_type != "practical" {
        field_errors.insert(
            "exam_type".to_string(),
            "Valid exam type is required".to_string(),
        );
    }
    if !models::is_valid_license_type(&payload.license_type) {
        field_errors.insert(
            "license_type".to_string(),
            "Valid license type is required".to_string(),
        );
    }
    if let Some(result) = payload.result.as_deref() {
        if !EXAM_RESULTS.contains(&result) {
            field_errors.insert("result".to_string(), "Valid result is required".to_string());
        }
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

    fn base_request() -> CreateExamRequest {
        CreateExamRequest {
            student_id: Uuid::new_v4(),
            exam_type: "theory".to_string(),
            license_type: "B".to_string(),
            exam_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            result: None,
            score: None,
            notes: None,
        }
    }

    #[test]
    fn accepts_pending_exam_without_result() {
        assert!(validate(&base_request()).is_ok());
    }

    #[test]
    fn rejects_unknown_exam_type_or_result() {
        let mut payload = base_request();
        payload.exam_type = "oral".to_string();
        assert!(validate(&payload).is_err());

        let mut payload = base_request();
        payload.result = Some("aced".to_string());
        assert!(validate(&payload).is_err());

        let mut payload = base_request();
        payload.result = Some("pass".to_string());
        assert!(validate(&payload).is_ok());
    }
}

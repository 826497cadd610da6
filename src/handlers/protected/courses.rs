use axum::extract::{Extension, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::{self, Course};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub name: String,
    pub description: Option<String>,
    pub license_type: String,
    pub theory_hours: i32,
    pub practical_hours: i32,
    pub price: Decimal,
    pub status: Option<String>,
}

/// POST /api/courses - admin-only course creation.
pub async fn course_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateCourseRequest>,
) -> ApiResult<Course> {
    user.authorize(&[Role::Admin])?;
    validate(&payload)?;

    let course = sqlx::query_as::<_, Course>(
        "INSERT INTO courses
         (id, name, description, license_type, theory_hours, practical_hours, price, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(&payload.license_type)
    .bind(payload.theory_hours)
    .bind(payload.practical_hours)
    .bind(payload.price)
    .bind(payload.status.as_deref().unwrap_or("active"))
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::created(course))
}

fn validate(payload: &CreateCourseRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if payload.name.trim().is_empty() {
        field_errors.insert("name".to_string(), "Course name is required".to_string());
    }
    if !models::is_valid_license_type(&payload.license_type) {
        field_errors.insert(
            "license_type".to_string(),
            "Valid license type is required".to_string(),
        );
    }
    if payload.theory_hours < 0 {
        field_errors.insert(
            "theory_hours".to_string(),
            "Theory hours must be a positive number".to_string(),
        );
    }
    if payload.practical_hours < 0 {
        field_errors.insert(
            "practical_hours".to_string(),
            "Practical hours must be a positive number".to_string(),
        );
    }
    if payload.price < Decimal::ZERO {
        field_errors.insert("price".to_string(), "Price must be a positive number".to_string());
    }
    if let Some(status) = payload.status.as_deref() {
        if status != "active" && status != "inactive" {
            field_errors.insert("status".to_string(), "Valid status is required".to_string());
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

    fn base_request() -> CreateCourseRequest {
        CreateCourseRequest {
            name: "Class B License - Standard".to_string(),
            description: None,
            license_type: "B".to_string(),
            theory_hours: 20,
            practical_hours: 15,
            price: Decimal::new(120000, 2),
            status: None,
        }
    }

    #[test]
    fn accepts_well_formed_courses() {
        assert!(validate(&base_request()).is_ok());
    }

    #[test]
    fn rejects_unknown_license_type_and_negative_hours() {
        let mut payload = base_request();
        payload.license_type = "X".to_string();
        payload.theory_hours = -1;
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.error_code(), "validation_error");
    }

    #[test]
    fn rejects_negative_price() {
        let mut payload = base_request();
        payload.price = Decimal::new(-100, 2);
        assert!(validate(&payload).is_err());
    }
}

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::{self, password, Claims, Role};
use crate::database::models::{self, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    // Role-specific fields
    pub license_type: Option<String>,
    pub license_number: Option<String>,
    pub specializations: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub token: String,
}

/// POST /api/auth/register - create an identity and its role-specific record
/// in one transaction, then issue a token.
pub async fn register_post(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<RegisterResponse> {
    validate(&payload)?;

    let duplicates: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1 OR email = $2")
            .bind(&payload.username)
            .bind(&payload.email)
            .fetch_one(&state.pool)
            .await?;
    if duplicates > 0 {
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = password::hash_password(&payload.password).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal("Failed to create user")
    })?;

    let user_id = Uuid::new_v4();
    let mut tx = state.pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users
         (id, username, email, password_hash, role, first_name, last_name, phone, address, date_of_birth)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING *",
    )
    .bind(user_id)
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(payload.role)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.phone)
    .bind(&payload.address)
    .bind(payload.date_of_birth)
    .fetch_one(&mut *tx)
    .await?;

    match payload.role {
        Role::Student => {
            sqlx::query(
                "INSERT INTO students (id, user_id, license_type, registration_date)
                 VALUES ($1, $2, $3, CURRENT_DATE)",
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(payload.license_type.as_deref().unwrap_or_default())
            .execute(&mut *tx)
            .await?;
        }
        Role::Instructor => {
            sqlx::query(
                "INSERT INTO instructors (id, user_id, license_number, hire_date, specializations)
                 VALUES ($1, $2, $3, CURRENT_DATE, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(payload.license_number.as_deref().unwrap_or_default())
            .bind(&payload.specializations)
            .execute(&mut *tx)
            .await?;
        }
        Role::Admin => {}
    }

    tx.commit().await?;

    let claims = Claims::new(user.id, user.username.clone(), user.role);
    let token = auth::generate_jwt(&claims).map_err(|e| {
        tracing::error!("token issuance failed: {}", e);
        ApiError::internal("Failed to issue token")
    })?;

    tracing::info!("registered {} '{}'", user.role, user.username);

    Ok(ApiResponse::created(RegisterResponse { user, token }))
}

fn validate(payload: &RegisterRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if payload.username.trim().is_empty() {
        field_errors.insert("username".to_string(), "Username is required".to_string());
    }
    if !payload.email.contains('@') {
        field_errors.insert("email".to_string(), "Valid email is required".to_string());
    }
    if payload.password.len() < 6 {
        field_errors.insert(
            "password".to_string(),
            "Password must be at least 6 characters".to_string(),
        );
    }
    if payload.first_name.trim().is_empty() {
        field_errors.insert("first_name".to_string(), "First name is required".to_string());
    }
    if payload.last_name.trim().is_empty() {
        field_errors.insert("last_name".to_string(), "Last name is required".to_string());
    }

    match payload.role {
        Role::Student => match payload.license_type.as_deref() {
            None | Some("") => {
                field_errors.insert(
                    "license_type".to_string(),
                    "License type is required for students".to_string(),
                );
            }
            Some(lt) if !models::is_valid_license_type(lt) => {
                field_errors.insert(
                    "license_type".to_string(),
                    "Valid license type is required".to_string(),
                );
            }
            _ => {}
        },
        Role::Instructor => {
            if payload.license_number.as_deref().unwrap_or("").is_empty() {
                field_errors.insert(
                    "license_number".to_string(),
                    "License number is required for instructors".to_string(),
                );
            }
        }
        Role::Admin => {}
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

    fn base_request(role: Role) -> RegisterRequest {
        RegisterRequest {
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password: "secret123".to_string(),
            role,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone: None,
            address: None,
            date_of_birth: None,
            license_type: None,
            license_number: None,
            specializations: None,
        }
    }

    #[test]
    fn student_registration_requires_license_type() {
        let payload = base_request(Role::Student);
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.status_code(), 400);

        let mut payload = base_request(Role::Student);
        payload.license_type = Some("B".to_string());
        assert!(validate(&payload).is_ok());

        payload.license_type = Some("Z".to_string());
        assert!(validate(&payload).is_err());
    }

    #[test]
    fn instructor_registration_requires_license_number() {
        let payload = base_request(Role::Instructor);
        assert!(validate(&payload).is_err());

        let mut payload = base_request(Role::Instructor);
        payload.license_number = Some("INS-042".to_string());
        assert!(validate(&payload).is_ok());
    }

    #[test]
    fn short_passwords_are_rejected() {
        let mut payload = base_request(Role::Admin);
        payload.password = "short".to_string();
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.error_code(), "validation_error");
    }
}

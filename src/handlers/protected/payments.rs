use axum::extract::{Extension, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::payment::{Payment, PAYMENT_METHODS};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub enrollment_id: Uuid,
    pub amount: Decimal,
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

/// POST /api/payments - record a payment and bump the enrollment's running
/// total in the same transaction.
pub async fn payment_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreatePaymentRequest>,
) -> ApiResult<Payment> {
    user.authorize(&[Role::Admin])?;
    validate(&payload)?;

    let enrollment_exists: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE id = $1")
            .bind(payload.enrollment_id)
            .fetch_one(&state.pool)
            .await?;
    if enrollment_exists == 0 {
        return Err(ApiError::not_found("Enrollment not found"));
    }

    let mut tx = state.pool.begin().await?;

    let payment = sqlx::query_as::<_, Payment>(
        "INSERT INTO payments
         (id, enrollment_id, amount, payment_date, payment_method, reference_number, notes)
         VALUES ($1, $2, $3, CURRENT_DATE, $4, $5, $6)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.enrollment_id)
    .bind(payload.amount)
    .bind(&payload.payment_method)
    .bind(&payload.reference_number)
    .bind(&payload.notes)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE enrollments SET total_paid = total_paid + $1, updated_at = now() WHERE id = $2",
    )
    .bind(payload.amount)
    .bind(payload.enrollment_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(ApiResponse::created(payment))
}

fn validate(payload: &CreatePaymentRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if payload.amount <= Decimal::ZERO {
        field_errors.insert(
            "amount".to_string(),
            "Amount must be greater than 0".to_string(),
        );
    }
    if !PAYMENT_METHODS.contains(&payload.payment_method.as_str()) {
        field_errors.insert(
            "payment_method".to_string(),
            "Valid payment method is required".to_string(),
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

    fn base_request() -> CreatePaymentRequest {
        CreatePaymentRequest {
            enrollment_id: Uuid::new_v4(),
            amount: Decimal::new(25000, 2),
            payment_method: "cash".to_string(),
            reference_number: None,
            notes: None,
        }
    }

    #[test]
    fn accepts_positive_amount_and_known_method() {
        assert!(validate(&base_request()).is_ok());
    }

    #[test]
    fn rejects_zero_amount() {
        let mut payload = base_request();
        payload.amount = Decimal::ZERO;
        assert!(validate(&payload).is_err());
    }

    #[test]
    fn rejects_unknown_payment_method() {
        let mut payload = base_request();
        payload.payment_method = "barter".to_string();
        assert!(validate(&payload).is_err());
    }
}

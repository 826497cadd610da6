use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Student row joined with the contact fields from `users`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub license_type: String,
    pub registration_date: NaiveDate,
    pub status: String,
    pub medical_certificate_expiry: Option<NaiveDate>,
    pub notes: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

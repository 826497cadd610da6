use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Instructor row joined with the contact fields from `users`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InstructorWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub license_number: String,
    pub hire_date: NaiveDate,
    pub specializations: Option<String>,
    pub status: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

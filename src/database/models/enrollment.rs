use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Enrollment joined with the course it belongs to.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnrollmentWithCourse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub enrollment_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub status: String,
    pub theory_progress: i32,
    pub practical_progress: i32,
    pub total_paid: Decimal,
    pub course_name: String,
    pub license_type: String,
    pub theory_hours: i32,
    pub practical_hours: i32,
    pub price: Decimal,
}

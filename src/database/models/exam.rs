use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const EXAM_RESULTS: [&str; 3] = ["pass", "fail", "pending"];

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Exam {
    pub id: Uuid,
    pub student_id: Uuid,
    pub exam_type: String,
    pub license_type: String,
    pub exam_date: NaiveDate,
    pub result: String,
    pub score: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

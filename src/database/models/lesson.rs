use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Lesson joined with instructor name and vehicle description.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LessonDetail {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub instructor_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub lesson_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: i32,
    pub status: String,
    pub notes: Option<String>,
    pub instructor_first_name: String,
    pub instructor_last_name: String,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_number: Option<String>,
}

/// Lesson as shown on the schedule: both participants plus the vehicle.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub instructor_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub lesson_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: i32,
    pub status: String,
    pub notes: Option<String>,
    pub student_id: Uuid,
    pub student_first_name: String,
    pub student_last_name: String,
    pub instructor_first_name: String,
    pub instructor_last_name: String,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_number: Option<String>,
}

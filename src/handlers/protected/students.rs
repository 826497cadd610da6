use axum::extract::{Extension, Path, State};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::{
    EnrollmentWithCourse, Exam, LessonDetail, Payment, StudentWithUser,
};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

const STUDENT_WITH_USER: &str =
    "SELECT s.id, s.user_id, s.license_type, s.registration_date, s.status,
            s.medical_certificate_expiry, s.notes,
            u.first_name, u.last_name, u.email, u.phone, u.address
     FROM students s
     JOIN users u ON s.user_id = u.id";

#[derive(Debug, Serialize)]
pub struct StudentDetail {
    pub student: StudentWithUser,
    pub enrollments: Vec<EnrollmentWithCourse>,
    pub lessons: Vec<LessonDetail>,
    pub exams: Vec<Exam>,
    pub payments: Vec<Payment>,
}

/// GET /api/students - listing restricted to staff roles.
pub async fn students_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<StudentWithUser>> {
    user.authorize(&[Role::Admin, Role::Instructor])?;

    let sql = format!("{} ORDER BY u.last_name, u.first_name", STUDENT_WITH_USER);
    let students = sqlx::query_as::<_, StudentWithUser>(&sql)
        .fetch_all(&state.pool)
        .await?;

    Ok(ApiResponse::success(students))
}

/// GET /api/students/:id - one student with their enrollments, lessons,
/// exams and payments.
pub async fn student_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StudentDetail> {
    let sql = format!("{} WHERE s.id = $1", STUDENT_WITH_USER);
    let student = sqlx::query_as::<_, StudentWithUser>(&sql)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let enrollments = sqlx::query_as::<_, EnrollmentWithCourse>(
        "SELECT e.id, e.student_id, e.course_id, e.enrollment_date, e.completion_date,
                e.status, e.theory_progress, e.practical_progress, e.total_paid,
                c.name AS course_name, c.license_type, c.theory_hours, c.practical_hours, c.price
         FROM enrollments e
         JOIN courses c ON e.course_id = c.id
         WHERE e.student_id = $1",
    )
    .bind(id)
    .fetch_all(&state.pool)
    .await?;

    let lessons = sqlx::query_as::<_, LessonDetail>(
        "SELECT l.id, l.enrollment_id, l.instructor_id, l.vehicle_id, l.lesson_type,
                l.start_time, l.end_time, l.duration, l.status, l.notes,
                u.first_name AS instructor_first_name, u.last_name AS instructor_last_name,
                v.make AS vehicle_make, v.model AS vehicle_model, v.vehicle_number
         FROM lessons l
         JOIN enrollments e ON l.enrollment_id = e.id
         JOIN instructors i ON l.instructor_id = i.id
         JOIN users u ON i.user_id = u.id
         LEFT JOIN vehicles v ON l.vehicle_id = v.id
         WHERE e.student_id = $1
         ORDER BY l.start_time DESC",
    )
    .bind(id)
    .fetch_all(&state.pool)
    .await?;

    let exams = sqlx::query_as::<_, Exam>(
        "SELECT * FROM exams WHERE student_id = $1 ORDER BY exam_date DESC",
    )
    .bind(id)
    .fetch_all(&state.pool)
    .await?;

    let payments = sqlx::query_as::<_, Payment>(
        "SELECT p.* FROM payments p
         JOIN enrollments e ON p.enrollment_id = e.id
         WHERE e.student_id = $1
         ORDER BY p.payment_date DESC",
    )
    .bind(id)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(StudentDetail {
        student,
        enrollments,
        lessons,
        exams,
        payments,
    }))
}

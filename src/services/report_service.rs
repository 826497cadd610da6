use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::DatabaseError;

/// Read-only aggregation over the persisted records. Every report is computed
/// on demand from current state; nothing is cached, and repeated calls over
/// unchanged data return identical results.
pub struct ReportService {
    pool: PgPool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_students: i64,
    pub active_instructors: i64,
    pub active_vehicles: i64,
    pub enrollments_this_month: i64,
    pub upcoming_lessons: i64,
    pub revenue_this_month: Decimal,
    pub course_enrollments: Vec<CourseEnrollmentCount>,
    pub exam_stats: HashMap<String, ExamTypeStats>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct CourseEnrollmentCount {
    pub id: Uuid,
    pub name: String,
    pub enrollment_count: i64,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ExamTypeStats {
    pub pass: i64,
    pub fail: i64,
    pub total: i64,
    pub pass_rate: f64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct StudentReportRow {
    pub id: Uuid,
    pub license_type: String,
    pub registration_date: NaiveDate,
    pub status: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub enrollment_count: i64,
    pub lesson_count: i64,
    pub exams_passed: i64,
    pub exams_failed: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct InstructorReportRow {
    pub id: Uuid,
    pub license_number: String,
    pub hire_date: NaiveDate,
    pub status: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub lesson_count: i64,
    pub total_teaching_minutes: i64,
    pub student_count: i64,
    #[sqlx(default)]
    pub total_teaching_hours: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub total: Decimal,
    pub monthly: Vec<MonthlyRevenue>,
    pub by_course: Vec<CourseRevenue>,
    pub by_payment_method: Vec<PaymentMethodRevenue>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: i32,
    pub total: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct CourseRevenue {
    pub id: Uuid,
    pub name: String,
    pub license_type: String,
    pub total: Decimal,
    pub enrollment_count: i64,
    pub average_per_enrollment: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct PaymentMethodRevenue {
    pub payment_method: String,
    pub count: i64,
    pub total: Decimal,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Headline aggregates for the dashboard view.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, DatabaseError> {
        let active_students: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await?;

        let active_instructors: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM instructors WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await?;

        let active_vehicles: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM vehicles WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await?;

        let enrollments_this_month: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM enrollments
             WHERE date_trunc('month', enrollment_date) = date_trunc('month', CURRENT_DATE)",
        )
        .fetch_one(&self.pool)
        .await?;

        let upcoming_lessons: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM lessons
             WHERE start_time >= now()
             AND start_time < now() + interval '7 days'
             AND status = 'scheduled'",
        )
        .fetch_one(&self.pool)
        .await?;

        let revenue_this_month: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payments
             WHERE date_trunc('month', payment_date) = date_trunc('month', CURRENT_DATE)",
        )
        .fetch_one(&self.pool)
        .await?;

        let course_enrollments = sqlx::query_as::<_, CourseEnrollmentCount>(
            "SELECT c.id, c.name, COUNT(e.id) AS enrollment_count
             FROM courses c
             LEFT JOIN enrollments e ON c.id = e.course_id
             GROUP BY c.id, c.name
             ORDER BY enrollment_count DESC
             LIMIT 5",
        )
        .fetch_all(&self.pool)
        .await?;

        let exam_rows: Vec<(String, String, i64)> = sqlx::query_as(
            "SELECT exam_type, result, COUNT(*)
             FROM exams
             WHERE result IN ('pass', 'fail')
             GROUP BY exam_type, result",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardStats {
            active_students,
            active_instructors,
            active_vehicles,
            enrollments_this_month,
            upcoming_lessons,
            revenue_this_month,
            course_enrollments,
            exam_stats: build_exam_stats(&exam_rows),
        })
    }

    /// Per-student activity summary.
    pub async fn student_report(&self) -> Result<Vec<StudentReportRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, StudentReportRow>(
            "SELECT s.id, s.license_type, s.registration_date, s.status,
                    u.first_name, u.last_name, u.email, u.phone,
                    (SELECT COUNT(*) FROM enrollments e
                     WHERE e.student_id = s.id) AS enrollment_count,
                    (SELECT COUNT(*) FROM lessons l
                     JOIN enrollments e2 ON l.enrollment_id = e2.id
                     WHERE e2.student_id = s.id) AS lesson_count,
                    (SELECT COUNT(*) FROM exams ex
                     WHERE ex.student_id = s.id AND ex.result = 'pass') AS exams_passed,
                    (SELECT COUNT(*) FROM exams ex
                     WHERE ex.student_id = s.id AND ex.result = 'fail') AS exams_failed
             FROM students s
             JOIN users u ON s.user_id = u.id
             ORDER BY u.last_name, u.first_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-instructor workload summary with teaching time in minutes and
    /// derived hours.
    pub async fn instructor_report(&self) -> Result<Vec<InstructorReportRow>, DatabaseError> {
        let mut rows = sqlx::query_as::<_, InstructorReportRow>(
            "SELECT i.id, i.license_number, i.hire_date, i.status,
                    u.first_name, u.last_name, u.email, u.phone,
                    COUNT(DISTINCT l.id) AS lesson_count,
                    COALESCE(SUM(l.duration), 0) AS total_teaching_minutes,
                    COUNT(DISTINCT e.student_id) AS student_count
             FROM instructors i
             JOIN users u ON i.user_id = u.id
             LEFT JOIN lessons l ON i.id = l.instructor_id
             LEFT JOIN enrollments e ON l.enrollment_id = e.id
             GROUP BY i.id, i.license_number, i.hire_date, i.status,
                      u.first_name, u.last_name, u.email, u.phone
             ORDER BY u.last_name, u.first_name",
        )
        .fetch_all(&self.pool)
        .await?;

        for row in &mut rows {
            row.total_teaching_hours = minutes_to_hours(row.total_teaching_minutes);
        }

        Ok(rows)
    }

    /// Revenue aggregates, optionally narrowed to a year and month. With no
    /// year given the current year is used; the month filter applies only
    /// when present.
    pub async fn financial_report(
        &self,
        year: Option<i32>,
        month: Option<i32>,
    ) -> Result<FinancialReport, DatabaseError> {
        let year = year.unwrap_or_else(|| Utc::now().year());

        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(p.amount), 0) FROM payments p
             WHERE EXTRACT(YEAR FROM p.payment_date) = $1
             AND ($2::int IS NULL OR EXTRACT(MONTH FROM p.payment_date) = $2)",
        )
        .bind(year)
        .bind(month)
        .fetch_one(&self.pool)
        .await?;

        let monthly = sqlx::query_as::<_, MonthlyRevenue>(
            "SELECT EXTRACT(YEAR FROM p.payment_date)::int AS year,
                    EXTRACT(MONTH FROM p.payment_date)::int AS month,
                    SUM(p.amount) AS total
             FROM payments p
             WHERE EXTRACT(YEAR FROM p.payment_date) = $1
             AND ($2::int IS NULL OR EXTRACT(MONTH FROM p.payment_date) = $2)
             GROUP BY 1, 2
             ORDER BY 1, 2",
        )
        .bind(year)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        let by_course = sqlx::query_as::<_, CourseRevenue>(
            "SELECT c.id, c.name, c.license_type,
                    SUM(p.amount) AS total,
                    COUNT(DISTINCT e.id) AS enrollment_count,
                    SUM(p.amount) / COUNT(DISTINCT e.id) AS average_per_enrollment
             FROM payments p
             JOIN enrollments e ON p.enrollment_id = e.id
             JOIN courses c ON e.course_id = c.id
             WHERE EXTRACT(YEAR FROM p.payment_date) = $1
             AND ($2::int IS NULL OR EXTRACT(MONTH FROM p.payment_date) = $2)
             GROUP BY c.id, c.name, c.license_type
             ORDER BY total DESC",
        )
        .bind(year)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        let by_payment_method = sqlx::query_as::<_, PaymentMethodRevenue>(
            "SELECT p.payment_method, COUNT(*) AS count, SUM(p.amount) AS total
             FROM payments p
             WHERE EXTRACT(YEAR FROM p.payment_date) = $1
             AND ($2::int IS NULL OR EXTRACT(MONTH FROM p.payment_date) = $2)
             GROUP BY p.payment_method
             ORDER BY total DESC",
        )
        .bind(year)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        Ok(FinancialReport {
            total,
            monthly,
            by_course,
            by_payment_method,
        })
    }
}

/// Pass rate as a percentage. An empty group has a rate of zero rather than a
/// division error.
pub fn pass_rate(pass: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        pass as f64 / total as f64 * 100.0
    }
}

/// Fold (exam_type, result, count) rows into per-type pass/fail tallies.
pub fn build_exam_stats(rows: &[(String, String, i64)]) -> HashMap<String, ExamTypeStats> {
    let mut stats: HashMap<String, ExamTypeStats> = HashMap::new();

    for (exam_type, result, count) in rows {
        let entry = stats.entry(exam_type.clone()).or_default();
        match result.as_str() {
            "pass" => entry.pass += count,
            "fail" => entry.fail += count,
            _ => continue,
        }
        entry.total += count;
    }

    for entry in stats.values_mut() {
        entry.pass_rate = pass_rate(entry.pass, entry.total);
    }

    stats
}

/// Teaching minutes rounded to tenths of an hour.
pub fn minutes_to_hours(minutes: i64) -> f64 {
    (minutes as f64 / 60.0 * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_rate_of_seven_in_ten_is_seventy() {
        assert_eq!(pass_rate(7, 10), 70.0);
    }

    #[test]
    fn pass_rate_of_empty_group_is_zero() {
        assert_eq!(pass_rate(0, 0), 0.0);
    }

    #[test]
    fn exam_stats_tally_per_type() {
        let rows = vec![
            ("theory".to_string(), "pass".to_string(), 7),
            ("theory".to_string(), "fail".to_string(), 3),
            ("practical".to_string(), "fail".to_string(), 2),
        ];

        let stats = build_exam_stats(&rows);

        let theory = &stats["theory"];
        assert_eq!(theory.pass, 7);
        assert_eq!(theory.fail, 3);
        assert_eq!(theory.total, 10);
        assert_eq!(theory.pass_rate, 70.0);

        let practical = &stats["practical"];
        assert_eq!(practical.pass, 0);
        assert_eq!(practical.total, 2);
        assert_eq!(practical.pass_rate, 0.0);
    }

    #[test]
    fn exam_stats_of_no_rows_is_empty() {
        let stats = build_exam_stats(&[]);
        assert!(stats.is_empty());
    }

    #[test]
    fn exam_stats_ignore_unexpected_results() {
        let rows = vec![("theory".to_string(), "pending".to_string(), 4)];
        let stats = build_exam_stats(&rows);
        assert_eq!(stats["theory"], ExamTypeStats::default());
    }

    #[test]
    fn teaching_minutes_convert_to_tenth_hours() {
        assert_eq!(minutes_to_hours(0), 0.0);
        assert_eq!(minutes_to_hours(90), 1.5);
        assert_eq!(minutes_to_hours(100), 1.7);
    }
}

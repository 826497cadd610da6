use axum::extract::{Extension, Query, State};
use serde::Deserialize;

use crate::auth::Role;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::report_service::{FinancialReport, InstructorReportRow, StudentReportRow};
use crate::services::ReportService;
use crate::state::AppState;

/// GET /api/reports/students - admin-only per-student summary.
pub async fn students_report_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<StudentReportRow>> {
    user.authorize(&[Role::Admin])?;

    let rows = ReportService::new(state.pool.clone()).student_report().await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/reports/instructors - admin-only per-instructor summary.
pub async fn instructors_report_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<InstructorReportRow>> {
    user.authorize(&[Role::Admin])?;

    let rows = ReportService::new(state.pool.clone())
        .instructor_report()
        .await?;
    Ok(ApiResponse::success(rows))
}

#[derive(Debug, Deserialize)]
pub struct FinancialQuery {
    pub year: Option<i32>,
    pub month: Option<i32>,
}

/// GET /api/reports/financial - admin-only revenue aggregates, optionally
/// narrowed by year and month.
pub async fn financial_report_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<FinancialQuery>,
) -> ApiResult<FinancialReport> {
    user.authorize(&[Role::Admin])?;

    if let Some(month) = query.month {
        if !(1..=12).contains(&month) {
            return Err(ApiError::bad_request("Month must be between 1 and 12"));
        }
    }

    let report = ReportService::new(state.pool.clone())
        .financial_report(query.year, query.month)
        .await?;
    Ok(ApiResponse::success(report))
}

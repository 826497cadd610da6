use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::report_service::DashboardStats;
use crate::services::ReportService;
use crate::state::AppState;

/// GET /api/dashboard/stats - headline aggregates for any authenticated role.
pub async fn stats_get(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    let stats = ReportService::new(state.pool.clone())
        .dashboard_stats()
        .await?;

    Ok(ApiResponse::success(stats))
}

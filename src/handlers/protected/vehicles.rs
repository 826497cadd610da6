use axum::extract::State;

use crate::database::models::Vehicle;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/vehicles - the full fleet, any authenticated role.
pub async fn vehicles_get(State(state): State<AppState>) -> ApiResult<Vec<Vehicle>> {
    let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY vehicle_number")
        .fetch_all(&state.pool)
        .await?;

    Ok(ApiResponse::success(vehicles))
}

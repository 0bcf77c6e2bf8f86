//! JSON data for the dashboard charts.

use axum::{Json, extract::State};

use salesbook_core::reports::SalesReport;

use crate::db::ReportRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Sales by day (last ten days with sales), by customer and by product,
/// over the current user's customers.
pub async fn sales_report(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<SalesReport>, AppError> {
    let report = ReportRepository::new(state.pool())
        .sales_report(user.profile_id)
        .await?;
    Ok(Json(report))
}

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::report_controller::ReportController;
use crate::dto::report_dto::{
    BudgetRow, DashboardResponse, VehicleReportQuery, VehicleReportResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/vehicle", get(vehicle_report))
        .route("/budget", get(budget_report))
}

async fn dashboard(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    Ok(Json(controller.dashboard().await?))
}

async fn vehicle_report(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(query): Query<VehicleReportQuery>,
) -> Result<Json<VehicleReportResponse>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    Ok(Json(controller.vehicle_report(query).await?))
}

async fn budget_report(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<Vec<BudgetRow>>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    Ok(Json(controller.budget_report().await?))
}

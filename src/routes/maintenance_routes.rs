use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::maintenance_dto::{
    CompleteMaintenanceRequest, MaintenanceFilters, MaintenanceResponse,
    ScheduleMaintenanceRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(schedule_maintenance))
        .route("/", get(list_maintenance))
        .route("/:id/complete", post(complete_maintenance))
        .route("/:id/cancel", post(cancel_maintenance))
        .route("/:id", delete(delete_maintenance))
}

async fn schedule_maintenance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<ScheduleMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceResponse>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.schedule(&user, request).await?))
}

async fn list_maintenance(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<MaintenanceFilters>,
) -> Result<Json<Vec<MaintenanceResponse>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn complete_maintenance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceResponse>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.complete(&user, id, request).await?))
}

async fn cancel_maintenance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MaintenanceResponse>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.cancel(&user, id).await?))
}

async fn delete_maintenance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = MaintenanceController::new(state.pool.clone(), state.audit.clone());
    controller.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

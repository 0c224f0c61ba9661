use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::controllers::trip_controller::TripController;
use crate::dto::booking_dto::{
    AssignDriverRequest, BookingDetailResponse, BookingFilters, BookingResponse,
    CreateBookingRequest,
};
use crate::dto::trip_dto::{EndTripRequest, StartTripRequest, TripResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(list_bookings))
        .route("/:id", get(get_booking))
        .route("/:id", delete(delete_booking))
        .route("/:id/approve", post(approve_booking))
        .route("/:id/cancel", post(cancel_booking))
        .route("/:id/assign-driver", post(assign_driver))
        .route("/:id/trip/start", post(start_trip))
        .route("/:id/trip/end", post(end_trip))
}

async fn create_booking(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.create(&user, request).await?))
}

async fn list_bookings(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<BookingFilters>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn get_booking(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingDetailResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.get_detail(id).await?))
}

async fn delete_booking(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.audit.clone());
    controller.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn approve_booking(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.approve(&user, id).await?))
}

async fn cancel_booking(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.cancel(&user, id).await?))
}

async fn assign_driver(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignDriverRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.assign_driver(&user, id, request).await?))
}

async fn start_trip(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StartTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.start(&user, id, request).await?))
}

async fn end_trip(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<EndTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.end(&user, id, request).await?))
}

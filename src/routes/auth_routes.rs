use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{
    LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest, UserResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas públicas: registro y login
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Rutas de usuarios detrás del middleware de autenticación
pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/", get(list_users))
        .route("/:id", put(update_user))
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.register(request).await?))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.login(request).await?))
}

async fn me(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.me(&user).await?))
}

async fn list_users(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.list_users(&user).await?))
}

async fn update_user(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.audit.clone());
    Ok(Json(controller.update_user(&user, id, request).await?))
}

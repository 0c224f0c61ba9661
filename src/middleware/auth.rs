//! Middleware de autenticación JWT
//!
//! Extrae el token Bearer, lo valida y carga el usuario de la base de
//! datos antes de inyectarlo en las extensions de la request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::models::user::UserRole;
use crate::repositories::user_repository::UserRepository;
use crate::services::jwt_service::JwtService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Guard para transiciones que son solo de administrador
pub fn require_admin(user: &AuthenticatedUser) -> Result<(), AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Se requieren permisos de administrador".to_string(),
        ));
    }
    Ok(())
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    // Decodificar y validar JWT
    let claims = JwtService::new().validate_token(auth_header)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;

    // Verificar que el usuario existe en la base de datos
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized(
            "Usuario inactivo o suspendido".to_string(),
        ));
    }

    let authenticated_user = AuthenticatedUser {
        user_id: user.id,
        username: user.username.clone(),
        full_name: user.full_name.clone(),
        role: user.role(),
    };

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

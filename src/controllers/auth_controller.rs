//! Autenticación y gestión de usuarios
//!
//! Registro, login con bcrypt + JWT y administración de cuentas.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::{
    LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest, UserResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_admin, AuthenticatedUser};
use crate::models::audit::{AuditAction, AuditEntry};
use crate::models::user::UserRole;
use crate::repositories::user_repository::UserRepository;
use crate::services::audit_service::AuditSink;
use crate::services::jwt_service::JwtService;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_username;

pub struct AuthController {
    users: UserRepository,
    audit: Arc<dyn AuditSink>,
}

impl AuthController {
    pub fn new(pool: PgPool, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            users: UserRepository::new(pool),
            audit,
        }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        let username = request.username.trim().to_lowercase();
        let email = request.email.trim().to_lowercase();
        validate_username(&username)?;

        if self.users.username_exists(&username).await? {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if self.users.email_exists(&email, None).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Error generando hash: {}", e)))?;

        let user = self
            .users
            .create(
                username,
                email,
                password_hash,
                request.full_name.trim().to_string(),
                UserRole::Requester,
            )
            .await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(user.id),
                username: user.username.clone(),
                action: AuditAction::Create,
                entity_type: "User",
                entity_id: Some(user.id),
                details: None,
            })
            .await;

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "Account created! You can now log in".to_string(),
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let username = request.username.trim().to_lowercase();
        let user = self
            .users
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        let password_ok = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Error verificando hash: {}", e)))?;
        if !password_ok {
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        if !user.is_active {
            return Err(AppError::Unauthorized(
                "Your account has been deactivated. Contact an administrator".to_string(),
            ));
        }

        let token = JwtService::new().generate_access_token(&user)?;

        Ok(LoginResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    pub async fn me(&self, actor: &AuthenticatedUser) -> Result<UserResponse, AppError> {
        let user = self
            .users
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        Ok(UserResponse::from(user))
    }

    pub async fn list_users(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<UserResponse>, AppError> {
        require_admin(actor)?;

        let users = self.users.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn update_user(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        require_admin(actor)?;
        request.validate()?;

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        let role = match request.role.as_deref() {
            Some(raw) => Some(
                UserRole::parse(raw)
                    .ok_or_else(|| AppError::Validation("Invalid role selected".to_string()))?,
            ),
            None => None,
        };

        let email = match request.email {
            Some(raw) => {
                let normalized = raw.trim().to_lowercase();
                if self.users.email_exists(&normalized, Some(user.id)).await? {
                    return Err(AppError::Conflict(format!(
                        "Email '{}' is already used by another account",
                        normalized
                    )));
                }
                Some(normalized)
            }
            None => None,
        };

        // Un admin no puede dejarse fuera a sí mismo
        if user.id == actor.user_id {
            if request.is_active == Some(false) {
                return Err(AppError::Validation(
                    "You cannot deactivate your own account".to_string(),
                ));
            }
            if matches!(role, Some(r) if r != UserRole::Admin) {
                return Err(AppError::Validation(
                    "You cannot remove your own admin role".to_string(),
                ));
            }
        }

        let user = self
            .users
            .update(id, request.full_name, email, role, request.is_active)
            .await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Edit,
                entity_type: "User",
                entity_id: Some(user.id),
                details: None,
            })
            .await;

        let message = format!("User {} updated", user.username);
        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            message,
        ))
    }
}

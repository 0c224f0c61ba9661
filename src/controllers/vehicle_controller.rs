//! CRUD de vehículos
//!
//! El estado del vehículo no es editable por aquí: lo gobiernan los
//! ciclos de reservas, viajes y mantenimiento.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_admin, AuthenticatedUser};
use crate::models::audit::{AuditAction, AuditEntry};
use crate::models::vehicle::normalize_registration;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::audit_service::AuditSink;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_registration;

pub struct VehicleController {
    repository: VehicleRepository,
    audit: Arc<dyn AuditSink>,
}

impl VehicleController {
    pub fn new(pool: PgPool, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
            audit,
        }
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        require_admin(actor)?;
        request.validate()?;

        let registration = normalize_registration(&request.registration);
        validate_registration(&registration)?;

        if self
            .repository
            .registration_exists(&registration, None)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Registration number '{}' already exists",
                registration
            )));
        }

        let vehicle = self
            .repository
            .create(registration, request.make, request.model)
            .await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Create,
                entity_type: "Vehicle",
                entity_id: Some(vehicle.id),
                details: Some(vehicle.registration.clone()),
            })
            .await;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehicle registered successfully".to_string(),
        ))
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        require_admin(actor)?;
        request.validate()?;

        let registration = match request.registration {
            Some(raw) => {
                let normalized = normalize_registration(&raw);
                validate_registration(&normalized)?;
                if self
                    .repository
                    .registration_exists(&normalized, Some(id))
                    .await?
                {
                    return Err(AppError::Conflict(format!(
                        "Registration number '{}' is already used by another vehicle",
                        normalized
                    )));
                }
                Some(normalized)
            }
            None => None,
        };

        let vehicle = self
            .repository
            .update(id, registration, request.make, request.model)
            .await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Edit,
                entity_type: "Vehicle",
                entity_id: Some(vehicle.id),
                details: Some(vehicle.registration.clone()),
            })
            .await;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehicle updated".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn list(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.list().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }
}

//! Programación de mantenimiento
//!
//! Alta, cierre y cancelación de registros con sus efectos sobre el
//! estado del vehículo. El vehículo solo vuelve a available cuando
//! ningún otro reclamo (viaje abierto u otro mantenimiento programado)
//! lo retiene.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::maintenance_dto::{
    CompleteMaintenanceRequest, MaintenanceFilters, MaintenanceResponse,
    ScheduleMaintenanceRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_admin, AuthenticatedUser};
use crate::models::audit::{AuditAction, AuditEntry};
use crate::models::maintenance::{MaintenanceStatus, MaintenanceType};
use crate::models::vehicle::VehicleStatus;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::audit_service::AuditSink;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_non_negative;

pub struct MaintenanceController {
    pool: PgPool,
    records: MaintenanceRepository,
    audit: Arc<dyn AuditSink>,
}

impl MaintenanceController {
    pub fn new(pool: PgPool, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            records: MaintenanceRepository::new(pool.clone()),
            pool,
            audit,
        }
    }

    pub async fn schedule(
        &self,
        actor: &AuthenticatedUser,
        request: ScheduleMaintenanceRequest,
    ) -> Result<ApiResponse<MaintenanceResponse>, AppError> {
        require_admin(actor)?;
        request.validate()?;

        let maintenance_type = MaintenanceType::parse(&request.maintenance_type)
            .ok_or_else(|| AppError::Validation("Invalid maintenance type".to_string()))?;
        if let Some(cost) = request.cost {
            validate_non_negative("Cost", cost)?;
        }

        let mut tx = self.pool.begin().await?;

        let vehicle = VehicleRepository::find_for_update(&mut tx, request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if request.set_in_maintenance {
            if TripRepository::open_trip_for_vehicle(&mut tx, vehicle.id)
                .await?
                .is_some()
            {
                return Err(AppError::Conflict(format!(
                    "Vehicle {} has a trip in progress and cannot enter maintenance now",
                    vehicle.registration
                )));
            }
            VehicleRepository::set_status(&mut tx, vehicle.id, VehicleStatus::Maintenance)
                .await?;
        }

        let record = MaintenanceRepository::insert(
            &mut tx,
            vehicle.id,
            maintenance_type,
            request.description,
            request.scheduled_date,
            request.cost,
            actor.user_id,
        )
        .await?;

        tx.commit().await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Create,
                entity_type: "MaintenanceRecord",
                entity_id: Some(record.id),
                details: Some(format!("{} {}", vehicle.registration, record.maintenance_type)),
            })
            .await;

        Ok(ApiResponse::success_with_message(
            MaintenanceResponse::from(record),
            "Maintenance record created".to_string(),
        ))
    }

    pub async fn complete(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: CompleteMaintenanceRequest,
    ) -> Result<ApiResponse<MaintenanceResponse>, AppError> {
        require_admin(actor)?;
        if let Some(cost) = request.cost {
            validate_non_negative("Cost", cost)?;
        }

        let mut tx = self.pool.begin().await?;

        let record = MaintenanceRepository::find_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registro de mantenimiento no encontrado".to_string()))?;

        if record.status() != MaintenanceStatus::Scheduled {
            return Err(AppError::State(
                "Only scheduled maintenance can be completed".to_string(),
            ));
        }

        let record = MaintenanceRepository::set_completed(
            &mut tx,
            id,
            Utc::now().date_naive(),
            request.cost,
        )
        .await?;

        self.release_vehicle_if_unclaimed(&mut tx, record.vehicle_id, record.id)
            .await?;

        tx.commit().await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Complete,
                entity_type: "MaintenanceRecord",
                entity_id: Some(record.id),
                details: None,
            })
            .await;

        Ok(ApiResponse::success_with_message(
            MaintenanceResponse::from(record),
            "Maintenance marked as completed".to_string(),
        ))
    }

    pub async fn cancel(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<ApiResponse<MaintenanceResponse>, AppError> {
        require_admin(actor)?;

        let mut tx = self.pool.begin().await?;

        let record = MaintenanceRepository::find_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registro de mantenimiento no encontrado".to_string()))?;

        if record.status() != MaintenanceStatus::Scheduled {
            return Err(AppError::State(
                "Only scheduled maintenance can be cancelled".to_string(),
            ));
        }

        let record = MaintenanceRepository::set_cancelled(&mut tx, id).await?;

        self.release_vehicle_if_unclaimed(&mut tx, record.vehicle_id, record.id)
            .await?;

        tx.commit().await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Cancel,
                entity_type: "MaintenanceRecord",
                entity_id: Some(record.id),
                details: None,
            })
            .await;

        Ok(ApiResponse::success_with_message(
            MaintenanceResponse::from(record),
            "Maintenance record cancelled".to_string(),
        ))
    }

    /// Borrado incondicional, sin tocar el vehículo. Borrar un registro
    /// programado que aún retiene el vehículo es responsabilidad del admin.
    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        require_admin(actor)?;

        let deleted = self.records.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(
                "Registro de mantenimiento no encontrado".to_string(),
            ));
        }

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Delete,
                entity_type: "MaintenanceRecord",
                entity_id: Some(id),
                details: None,
            })
            .await;

        Ok(())
    }

    pub async fn list(
        &self,
        filters: MaintenanceFilters,
    ) -> Result<Vec<MaintenanceResponse>, AppError> {
        let status = match filters.status.as_deref() {
            Some(raw) => Some(
                MaintenanceStatus::parse(raw)
                    .ok_or_else(|| {
                        AppError::Validation(format!("Unknown maintenance status '{}'", raw))
                    })?
                    .as_str(),
            ),
            None => None,
        };

        let records = self.records.list(status).await?;
        Ok(records.into_iter().map(MaintenanceResponse::from).collect())
    }

    /// Devuelve el vehículo a available si este registro era el último
    /// reclamo sobre él
    async fn release_vehicle_if_unclaimed(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        vehicle_id: Uuid,
        record_id: Uuid,
    ) -> Result<(), AppError> {
        let vehicle = VehicleRepository::find_for_update(&mut *tx, vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.status() != VehicleStatus::Maintenance {
            return Ok(());
        }

        let open_trip = TripRepository::open_trip_for_vehicle(&mut *tx, vehicle_id)
            .await?
            .is_some();
        let other_scheduled =
            MaintenanceRepository::other_scheduled_exists(&mut *tx, vehicle_id, record_id).await?;

        if !open_trip && !other_scheduled {
            VehicleRepository::set_status(&mut *tx, vehicle_id, VehicleStatus::Available).await?;
        }

        Ok(())
    }
}

//! Registro de viajes
//!
//! Arranque y cierre del viaje de una reserva aprobada. El cierre aplica
//! las cuatro escrituras (viaje, distancia, reserva, vehículo) en una
//! sola transacción: nunca se observa una reserva completada con el
//! vehículo todavía en uso, ni al revés.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::trip_dto::{EndTripRequest, StartTripRequest, TripResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::audit::{AuditAction, AuditEntry};
use crate::models::booking::BookingStatus;
use crate::models::vehicle::VehicleStatus;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::audit_service::AuditSink;
use crate::utils::errors::AppError;

pub struct TripController {
    pool: PgPool,
    audit: Arc<dyn AuditSink>,
}

impl TripController {
    pub fn new(pool: PgPool, audit: Arc<dyn AuditSink>) -> Self {
        Self { pool, audit }
    }

    pub async fn start(
        &self,
        actor: &AuthenticatedUser,
        booking_id: Uuid,
        request: StartTripRequest,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        let booking = BookingRepository::find_for_update(&mut tx, booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        if booking.status() != BookingStatus::Approved {
            return Err(AppError::State(
                "Only approved bookings can start a trip".to_string(),
            ));
        }

        if TripRepository::find_by_booking_for_update(&mut tx, booking.id)
            .await?
            .is_some()
        {
            return Err(AppError::State(
                "A trip has already been started for this booking".to_string(),
            ));
        }

        let vehicle = VehicleRepository::find_for_update(&mut tx, booking.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.status() == VehicleStatus::Maintenance {
            return Err(AppError::State(format!(
                "Vehicle {} is held in maintenance; the trip cannot start",
                vehicle.registration
            )));
        }

        let trip =
            TripRepository::insert(&mut tx, booking.id, request.started_at, request.odometer_start)
                .await?;
        VehicleRepository::set_status(&mut tx, vehicle.id, VehicleStatus::InUse).await?;

        tx.commit().await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Start,
                entity_type: "Trip",
                entity_id: Some(trip.id),
                details: Some(format!("booking {}", booking.id)),
            })
            .await;

        Ok(ApiResponse::success_with_message(
            TripResponse::from(trip),
            "Trip started – vehicle marked as in use".to_string(),
        ))
    }

    pub async fn end(
        &self,
        actor: &AuthenticatedUser,
        booking_id: Uuid,
        request: EndTripRequest,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        let booking = BookingRepository::find_for_update(&mut tx, booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        let trip = TripRepository::find_by_booking_for_update(&mut tx, booking.id)
            .await?
            .ok_or_else(|| {
                AppError::State("No active trip found for this booking".to_string())
            })?;

        let distance = trip.validate_close(
            request.ended_at,
            request.odometer_end,
            request.fuel_used,
            request.fuel_cost,
        )?;

        VehicleRepository::find_for_update(&mut tx, booking.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let trip = TripRepository::close(
            &mut tx,
            trip.id,
            request.ended_at,
            request.odometer_end,
            distance,
            request.fuel_used,
            request.fuel_cost,
            request.remarks,
        )
        .await?;
        BookingRepository::set_status(&mut tx, booking.id, BookingStatus::Completed).await?;
        VehicleRepository::set_status(&mut tx, booking.vehicle_id, VehicleStatus::Available)
            .await?;

        tx.commit().await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Complete,
                entity_type: "Trip",
                entity_id: Some(trip.id),
                details: Some(format!("distance {} km", distance)),
            })
            .await;

        Ok(ApiResponse::success_with_message(
            TripResponse::from(trip),
            format!(
                "Trip ended – distance: {} km. Booking marked as completed",
                distance
            ),
        ))
    }
}

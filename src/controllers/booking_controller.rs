//! Ciclo de vida de reservas
//!
//! Pending → Approved → Completed, con ramas Cancelled. Cada mutación es
//! una transacción única: el lock de la fila del vehículo serializa el
//! chequeo de solapamiento con la escritura (check-then-act).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{
    AssignDriverRequest, BookingDetailResponse, BookingFilters, BookingResponse,
    CreateBookingRequest,
};
use crate::dto::trip_dto::TripResponse;
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_admin, AuthenticatedUser};
use crate::models::audit::{AuditAction, AuditEntry};
use crate::models::booking::{find_conflict, Booking, BookingStatus, NewBooking};
use crate::models::vehicle::VehicleStatus;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::audit_service::AuditSink;
use crate::utils::errors::AppError;

pub struct BookingController {
    pool: PgPool,
    bookings: BookingRepository,
    trips: TripRepository,
    users: UserRepository,
    audit: Arc<dyn AuditSink>,
}

impl BookingController {
    pub fn new(pool: PgPool, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            trips: TripRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            pool,
            audit,
        }
    }

    /// Ventana planificada: fin después del inicio y el inicio no puede
    /// quedar en el pasado
    fn validate_window(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if end <= start {
            return Err(AppError::Validation(
                "End date/time must be after start date/time".to_string(),
            ));
        }
        if start < now {
            return Err(AppError::Validation(
                "Start date/time cannot be in the past".to_string(),
            ));
        }
        Ok(())
    }

    fn conflict_error(conflict: &Booking) -> AppError {
        AppError::Conflict(format!(
            "This vehicle is already booked between {} and {} (booking {} by {})",
            conflict.start_planned.format("%Y-%m-%d %H:%M"),
            conflict.end_planned.format("%Y-%m-%d %H:%M"),
            conflict.id,
            conflict.requester_name
        ))
    }

    async fn ensure_driver(&self, driver_id: Uuid) -> Result<(), AppError> {
        let driver = self
            .users
            .find_by_id(driver_id)
            .await?
            .ok_or_else(|| AppError::Validation("Selected driver does not exist".to_string()))?;
        if !driver.is_driver() {
            return Err(AppError::Validation(
                "Selected user is not a driver".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateBookingRequest,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        request.validate()?;
        Self::validate_window(request.start_planned, request.end_planned, Utc::now())?;
        if let Some(driver_id) = request.driver_id {
            self.ensure_driver(driver_id).await?;
        }

        let mut tx = self.pool.begin().await?;

        let vehicle = VehicleRepository::find_for_update(&mut tx, request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.status() == VehicleStatus::Maintenance {
            return Err(AppError::Validation(format!(
                "Vehicle {} is currently under maintenance and cannot be booked",
                vehicle.registration
            )));
        }

        let active = BookingRepository::active_for_vehicle(&mut tx, vehicle.id, None).await?;
        if let Some(conflict) =
            find_conflict(&active, request.start_planned, request.end_planned)
        {
            return Err(Self::conflict_error(conflict));
        }

        let booking = BookingRepository::insert(
            &mut tx,
            NewBooking {
                vehicle_id: vehicle.id,
                requester_id: actor.user_id,
                requester_name: actor.full_name.clone(),
                driver_id: request.driver_id,
                start_planned: request.start_planned,
                end_planned: request.end_planned,
                route_from: request.route_from,
                route_to: request.route_to,
                purpose: request.purpose,
                activity_code: request.activity_code,
                project_code: request.project_code,
            },
        )
        .await?;

        tx.commit().await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Create,
                entity_type: "Booking",
                entity_id: Some(booking.id),
                details: Some(format!(
                    "{} {} -> {}",
                    vehicle.registration, booking.route_from, booking.route_to
                )),
            })
            .await;

        Ok(ApiResponse::success_with_message(
            BookingResponse::from(booking),
            "Booking request created (status: pending)".to_string(),
        ))
    }

    pub async fn approve(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        require_admin(actor)?;

        let mut tx = self.pool.begin().await?;

        let booking = BookingRepository::find_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        if booking.status() != BookingStatus::Pending {
            return Err(AppError::State(
                "Only pending bookings can be approved".to_string(),
            ));
        }

        // Lock del vehículo: el re-chequeo queda serializado frente a
        // creaciones y aprobaciones concurrentes
        VehicleRepository::find_for_update(&mut tx, booking.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let active =
            BookingRepository::active_for_vehicle(&mut tx, booking.vehicle_id, Some(booking.id))
                .await?;
        if let Some(conflict) =
            find_conflict(&active, booking.start_planned, booking.end_planned)
        {
            // La transacción cae: la reserva sigue pending
            return Err(Self::conflict_error(conflict));
        }

        let booking = BookingRepository::set_status(&mut tx, id, BookingStatus::Approved).await?;

        tx.commit().await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Approve,
                entity_type: "Booking",
                entity_id: Some(booking.id),
                details: None,
            })
            .await;

        Ok(ApiResponse::success_with_message(
            BookingResponse::from(booking),
            "Booking approved".to_string(),
        ))
    }

    pub async fn cancel(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        let mut tx = self.pool.begin().await?;

        let booking = BookingRepository::find_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        if !actor.is_admin() && booking.requester_id != actor.user_id {
            return Err(AppError::Forbidden(
                "Solo el solicitante o un administrador pueden cancelar la reserva".to_string(),
            ));
        }

        if !booking.status().can_cancel() {
            return Err(AppError::State(
                "This booking cannot be cancelled".to_string(),
            ));
        }

        // La cancelación no toca el estado del vehículo: eso lo gobiernan
        // viajes y mantenimiento
        let booking = BookingRepository::set_status(&mut tx, id, BookingStatus::Cancelled).await?;

        tx.commit().await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Cancel,
                entity_type: "Booking",
                entity_id: Some(booking.id),
                details: None,
            })
            .await;

        Ok(ApiResponse::success_with_message(
            BookingResponse::from(booking),
            "Booking cancelled".to_string(),
        ))
    }

    pub async fn assign_driver(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: AssignDriverRequest,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        require_admin(actor)?;

        if let Some(driver_id) = request.driver_id {
            self.ensure_driver(driver_id).await?;
        }

        let mut tx = self.pool.begin().await?;

        let booking = BookingRepository::find_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        if !booking.status().is_active() {
            return Err(AppError::State(
                "Driver can only be assigned while the booking is pending or approved".to_string(),
            ));
        }

        let booking = BookingRepository::set_driver(&mut tx, id, request.driver_id).await?;

        tx.commit().await?;

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Assign,
                entity_type: "Booking",
                entity_id: Some(booking.id),
                details: booking.driver_id.map(|d| format!("driver {}", d)),
            })
            .await;

        let message = if booking.driver_id.is_some() {
            "Driver assigned".to_string()
        } else {
            "Driver removed from booking".to_string()
        };

        Ok(ApiResponse::success_with_message(
            BookingResponse::from(booking),
            message,
        ))
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        require_admin(actor)?;

        let deleted = self.bookings.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Reserva no encontrada".to_string()));
        }

        self.audit
            .record(AuditEntry {
                user_id: Some(actor.user_id),
                username: actor.username.clone(),
                action: AuditAction::Delete,
                entity_type: "Booking",
                entity_id: Some(id),
                details: None,
            })
            .await;

        Ok(())
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<BookingDetailResponse, AppError> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        let trip = self.trips.find_by_booking(booking.id).await?;

        Ok(BookingDetailResponse {
            booking: BookingResponse::from(booking),
            trip: trip.map(TripResponse::from),
        })
    }

    pub async fn list(&self, filters: BookingFilters) -> Result<Vec<BookingResponse>, AppError> {
        let status = match filters.status.as_deref() {
            Some(raw) => Some(
                BookingStatus::parse(raw)
                    .ok_or_else(|| {
                        AppError::Validation(format!("Unknown booking status '{}'", raw))
                    })?
                    .as_str(),
            ),
            None => None,
        };

        let bookings = self.bookings.list(status).await?;
        Ok(bookings.into_iter().map(BookingResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_window_end_must_be_after_start() {
        let now = ts(6);
        assert!(BookingController::validate_window(ts(10), ts(8), now).is_err());
        assert!(BookingController::validate_window(ts(10), ts(10), now).is_err());
        assert!(BookingController::validate_window(ts(10), ts(12), now).is_ok());
    }

    #[test]
    fn test_window_start_in_the_past_is_rejected() {
        let now = ts(9);
        let err = BookingController::validate_window(ts(8), ts(10), now).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "Start date/time cannot be in the past")
            }
            _ => panic!("expected validation error"),
        }
        // Arrancar exactamente ahora es válido
        assert!(BookingController::validate_window(ts(9), ts(10), now).is_ok());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::trip_dto::TripResponse;
use crate::models::booking::Booking;

/// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub vehicle_id: Uuid,

    pub driver_id: Option<Uuid>,

    pub start_planned: DateTime<Utc>,

    pub end_planned: DateTime<Utc>,

    #[validate(length(min = 1, max = 200))]
    pub route_from: String,

    #[validate(length(min = 1, max = 200))]
    pub route_to: String,

    #[validate(length(min = 1))]
    pub purpose: String,

    #[validate(length(max = 50))]
    pub activity_code: Option<String>,

    #[validate(length(max = 50))]
    pub project_code: Option<String>,
}

/// Request para asignar o quitar un conductor
#[derive(Debug, Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Option<Uuid>,
}

/// Filtros para listado de reservas
#[derive(Debug, Deserialize)]
pub struct BookingFilters {
    pub status: Option<String>,
}

/// Response de reserva para la API
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub requester_id: Uuid,
    pub requester_name: String,
    pub driver_id: Option<Uuid>,
    pub start_planned: DateTime<Utc>,
    pub end_planned: DateTime<Utc>,
    pub route_from: String,
    pub route_to: String,
    pub purpose: String,
    pub activity_code: Option<String>,
    pub project_code: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            vehicle_id: booking.vehicle_id,
            requester_id: booking.requester_id,
            requester_name: booking.requester_name,
            driver_id: booking.driver_id,
            start_planned: booking.start_planned,
            end_planned: booking.end_planned,
            route_from: booking.route_from,
            route_to: booking.route_to,
            purpose: booking.purpose,
            activity_code: booking.activity_code,
            project_code: booking.project_code,
            status: booking.status,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// Detalle de reserva: incluye el viaje si ya arrancó.
/// El sub-estado "viaje iniciado" se deriva de la presencia del trip.
#[derive(Debug, Serialize)]
pub struct BookingDetailResponse {
    #[serde(flatten)]
    pub booking: BookingResponse,
    pub trip: Option<TripResponse>,
}

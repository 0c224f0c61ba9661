use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::trip::Trip;

/// Request para registrar el arranque real de un viaje
#[derive(Debug, Deserialize, Validate)]
pub struct StartTripRequest {
    pub started_at: DateTime<Utc>,

    #[validate(range(min = 0))]
    pub odometer_start: i32,
}

/// Request para cerrar un viaje
#[derive(Debug, Deserialize, Validate)]
pub struct EndTripRequest {
    pub ended_at: DateTime<Utc>,

    pub odometer_end: i32,

    pub fuel_used: Option<Decimal>,

    pub fuel_cost: Option<Decimal>,

    #[validate(length(max = 1000))]
    pub remarks: Option<String>,
}

/// Response de viaje para la API
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub odometer_start: i32,
    pub odometer_end: Option<i32>,
    pub distance: Option<i32>,
    pub fuel_used: Option<Decimal>,
    pub fuel_cost: Option<Decimal>,
    pub remarks: Option<String>,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            booking_id: trip.booking_id,
            started_at: trip.started_at,
            ended_at: trip.ended_at,
            odometer_start: trip.odometer_start,
            odometer_end: trip.odometer_end,
            distance: trip.distance,
            fuel_used: trip.fuel_used,
            fuel_cost: trip.fuel_cost,
            remarks: trip.remarks,
        }
    }
}

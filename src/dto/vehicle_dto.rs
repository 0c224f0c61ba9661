use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::Vehicle;

/// Request para registrar un nuevo vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 30))]
    pub registration: String,

    #[validate(length(min = 1, max = 50))]
    pub make: String,

    #[validate(length(min = 1, max = 50))]
    pub model: String,
}

/// Request para actualizar un vehículo existente.
/// El estado no es editable por esta vía: lo gobiernan reservas,
/// viajes y mantenimiento.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 30))]
    pub registration: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub model: Option<String>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub registration: String,
    pub make: String,
    pub model: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            registration: vehicle.registration,
            make: vehicle.make,
            model: vehicle.model,
            status: vehicle.status,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}

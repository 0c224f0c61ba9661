//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su enum de estado.
//! El estado lo mutan exclusivamente los ciclos de vida de reservas,
//! viajes y mantenimiento.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estado del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    InUse,
    Maintenance,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::InUse => "in_use",
            VehicleStatus::Maintenance => "maintenance",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(VehicleStatus::Available),
            "in_use" => Some(VehicleStatus::InUse),
            "maintenance" => Some(VehicleStatus::Maintenance),
            _ => None,
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: uuid::Uuid,
    pub registration: String,
    pub make: String,
    pub model: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn status(&self) -> VehicleStatus {
        VehicleStatus::parse(&self.status).unwrap_or(VehicleStatus::Available)
    }
}

/// Normalizar una matrícula: sin espacios alrededor y en mayúsculas
pub fn normalize_registration(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            VehicleStatus::Available,
            VehicleStatus::InUse,
            VehicleStatus::Maintenance,
        ] {
            assert_eq!(VehicleStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(VehicleStatus::parse("retired"), None);
    }

    #[test]
    fn test_normalize_registration() {
        assert_eq!(normalize_registration("  ab-123-cd "), "AB-123-CD");
        assert_eq!(normalize_registration("XY 99 Z"), "XY 99 Z");
    }
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::maintenance::MaintenanceRecord;

/// Request para programar un mantenimiento
#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleMaintenanceRequest {
    pub vehicle_id: Uuid,

    #[validate(length(min = 1, max = 50))]
    pub maintenance_type: String,

    #[validate(length(min = 1))]
    pub description: String,

    pub scheduled_date: NaiveDate,

    pub cost: Option<Decimal>,

    /// Pasar el vehículo a mantenimiento en el mismo commit
    #[serde(default)]
    pub set_in_maintenance: bool,
}

/// Request para completar un mantenimiento
#[derive(Debug, Deserialize)]
pub struct CompleteMaintenanceRequest {
    pub cost: Option<Decimal>,
}

/// Filtros para listado de mantenimientos
#[derive(Debug, Deserialize)]
pub struct MaintenanceFilters {
    pub status: Option<String>,
}

/// Response de mantenimiento para la API
#[derive(Debug, Serialize)]
pub struct MaintenanceResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub maintenance_type: String,
    pub description: String,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub cost: Option<Decimal>,
    pub status: String,
    pub created_by: Option<Uuid>,
}

impl From<MaintenanceRecord> for MaintenanceResponse {
    fn from(record: MaintenanceRecord) -> Self {
        Self {
            id: record.id,
            vehicle_id: record.vehicle_id,
            maintenance_type: record.maintenance_type,
            description: record.description,
            scheduled_date: record.scheduled_date,
            completed_date: record.completed_date,
            cost: record.cost,
            status: record.status,
            created_by: record.created_by,
        }
    }
}

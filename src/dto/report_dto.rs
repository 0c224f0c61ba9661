use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::dto::booking_dto::BookingResponse;
use crate::dto::vehicle_dto::VehicleResponse;

/// Query del reporte de viajes por vehículo
#[derive(Debug, Deserialize)]
pub struct VehicleReportQuery {
    pub vehicle_id: Uuid,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

/// Fila del reporte de viajes (viajes cerrados dentro del rango)
#[derive(Debug, Serialize, FromRow)]
pub struct TripReportRow {
    pub trip_id: Uuid,
    pub booking_id: Uuid,
    pub requester_name: String,
    pub driver_name: Option<String>,
    pub route_from: String,
    pub route_to: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub distance: Option<i32>,
    pub fuel_used: Option<Decimal>,
    pub fuel_cost: Option<Decimal>,
}

/// Reporte de viajes de un vehículo con totales
#[derive(Debug, Serialize)]
pub struct VehicleReportResponse {
    pub vehicle: VehicleResponse,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub trips: Vec<TripReportRow>,
    pub total_distance: i64,
    pub total_fuel_cost: Decimal,
}

/// Fila del reporte de presupuesto por código de proyecto
#[derive(Debug, Serialize, FromRow)]
pub struct BudgetRow {
    pub project_code: Option<String>,
    pub trip_count: i64,
    pub total_distance: Option<i64>,
    pub total_fuel_used: Option<Decimal>,
    pub total_fuel_cost: Option<Decimal>,
}

/// Resumen del dashboard
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub vehicle_count: i64,
    pub pending_bookings: i64,
    pub scheduled_maintenance: i64,
    pub upcoming: Vec<BookingResponse>,
}

//! Reportes en JSON
//!
//! Dashboard, reporte de viajes por vehículo y presupuesto por código de
//! proyecto. Solo datos agregados; el render es problema de otro.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::booking_dto::BookingResponse;
use crate::dto::report_dto::{BudgetRow, DashboardResponse, VehicleReportQuery, VehicleReportResponse};
use crate::dto::vehicle_dto::VehicleResponse;
use crate::models::booking::BookingStatus;
use crate::models::maintenance::MaintenanceStatus;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_date_range;

pub struct ReportController {
    vehicles: VehicleRepository,
    bookings: BookingRepository,
    trips: TripRepository,
    maintenance: MaintenanceRepository,
}

impl ReportController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            trips: TripRepository::new(pool.clone()),
            maintenance: MaintenanceRepository::new(pool),
        }
    }

    pub async fn dashboard(&self) -> Result<DashboardResponse, AppError> {
        let vehicle_count = self.vehicles.count().await?;
        let pending_bookings = self.bookings.count_by_status(BookingStatus::Pending).await?;
        let scheduled_maintenance = self
            .maintenance
            .count_by_status(MaintenanceStatus::Scheduled)
            .await?;
        let upcoming = self
            .bookings
            .upcoming_approved()
            .await?
            .into_iter()
            .map(BookingResponse::from)
            .collect();

        Ok(DashboardResponse {
            vehicle_count,
            pending_bookings,
            scheduled_maintenance,
            upcoming,
        })
    }

    pub async fn vehicle_report(
        &self,
        query: VehicleReportQuery,
    ) -> Result<VehicleReportResponse, AppError> {
        validate_date_range(query.date_from, query.date_to)?;

        let vehicle = self
            .vehicles
            .find_by_id(query.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let from = day_start(query.date_from);
        let to = day_end(query.date_to);

        let trips = self.trips.report_for_vehicle(vehicle.id, from, to).await?;

        let total_distance: i64 = trips.iter().filter_map(|t| t.distance).map(i64::from).sum();
        let total_fuel_cost: Decimal = trips.iter().filter_map(|t| t.fuel_cost).sum();

        Ok(VehicleReportResponse {
            vehicle: VehicleResponse::from(vehicle),
            date_from: query.date_from,
            date_to: query.date_to,
            trips,
            total_distance,
            total_fuel_cost,
        })
    }

    pub async fn budget_report(&self) -> Result<Vec<BudgetRow>, AppError> {
        self.trips.budget_by_project().await
    }
}

fn day_start(date: NaiveDate) -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("valid time"))
}

fn day_end(date: NaiveDate) -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(23, 59, 59).expect("valid time"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds_cover_the_whole_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let start = day_start(date);
        let end = day_end(date);
        assert!(start < end);
        assert_eq!(start.date_naive(), date);
        assert_eq!(end.date_naive(), date);
    }
}

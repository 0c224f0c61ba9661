use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::report_dto::{BudgetRow, TripReportRow};
use crate::models::trip::Trip;
use crate::utils::errors::AppError;

pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_booking(&self, booking_id: Uuid) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trip)
    }

    /// Bloquear y leer el viaje de una reserva dentro de una transacción
    pub async fn find_by_booking_for_update(
        conn: &mut PgConnection,
        booking_id: Uuid,
    ) -> Result<Option<Trip>, AppError> {
        let trip =
            sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE booking_id = $1 FOR UPDATE")
                .bind(booking_id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(trip)
    }

    /// Viaje abierto (sin cerrar) de cualquier reserva del vehículo
    pub async fn open_trip_for_vehicle(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
    ) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            SELECT t.* FROM trips t
            JOIN bookings b ON b.id = t.booking_id
            WHERE b.vehicle_id = $1 AND t.ended_at IS NULL
            "#,
        )
        .bind(vehicle_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(trip)
    }

    pub async fn insert(
        conn: &mut PgConnection,
        booking_id: Uuid,
        started_at: DateTime<Utc>,
        odometer_start: i32,
    ) -> Result<Trip, AppError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (id, booking_id, started_at, odometer_start)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(started_at)
        .bind(odometer_start)
        .fetch_one(&mut *conn)
        .await?;

        Ok(trip)
    }

    pub async fn close(
        conn: &mut PgConnection,
        id: Uuid,
        ended_at: DateTime<Utc>,
        odometer_end: i32,
        distance: i32,
        fuel_used: Option<Decimal>,
        fuel_cost: Option<Decimal>,
        remarks: Option<String>,
    ) -> Result<Trip, AppError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET ended_at = $2, odometer_end = $3, distance = $4,
                fuel_used = $5, fuel_cost = $6, remarks = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(ended_at)
        .bind(odometer_end)
        .bind(distance)
        .bind(fuel_used)
        .bind(fuel_cost)
        .bind(remarks)
        .fetch_one(&mut *conn)
        .await?;

        Ok(trip)
    }

    /// Viajes cerrados de un vehículo dentro de un rango, con datos de la
    /// reserva para el reporte
    pub async fn report_for_vehicle(
        &self,
        vehicle_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TripReportRow>, AppError> {
        let rows = sqlx::query_as::<_, TripReportRow>(
            r#"
            SELECT t.id AS trip_id, t.booking_id, b.requester_name,
                   u.full_name AS driver_name, b.route_from, b.route_to,
                   t.started_at, t.ended_at, t.distance, t.fuel_used, t.fuel_cost
            FROM trips t
            JOIN bookings b ON b.id = t.booking_id
            LEFT JOIN users u ON u.id = b.driver_id
            WHERE b.vehicle_id = $1
            AND t.started_at >= $2
            AND t.started_at <= $3
            AND t.ended_at IS NOT NULL
            ORDER BY t.started_at
            "#,
        )
        .bind(vehicle_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Resumen de combustible y distancia por código de proyecto
    pub async fn budget_by_project(&self) -> Result<Vec<BudgetRow>, AppError> {
        let rows = sqlx::query_as::<_, BudgetRow>(
            r#"
            SELECT b.project_code,
                   COUNT(t.id) AS trip_count,
                   SUM(t.distance)::BIGINT AS total_distance,
                   SUM(t.fuel_used) AS total_fuel_used,
                   SUM(t.fuel_cost) AS total_fuel_cost
            FROM trips t
            JOIN bookings b ON b.id = t.booking_id
            WHERE t.ended_at IS NOT NULL
            GROUP BY b.project_code
            ORDER BY b.project_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

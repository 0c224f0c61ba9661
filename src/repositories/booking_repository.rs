use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus, NewBooking};
use crate::utils::errors::AppError;

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<Booking>, AppError> {
        let bookings = match status {
            Some(status) => {
                sqlx::query_as::<_, Booking>(
                    "SELECT * FROM bookings WHERE status = $1 ORDER BY start_planned DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY start_planned DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(bookings)
    }

    pub async fn count_by_status(&self, status: BookingStatus) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn upcoming_approved(&self) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE status = 'approved' ORDER BY start_planned",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        // El trip asociado cae en cascada por la FK
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Bloquear y leer una reserva dentro de una transacción
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Booking>, AppError> {
        let booking =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(booking)
    }

    /// Reservas activas (pending | approved) de un vehículo, opcionalmente
    /// excluyendo una reserva (re-chequeo de aprobación). El solapamiento
    /// se evalúa en `models::booking::find_conflict`.
    pub async fn active_for_vehicle(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE vehicle_id = $1
            AND status IN ('pending', 'approved')
            AND ($2::uuid IS NULL OR id <> $2)
            ORDER BY start_planned
            "#,
        )
        .bind(vehicle_id)
        .bind(exclude_booking_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(bookings)
    }

    pub async fn insert(
        conn: &mut PgConnection,
        new_booking: NewBooking,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, vehicle_id, requester_id, requester_name, driver_id,
                start_planned, end_planned, route_from, route_to, purpose,
                activity_code, project_code, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'pending', NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_booking.vehicle_id)
        .bind(new_booking.requester_id)
        .bind(new_booking.requester_name)
        .bind(new_booking.driver_id)
        .bind(new_booking.start_planned)
        .bind(new_booking.end_planned)
        .bind(new_booking.route_from)
        .bind(new_booking.route_to)
        .bind(new_booking.purpose)
        .bind(new_booking.activity_code)
        .bind(new_booking.project_code)
        .fetch_one(&mut *conn)
        .await?;

        Ok(booking)
    }

    pub async fn set_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        Ok(booking)
    }

    pub async fn set_driver(
        conn: &mut PgConnection,
        id: Uuid,
        driver_id: Option<Uuid>,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET driver_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(driver_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        Ok(booking)
    }
}

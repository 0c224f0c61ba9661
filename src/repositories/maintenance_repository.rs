use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::maintenance::{MaintenanceRecord, MaintenanceStatus, MaintenanceType};
use crate::utils::errors::AppError;

pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MaintenanceRecord>, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            "SELECT * FROM maintenance_records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<MaintenanceRecord>, AppError> {
        let records = match status {
            Some(status) => {
                sqlx::query_as::<_, MaintenanceRecord>(
                    "SELECT * FROM maintenance_records WHERE status = $1 ORDER BY scheduled_date DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MaintenanceRecord>(
                    "SELECT * FROM maintenance_records ORDER BY scheduled_date DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(records)
    }

    pub async fn count_by_status(&self, status: MaintenanceStatus) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM maintenance_records WHERE status = $1")
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM maintenance_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Bloquear y leer un registro dentro de una transacción
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<MaintenanceRecord>, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            "SELECT * FROM maintenance_records WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// ¿Queda otro mantenimiento programado reclamando el vehículo?
    pub async fn other_scheduled_exists(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        exclude_record_id: Uuid,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM maintenance_records
                WHERE vehicle_id = $1 AND status = 'scheduled' AND id <> $2
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(exclude_record_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(exists)
    }

    pub async fn insert(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        maintenance_type: MaintenanceType,
        description: String,
        scheduled_date: NaiveDate,
        cost: Option<Decimal>,
        created_by: Uuid,
    ) -> Result<MaintenanceRecord, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            INSERT INTO maintenance_records (
                id, vehicle_id, maintenance_type, description, scheduled_date,
                cost, status, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'scheduled', $7, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(maintenance_type.as_str())
        .bind(description)
        .bind(scheduled_date)
        .bind(cost)
        .bind(created_by)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    pub async fn set_completed(
        conn: &mut PgConnection,
        id: Uuid,
        completed_date: NaiveDate,
        cost: Option<Decimal>,
    ) -> Result<MaintenanceRecord, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            UPDATE maintenance_records
            SET status = 'completed', completed_date = $2, cost = COALESCE($3, cost)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(completed_date)
        .bind(cost)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    pub async fn set_cancelled(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<MaintenanceRecord, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            "UPDATE maintenance_records SET status = 'cancelled' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }
}

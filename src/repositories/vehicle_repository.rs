use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        registration: String,
        make: String,
        model: String,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, registration, make, model, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 'available', NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(registration)
        .bind(make)
        .bind(model)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY registration")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn registration_exists(
        &self,
        registration: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM vehicles
                WHERE registration = $1
                AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(registration)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn update(
        &self,
        id: Uuid,
        registration: Option<String>,
        make: Option<String>,
        model: Option<String>,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET registration = COALESCE($2, registration),
                make = COALESCE($3, make),
                model = COALESCE($4, model),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(registration)
        .bind(make)
        .bind(model)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        Ok(vehicle)
    }

    /// Bloquear y leer el vehículo dentro de una transacción. El lock de la
    /// fila serializa el chequeo de conflictos con las demás escrituras
    /// sobre el mismo vehículo.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Vehicle>, AppError> {
        let vehicle =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(vehicle)
    }

    /// Única vía de escritura del estado del vehículo. Los chequeos de
    /// reclamos contradictorios viven en los callers, dentro de la misma
    /// transacción.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: VehicleStatus,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE vehicles SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}

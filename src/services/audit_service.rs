//! Sink de auditoría
//!
//! Recibe una entrada por transición de estado y la escribe en background.
//! Un fallo al escribir se loguea y nunca bloquea la transición.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::models::audit::AuditEntry;

/// Destino de los registros de auditoría
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry);
}

/// Implementación sobre la tabla audit_logs
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    async fn record(&self, entry: AuditEntry) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let result = sqlx::query(
                r#"
                INSERT INTO audit_logs (id, user_id, username, action, entity_type, entity_id, details, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(entry.user_id)
            .bind(&entry.username)
            .bind(entry.action.as_str())
            .bind(entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.details)
            .execute(&pool)
            .await;

            if let Err(e) = result {
                warn!(
                    "No se pudo escribir auditoría {} {}: {}",
                    entry.action.as_str(),
                    entry.entity_type,
                    e
                );
            }
        });
    }
}

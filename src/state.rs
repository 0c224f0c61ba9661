//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::audit_service::AuditSink;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub audit: Arc<dyn AuditSink>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            pool,
            config,
            audit,
        }
    }
}

//! Configuración de la base de datos

use std::env;

/// Configuración del pool de PostgreSQL
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set in environment variables"),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("DATABASE_MAX_CONNECTIONS must be a valid number"),
            acquire_timeout_secs: env::var("DATABASE_ACQUIRE_TIMEOUT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("DATABASE_ACQUIRE_TIMEOUT must be a valid number"),
        }
    }
}

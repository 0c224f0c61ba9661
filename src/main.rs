mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{middleware as axum_middleware, response::Json, routing::get, Router};
use bcrypt::{hash, DEFAULT_COST};
use dotenvy::dotenv;
use serde_json::json;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::auth::auth_middleware;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use models::user::UserRole;
use repositories::user_repository::UserRepository;
use services::audit_service::PgAuditSink;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Vehicle Booking & Movement Tracker");
    info!("=====================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // Migraciones embebidas
    sqlx::migrate!().run(&pool).await?;
    info!("✅ Migraciones aplicadas");

    // Admin por defecto en el primer arranque
    seed_default_admin(&pool).await?;

    let config = EnvironmentConfig::default();
    let audit = Arc::new(PgAuditSink::new(pool.clone()));
    let app_state = AppState::new(pool, config.clone(), audit);

    // Rutas públicas
    let public_routes = Router::new()
        .route("/health", get(health))
        .nest("/api/auth", routes::auth_routes::create_auth_router());

    // Rutas protegidas por JWT
    let protected_routes = Router::new()
        .nest("/api/users", routes::auth_routes::create_user_router())
        .nest("/api/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/bookings", routes::booking_routes::create_booking_router())
        .nest(
            "/api/maintenance",
            routes::maintenance_routes::create_maintenance_router(),
        )
        .nest("/api/reports", routes::report_routes::create_report_router())
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    let app = public_routes
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = config.server_addr().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Auth:");
    info!("   POST /api/auth/register - Registrar usuario");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/users/me - Usuario actual");
    info!("   GET  /api/users - Listar usuarios (admin)");
    info!("   PUT  /api/users/:id - Editar usuario (admin)");
    info!("🚗 Vehicles:");
    info!("   POST /api/vehicles - Registrar vehículo (admin)");
    info!("   GET  /api/vehicles - Listar vehículos");
    info!("   GET  /api/vehicles/:id - Obtener vehículo");
    info!("   PUT  /api/vehicles/:id - Actualizar vehículo (admin)");
    info!("📅 Bookings:");
    info!("   POST /api/bookings - Crear reserva");
    info!("   GET  /api/bookings - Listar reservas");
    info!("   GET  /api/bookings/:id - Detalle con viaje");
    info!("   POST /api/bookings/:id/approve - Aprobar (admin)");
    info!("   POST /api/bookings/:id/cancel - Cancelar");
    info!("   POST /api/bookings/:id/assign-driver - Asignar conductor (admin)");
    info!("   POST /api/bookings/:id/trip/start - Arrancar viaje");
    info!("   POST /api/bookings/:id/trip/end - Cerrar viaje");
    info!("   DELETE /api/bookings/:id - Eliminar reserva (admin)");
    info!("🔧 Maintenance:");
    info!("   POST /api/maintenance - Programar mantenimiento (admin)");
    info!("   GET  /api/maintenance - Listar registros");
    info!("   POST /api/maintenance/:id/complete - Completar (admin)");
    info!("   POST /api/maintenance/:id/cancel - Cancelar (admin)");
    info!("   DELETE /api/maintenance/:id - Eliminar (admin)");
    info!("📊 Reports:");
    info!("   GET  /api/reports/dashboard - Resumen");
    info!("   GET  /api/reports/vehicle - Viajes por vehículo");
    info!("   GET  /api/reports/budget - Presupuesto por proyecto");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "service": "vehicle-tracker",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Crear el usuario admin por defecto si no existe ninguno
async fn seed_default_admin(pool: &sqlx::PgPool) -> Result<()> {
    let users = UserRepository::new(pool.clone());
    if users.find_by_username("admin").await?.is_none() {
        let password_hash = hash("admin123", DEFAULT_COST)?;
        users
            .create(
                "admin".to_string(),
                "admin@tracker.local".to_string(),
                password_hash,
                "System Admin".to_string(),
                UserRole::Admin,
            )
            .await?;
        info!("👤 Usuario admin por defecto creado (admin / admin123)");
    }
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}

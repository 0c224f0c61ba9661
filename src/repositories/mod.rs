//! Acceso a datos
//!
//! Repositorios sqlx sobre PostgreSQL. Las operaciones que participan en
//! transacciones toman `&mut PgConnection` para componerse dentro del
//! mismo commit; las lecturas sueltas usan el pool.

pub mod booking_repository;
pub mod maintenance_repository;
pub mod trip_repository;
pub mod user_repository;
pub mod vehicle_repository;

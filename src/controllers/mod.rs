//! Controllers
//!
//! Orquestación de cada operación: validación, transacción y efectos
//! sobre las entidades. Los handlers de `routes/` son envoltorios finos
//! sobre estos tipos.

pub mod auth_controller;
pub mod booking_controller;
pub mod maintenance_controller;
pub mod report_controller;
pub mod trip_controller;
pub mod vehicle_controller;

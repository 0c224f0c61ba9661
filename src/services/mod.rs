//! Servicios transversales
//!
//! JWT y el sink de auditoría. La lógica de dominio vive en los
//! controllers.

pub mod audit_service;
pub mod jwt_service;

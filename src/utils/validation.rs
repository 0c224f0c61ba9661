//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! que no caben en los derives de `validator`.

use crate::utils::errors::AppError;
use chrono::NaiveDate;

/// Validar formato de matrícula (ya normalizada a mayúsculas)
pub fn validate_registration(value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::Validation(
            "Registration number is required".to_string(),
        ));
    }
    if value.len() < 3 {
        return Err(AppError::Validation(
            "Registration number is too short".to_string(),
        ));
    }
    if value.len() > 20 {
        return Err(AppError::Validation(
            "Registration number is too long".to_string(),
        ));
    }
    Ok(())
}

/// Validar formato de nombre de usuario
pub fn validate_username(value: &str) -> Result<(), AppError> {
    if value.len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters".to_string(),
        ));
    }
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if !allowed {
        return Err(AppError::Validation(
            "Username may only contain letters, numbers, dots, and underscores".to_string(),
        ));
    }
    Ok(())
}

/// Validar que un valor numérico sea no negativo
pub fn validate_non_negative<T>(field: &str, value: T) -> Result<(), AppError>
where
    T: PartialOrd + num_traits::Zero + std::fmt::Display,
{
    if value < T::zero() {
        return Err(AppError::Validation(format!(
            "{} cannot be negative",
            field
        )));
    }
    Ok(())
}

/// Validar un rango de fechas de reporte
pub fn validate_date_range(from: NaiveDate, to: NaiveDate) -> Result<(), AppError> {
    if to < from {
        return Err(AppError::Validation(
            "End date must not be before start date".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration("AB-123-CD").is_ok());
        assert!(validate_registration("").is_err());
        assert!(validate_registration("AB").is_err());
        assert!(validate_registration(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("john.doe").is_ok());
        assert!(validate_username("user_01").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("nope!").is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("Odometer reading", 0).is_ok());
        assert!(validate_non_negative("Odometer reading", 120).is_ok());
        assert!(validate_non_negative("Odometer reading", -1).is_err());
        assert!(validate_non_negative("Fuel used", Decimal::new(35, 1)).is_ok());
        assert!(validate_non_negative("Fuel used", Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert!(validate_date_range(from, to).is_ok());
        assert!(validate_date_range(from, from).is_ok());
        assert!(validate_date_range(to, from).is_err());
    }
}

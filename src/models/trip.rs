//! Modelo de Trip
//!
//! Un viaje existe solo una vez que su reserva aprobada arranca; el
//! sub-estado "viaje iniciado" de la reserva se deriva de la existencia
//! del viaje, nunca de un flag duplicado.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::AppError;
use crate::utils::validation::validate_non_negative;

/// Trip principal - mapea exactamente a la tabla trips
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub odometer_start: i32,
    pub odometer_end: Option<i32>,
    pub distance: Option<i32>,
    pub fuel_used: Option<Decimal>,
    pub fuel_cost: Option<Decimal>,
    pub remarks: Option<String>,
}

impl Trip {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Validar los datos de cierre y devolver la distancia recorrida.
    /// No muta nada; el cierre real lo aplica el repositorio en la misma
    /// transacción que actualiza reserva y vehículo.
    pub fn validate_close(
        &self,
        ended_at: DateTime<Utc>,
        odometer_end: i32,
        fuel_used: Option<Decimal>,
        fuel_cost: Option<Decimal>,
    ) -> Result<i32, AppError> {
        if !self.is_open() {
            return Err(AppError::State(
                "No active trip found for this booking".to_string(),
            ));
        }
        if ended_at <= self.started_at {
            return Err(AppError::Validation(
                "End date/time must be after the trip start time".to_string(),
            ));
        }
        if odometer_end < self.odometer_start {
            return Err(AppError::Validation(format!(
                "End odometer ({}) cannot be less than start odometer ({})",
                odometer_end, self.odometer_start
            )));
        }
        if let Some(fuel) = fuel_used {
            validate_non_negative("Fuel used", fuel)?;
        }
        if let Some(cost) = fuel_cost {
            validate_non_negative("Fuel cost", cost)?;
        }
        Ok(odometer_end - self.odometer_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap()
    }

    fn open_trip(odometer_start: i32) -> Trip {
        Trip {
            id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            started_at: ts(8),
            ended_at: None,
            odometer_start,
            odometer_end: None,
            distance: None,
            fuel_used: None,
            fuel_cost: None,
            remarks: None,
        }
    }

    #[test]
    fn test_close_computes_distance() {
        let trip = open_trip(1000);
        let distance = trip.validate_close(ts(12), 1120, None, None).unwrap();
        assert_eq!(distance, 120);
    }

    #[test]
    fn test_close_rejects_odometer_below_start() {
        let trip = open_trip(1000);
        let err = trip.validate_close(ts(12), 950, None, None).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert!(msg.contains("950"));
                assert!(msg.contains("1000"));
            }
            _ => panic!("expected validation error"),
        }
    }

    #[test]
    fn test_close_rejects_end_before_start() {
        let trip = open_trip(1000);
        assert!(matches!(
            trip.validate_close(ts(7), 1100, None, None),
            Err(AppError::Validation(_))
        ));
        // Mismo instante tampoco vale
        assert!(matches!(
            trip.validate_close(ts(8), 1100, None, None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_close_rejects_negative_fuel() {
        let trip = open_trip(1000);
        assert!(trip
            .validate_close(ts(12), 1100, Some(Decimal::new(-5, 0)), None)
            .is_err());
        assert!(trip
            .validate_close(ts(12), 1100, None, Some(Decimal::new(-1, 2)))
            .is_err());
        assert!(trip
            .validate_close(ts(12), 1100, Some(Decimal::new(85, 1)), Some(Decimal::ZERO))
            .is_ok());
    }

    #[test]
    fn test_close_rejects_already_closed_trip() {
        let mut trip = open_trip(1000);
        trip.ended_at = Some(ts(12));
        trip.odometer_end = Some(1100);
        assert!(matches!(
            trip.validate_close(ts(13), 1200, None, None),
            Err(AppError::State(_))
        ));
    }

    #[test]
    fn test_zero_distance_is_allowed() {
        let trip = open_trip(500);
        assert_eq!(trip.validate_close(ts(9), 500, None, None).unwrap(), 0);
    }
}

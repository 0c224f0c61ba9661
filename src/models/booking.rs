//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking, su máquina de estados y el
//! predicado de solapamiento de intervalos usado por la detección de
//! conflictos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado de la reserva
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Approved,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(BookingStatus::Pending),
            "approved" => Some(BookingStatus::Approved),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Una reserva activa cuenta para la detección de conflictos
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Approved)
    }

    pub fn can_cancel(&self) -> bool {
        self.is_active()
    }
}

/// Booking principal - mapea exactamente a la tabla bookings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub requester_id: Uuid,
    pub requester_name: String,
    pub driver_id: Option<Uuid>,
    pub start_planned: DateTime<Utc>,
    pub end_planned: DateTime<Utc>,
    pub route_from: String,
    pub route_to: String,
    pub purpose: String,
    pub activity_code: Option<String>,
    pub project_code: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn status(&self) -> BookingStatus {
        BookingStatus::parse(&self.status).unwrap_or(BookingStatus::Pending)
    }

    /// Solapamiento de intervalos semiabiertos [start, end):
    /// dos ventanas se solapan sii s1 < e2 AND s2 < e1.
    /// Extremos que se tocan no cuentan como conflicto.
    pub fn overlaps_window(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_planned < end && start < self.end_planned
    }
}

/// Buscar la primera reserva activa cuya ventana se solape con [start, end)
pub fn find_conflict<'a>(
    active: &'a [Booking],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Option<&'a Booking> {
    active.iter().find(|b| b.overlaps_window(start, end))
}

/// Datos de inserción de una reserva nueva
#[derive(Debug)]
pub struct NewBooking {
    pub vehicle_id: Uuid,
    pub requester_id: Uuid,
    pub requester_name: String,
    pub driver_id: Option<Uuid>,
    pub start_planned: DateTime<Utc>,
    pub end_planned: DateTime<Utc>,
    pub route_from: String,
    pub route_to: String,
    pub purpose: String,
    pub activity_code: Option<String>,
    pub project_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap()
    }

    fn booking(start: DateTime<Utc>, end: DateTime<Utc>, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            requester_id: Uuid::new_v4(),
            requester_name: "Jane Roe".to_string(),
            driver_id: None,
            start_planned: start,
            end_planned: end,
            route_from: "HQ".to_string(),
            route_to: "Site A".to_string(),
            purpose: "Field visit".to_string(),
            activity_code: None,
            project_code: None,
            status: status.as_str().to_string(),
            created_at: ts(0),
            updated_at: ts(0),
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Approved,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("rejected"), None);
    }

    #[test]
    fn test_active_statuses() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Approved.is_active());
        assert!(!BookingStatus::Completed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }

    #[test]
    fn test_overlap_is_half_open() {
        // Reserva A: 08:00–10:00
        let a = booking(ts(8), ts(10), BookingStatus::Pending);

        // B: 09:00–11:00 se solapa (09:00–10:00)
        assert!(a.overlaps_window(ts(9), ts(11)));
        // C: 10:00–12:00 toca el extremo, no hay conflicto
        assert!(!a.overlaps_window(ts(10), ts(12)));
        // Ventana anterior que toca el inicio tampoco
        assert!(!a.overlaps_window(ts(6), ts(8)));
        // Ventana que contiene a A por completo
        assert!(a.overlaps_window(ts(7), ts(11)));
        // Ventana contenida dentro de A
        assert!(a.overlaps_window(ts(8), ts(9)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = booking(ts(8), ts(10), BookingStatus::Approved);
        let b = booking(ts(9), ts(11), BookingStatus::Pending);
        assert_eq!(
            a.overlaps_window(b.start_planned, b.end_planned),
            b.overlaps_window(a.start_planned, a.end_planned)
        );
    }

    #[test]
    fn test_find_conflict_returns_first_overlap() {
        let active = vec![
            booking(ts(6), ts(7), BookingStatus::Approved),
            booking(ts(8), ts(10), BookingStatus::Pending),
        ];

        let hit = find_conflict(&active, ts(9), ts(11)).expect("expected a conflict");
        assert_eq!(hit.start_planned, ts(8));

        assert!(find_conflict(&active, ts(10), ts(12)).is_none());
        assert!(find_conflict(&active, ts(7), ts(8)).is_none());
    }
}

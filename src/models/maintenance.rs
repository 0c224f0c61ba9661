//! Modelo de MaintenanceRecord

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado del registro de mantenimiento
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "scheduled",
            MaintenanceStatus::Completed => "completed",
            MaintenanceStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(MaintenanceStatus::Scheduled),
            "completed" => Some(MaintenanceStatus::Completed),
            "cancelled" => Some(MaintenanceStatus::Cancelled),
            _ => None,
        }
    }
}

/// Tipo de mantenimiento
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    Routine,
    Repair,
    Inspection,
    Tyre,
    Other,
}

impl MaintenanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::Routine => "routine",
            MaintenanceType::Repair => "repair",
            MaintenanceType::Inspection => "inspection",
            MaintenanceType::Tyre => "tyre",
            MaintenanceType::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "routine" => Some(MaintenanceType::Routine),
            "repair" => Some(MaintenanceType::Repair),
            "inspection" => Some(MaintenanceType::Inspection),
            "tyre" => Some(MaintenanceType::Tyre),
            "other" => Some(MaintenanceType::Other),
            _ => None,
        }
    }
}

/// MaintenanceRecord principal - mapea exactamente a la tabla maintenance_records
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub maintenance_type: String,
    pub description: String,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub cost: Option<Decimal>,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceRecord {
    pub fn status(&self) -> MaintenanceStatus {
        MaintenanceStatus::parse(&self.status).unwrap_or(MaintenanceStatus::Scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            MaintenanceStatus::Scheduled,
            MaintenanceStatus::Completed,
            MaintenanceStatus::Cancelled,
        ] {
            assert_eq!(MaintenanceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(MaintenanceStatus::parse("in_progress"), None);
    }

    #[test]
    fn test_type_round_trip() {
        for mtype in [
            MaintenanceType::Routine,
            MaintenanceType::Repair,
            MaintenanceType::Inspection,
            MaintenanceType::Tyre,
            MaintenanceType::Other,
        ] {
            assert_eq!(MaintenanceType::parse(mtype.as_str()), Some(mtype));
        }
        assert_eq!(MaintenanceType::parse("oil_change"), None);
    }
}

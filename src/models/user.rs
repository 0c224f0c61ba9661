//! Modelo de User
//!
//! Usuarios con roles admin | driver | requester. El hash de contraseña
//! nunca sale hacia la API; los DTOs de respuesta lo omiten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Rol del usuario
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Driver,
    Requester,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Driver => "driver",
            UserRole::Requester => "requester",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(UserRole::Admin),
            "driver" => Some(UserRole::Driver),
            "requester" => Some(UserRole::Requester),
            _ => None,
        }
    }
}

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> UserRole {
        UserRole::parse(&self.role).unwrap_or(UserRole::Requester)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == UserRole::Admin
    }

    pub fn is_driver(&self) -> bool {
        self.role() == UserRole::Driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Admin, UserRole::Driver, UserRole::Requester] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("superuser"), None);
    }
}

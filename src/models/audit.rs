//! Modelo de AuditLog
//!
//! Un registro por transición de estado: quién, qué acción, sobre qué
//! entidad. El sink que los escribe es fire-and-forget.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acción registrada en la auditoría
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Edit,
    Delete,
    Approve,
    Cancel,
    Assign,
    Start,
    Complete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Edit => "edit",
            AuditAction::Delete => "delete",
            AuditAction::Approve => "approve",
            AuditAction::Cancel => "cancel",
            AuditAction::Assign => "assign",
            AuditAction::Start => "start",
            AuditAction::Complete => "complete",
        }
    }
}

/// Entrada pendiente de escribir en audit_logs
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub user_id: Option<Uuid>,
    pub username: String,
    pub action: AuditAction,
    pub entity_type: &'static str,
    pub entity_id: Option<Uuid>,
    pub details: Option<String>,
}

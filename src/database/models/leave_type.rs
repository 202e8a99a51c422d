use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::employee::Gender;

/// A category of leave with its policy attributes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveType {
    pub id: Uuid,
    pub name: String,
    pub code: String, // e.g. "SL", "VL", "ML"
    pub description: Option<String>,
    pub default_days: i32,
    pub is_paid: bool,
    pub requires_approval: bool,
    pub max_consecutive_days: Option<i32>,
    pub min_notice_days: Option<i32>,
    pub is_active: bool,
    pub gender: Option<Gender>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveTypeInput {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub default_days: i32,
    pub is_paid: bool,
    pub requires_approval: bool,
    pub max_consecutive_days: Option<i32>,
    pub min_notice_days: Option<i32>,
    pub is_active: bool,
    pub gender: Option<Gender>,
}

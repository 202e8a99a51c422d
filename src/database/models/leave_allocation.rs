use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::types::Days;

/// One employee's budget of days for one leave type in one fiscal year.
///
/// `remaining_days` is always `allocated_days - used_days`; every mutator
/// below recomputes it. It is not clamped and may go negative.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveAllocation {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub leave_type_id: Uuid,
    pub year: i32,
    pub allocated_days: Days,
    pub used_days: Days,
    pub remaining_days: Days,
    pub is_active: bool,
    pub expiry_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl LeaveAllocation {
    /// A fresh, active allocation with nothing used yet.
    pub fn new(
        employee_id: Uuid,
        leave_type_id: Uuid,
        year: i32,
        allocated_days: Days,
        expiry_date: Option<NaiveDate>,
        notes: Option<String>,
        created_by: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            leave_type_id,
            year,
            remaining_days: allocated_days.clone(),
            allocated_days,
            used_days: Days::zero(),
            is_active: true,
            expiry_date,
            notes,
            created_at: Utc::now(),
            created_by: created_by.to_string(),
            updated_at: None,
            updated_by: None,
        }
    }

    /// Consume days for an approved request.
    pub fn debit(&mut self, days: &Days, updated_by: &str) {
        self.used_days = &self.used_days + days;
        self.recompute_remaining(updated_by);
    }

    /// Give back days of a cancelled approved request.
    pub fn credit(&mut self, days: &Days, updated_by: &str) {
        self.used_days = &self.used_days - days;
        self.recompute_remaining(updated_by);
    }

    /// Administrative override; keeps what has been used so far.
    pub fn apply_update(&mut self, update: LeaveAllocationUpdateInput, updated_by: &str) {
        self.allocated_days = update.allocated_days;
        self.is_active = update.is_active;
        self.expiry_date = update.expiry_date;
        self.notes = update.notes;
        self.recompute_remaining(updated_by);
    }

    pub fn has_usage(&self) -> bool {
        self.used_days.is_positive()
    }

    fn recompute_remaining(&mut self, updated_by: &str) {
        self.remaining_days = &self.allocated_days - &self.used_days;
        self.updated_at = Some(Utc::now());
        self.updated_by = Some(updated_by.to_string());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveAllocationInput {
    pub employee_id: Uuid,
    pub leave_type_id: Uuid,
    pub year: i32,
    pub allocated_days: Days,
    pub expiry_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveAllocationUpdateInput {
    pub allocated_days: Days,
    pub is_active: bool,
    pub expiry_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Allocation row joined with the leave type it budgets.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveAllocationWithType {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub allocation: LeaveAllocation,
    pub leave_type_name: String,
    pub leave_type_code: String,
}

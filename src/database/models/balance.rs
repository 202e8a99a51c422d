use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::types::Days;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalanceItem {
    pub leave_type_id: Uuid,
    pub leave_type_name: String,
    pub leave_type_code: String,
    pub allocated_days: Days,
    pub used_days: Days,
    pub remaining_days: Days,
    /// Days asked for in still-pending requests; informational only.
    pub pending_days: Days,
    pub is_active: bool,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalanceSummary {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub employee_number: String,
    pub year: i32,
    pub leave_balances: Vec<LeaveBalanceItem>,
    pub generated_at: DateTime<Utc>,
}

impl LeaveBalanceSummary {
    pub fn balance_for(&self, leave_type_code: &str) -> Option<&LeaveBalanceItem> {
        self.leave_balances
            .iter()
            .find(|item| item.leave_type_code.eq_ignore_ascii_case(leave_type_code))
    }
}

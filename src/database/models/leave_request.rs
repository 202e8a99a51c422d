use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use crate::database::types::Days;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub leave_type_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: Days, // may be fractional for half days
    pub reason: String,
    pub status: LeaveStatus,
    pub approved_by: Option<Uuid>,
    pub approver_name: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approver_comments: Option<String>,
    pub rejection_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub attachment_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl LeaveRequest {
    pub fn new(input: LeaveRequestInput, created_by: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: input.employee_id,
            leave_type_id: input.leave_type_id,
            start_date: input.start_date,
            end_date: input.end_date,
            total_days: input.total_days,
            reason: input.reason,
            status: LeaveStatus::Pending,
            approved_by: None,
            approver_name: None,
            approved_at: None,
            approver_comments: None,
            rejection_reason: None,
            cancelled_at: None,
            cancellation_reason: None,
            attachment_path: input.attachment_path,
            created_at: Utc::now(),
            created_by: created_by.to_string(),
            updated_at: None,
            updated_by: None,
        }
    }

    /// The fiscal year whose allocation this request draws from.
    pub fn fiscal_year(&self) -> i32 {
        self.start_date.year()
    }

    pub fn is_pending(&self) -> bool {
        self.status == LeaveStatus::Pending
    }

    pub fn apply_update(
        &mut self,
        update: LeaveRequestUpdateInput,
        updated_by: &str,
    ) -> Result<(), AppError> {
        if !self.is_pending() {
            return Err(AppError::invalid_operation(
                "Only pending leave requests can be updated",
            ));
        }

        self.start_date = update.start_date;
        self.end_date = update.end_date;
        self.total_days = update.total_days;
        self.reason = update.reason;
        self.attachment_path = update.attachment_path;
        self.touch(updated_by);
        Ok(())
    }

    pub fn approve(
        &mut self,
        approver_id: Uuid,
        approver_name: &str,
        comments: Option<String>,
    ) -> Result<(), AppError> {
        self.record_decision(LeaveStatus::Approved, approver_id, approver_name, comments)
    }

    pub fn reject(
        &mut self,
        approver_id: Uuid,
        approver_name: &str,
        rejection_reason: Option<String>,
        comments: Option<String>,
    ) -> Result<(), AppError> {
        self.record_decision(LeaveStatus::Rejected, approver_id, approver_name, comments)?;
        self.rejection_reason = rejection_reason;
        Ok(())
    }

    /// Cancels the request and returns the status it had before.
    pub fn cancel(&mut self, reason: String, updated_by: &str) -> Result<LeaveStatus, AppError> {
        if self.status == LeaveStatus::Cancelled {
            return Err(AppError::invalid_operation(
                "Leave request is already cancelled",
            ));
        }

        let previous = std::mem::replace(&mut self.status, LeaveStatus::Cancelled);
        let now = Utc::now();
        self.cancelled_at = Some(now);
        self.cancellation_reason = Some(reason);
        self.touch(updated_by);
        Ok(previous)
    }

    fn record_decision(
        &mut self,
        status: LeaveStatus,
        approver_id: Uuid,
        approver_name: &str,
        comments: Option<String>,
    ) -> Result<(), AppError> {
        if !self.is_pending() {
            return Err(AppError::invalid_operation(format!(
                "Only pending leave requests can be approved or rejected (current status: {})",
                self.status
            )));
        }

        self.status = status;
        self.approved_by = Some(approver_id);
        self.approver_name = Some(approver_name.to_string());
        self.approved_at = Some(Utc::now());
        if comments.is_some() {
            self.approver_comments = comments;
        }
        self.touch(approver_name);
        Ok(())
    }

    fn touch(&mut self, updated_by: &str) {
        self.updated_at = Some(Utc::now());
        self.updated_by = Some(updated_by.to_string());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestInput {
    pub employee_id: Uuid,
    pub leave_type_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: Days,
    pub reason: String,
    pub attachment_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestUpdateInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: Days,
    pub reason: String,
    pub attachment_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestFilter {
    pub employee_id: Option<Uuid>,
    pub status: Option<LeaveStatus>,
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum LeaveStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn pending_request() -> LeaveRequest {
        LeaveRequest::new(
            LeaveRequestInput {
                employee_id: Uuid::new_v4(),
                leave_type_id: Uuid::new_v4(),
                start_date: NaiveDate::from_ymd_opt(2026, 12, 30).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2027, 1, 2).unwrap(),
                total_days: Days::from_str("3").unwrap(),
                reason: "Family trip over new year".to_string(),
                attachment_path: None,
            },
            "employee",
        )
    }

    #[test]
    fn fiscal_year_follows_start_date() {
        assert_eq!(pending_request().fiscal_year(), 2026);
    }

    #[test]
    fn approve_records_approver_and_blocks_second_decision() {
        let mut request = pending_request();
        let approver = Uuid::new_v4();

        request
            .approve(approver, "Hannah HR", Some("Enjoy".to_string()))
            .unwrap();
        assert_eq!(request.status, LeaveStatus::Approved);
        assert_eq!(request.approved_by, Some(approver));
        assert_eq!(request.approver_name.as_deref(), Some("Hannah HR"));
        assert!(request.approved_at.is_some());
        assert_eq!(request.approver_comments.as_deref(), Some("Enjoy"));

        let err = request.approve(approver, "Hannah HR", None).unwrap_err();
        assert!(err.is_invalid_operation());
        let err = request.reject(approver, "Hannah HR", None, None).unwrap_err();
        assert!(err.is_invalid_operation());
    }

    #[test]
    fn reject_stores_reason_and_comments() {
        let mut request = pending_request();
        request
            .reject(
                Uuid::new_v4(),
                "Hannah HR",
                Some("Peak season".to_string()),
                Some("Try again in March".to_string()),
            )
            .unwrap();
        assert_eq!(request.status, LeaveStatus::Rejected);
        assert_eq!(request.rejection_reason.as_deref(), Some("Peak season"));
        assert_eq!(request.approver_comments.as_deref(), Some("Try again in March"));
    }

    #[test]
    fn cancel_reports_previous_status_once() {
        let mut request = pending_request();
        request.approve(Uuid::new_v4(), "Hannah HR", None).unwrap();

        let previous = request.cancel("Plans changed".to_string(), "employee").unwrap();
        assert_eq!(previous, LeaveStatus::Approved);
        assert_eq!(request.status, LeaveStatus::Cancelled);
        assert!(request.cancelled_at.is_some());

        let err = request.cancel("again".to_string(), "employee").unwrap_err();
        assert!(err.is_invalid_operation());
    }

    #[test]
    fn rejected_requests_can_still_be_cancelled() {
        let mut request = pending_request();
        request.reject(Uuid::new_v4(), "Hannah HR", None, None).unwrap();
        assert_eq!(
            request.cancel("withdrawn".to_string(), "employee").unwrap(),
            LeaveStatus::Rejected
        );
    }

    #[test]
    fn only_pending_requests_are_editable() {
        let mut request = pending_request();
        let update = LeaveRequestUpdateInput {
            start_date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 11, 3).unwrap(),
            total_days: Days::from_str("2").unwrap(),
            reason: "Moved earlier".to_string(),
            attachment_path: None,
        };
        request.apply_update(update.clone(), "employee").unwrap();
        assert_eq!(request.total_days, Days::from(2));

        request.approve(Uuid::new_v4(), "Hannah HR", None).unwrap();
        assert!(request.apply_update(update, "employee").unwrap_err().is_invalid_operation());
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in LeaveStatus::ALL {
            assert_eq!(status.to_string().parse::<LeaveStatus>().as_ref(), Ok(status));
        }
    }
}

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::database;
use crate::database::models::{
    Employee, LeaveAllocation, LeaveAllocationInput, LeaveAllocationUpdateInput, LeaveBalanceItem,
    LeaveBalanceSummary, LeaveRequest, LeaveRequestFilter, LeaveRequestInput,
    LeaveRequestUpdateInput, LeaveStatus, LeaveType,
};
use crate::database::repositories::{employee, leave_allocation, leave_request, leave_type};
use crate::database::types::Days;
use crate::error::AppError;
use crate::services::caller::Caller;

/// Allocations, leave requests and the balance arithmetic tying them together.
///
/// Each mutating operation runs in a single transaction: the allocation is
/// read, adjusted in memory and written back before commit, so a failure
/// never leaves a request and its allocation out of step.
#[derive(Clone)]
pub struct LeaveLedger {
    pool: SqlitePool,
}

impl LeaveLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---------------------------------------------------------------------
    // Allocations
    // ---------------------------------------------------------------------

    pub async fn create_allocation(
        &self,
        caller: &Caller,
        input: LeaveAllocationInput,
    ) -> Result<LeaveAllocation, AppError> {
        log::info!(
            "Creating leave allocation for employee {}, leave type {}, year {}",
            input.employee_id,
            input.leave_type_id,
            input.year
        );

        validate_allocated_days(&input.allocated_days)?;

        let mut tx = database::begin_write(&self.pool).await?;

        ensure_employee(&mut tx, input.employee_id).await?;
        ensure_leave_type(&mut tx, input.leave_type_id).await?;

        if leave_allocation::find_for(&mut tx, input.employee_id, input.leave_type_id, input.year)
            .await?
            .is_some()
        {
            return Err(AppError::invalid_operation(format!(
                "Allocation already exists for this employee, leave type, and year {}",
                input.year
            )));
        }

        let allocation = LeaveAllocation::new(
            input.employee_id,
            input.leave_type_id,
            input.year,
            input.allocated_days,
            input.expiry_date,
            input.notes,
            &caller.name,
        );
        let allocation = leave_allocation::insert(&mut tx, &allocation).await?;
        tx.commit().await?;

        log::info!("Leave allocation created with ID: {}", allocation.id);
        Ok(allocation)
    }

    /// Gives the employee every active leave type they do not yet hold for
    /// `year`, at the type's default day count and expiring on Dec 31.
    ///
    /// Returns `false` when there was nothing to allocate.
    pub async fn auto_allocate(
        &self,
        caller: &Caller,
        employee_id: Uuid,
        year: i32,
    ) -> Result<bool, AppError> {
        log::info!(
            "Auto-allocating leave types for employee {} for year {}",
            employee_id,
            year
        );

        let expiry_date = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| AppError::invalid_operation(format!("Invalid year {}", year)))?;

        let mut tx = database::begin_write(&self.pool).await?;

        ensure_employee(&mut tx, employee_id).await?;

        let already_allocated =
            leave_allocation::allocated_leave_type_ids(&mut tx, employee_id, year).await?;
        let missing: Vec<LeaveType> = leave_type::list_active(&mut tx)
            .await?
            .into_iter()
            .filter(|lt| !already_allocated.contains(&lt.id))
            .collect();

        if missing.is_empty() {
            log::info!(
                "Employee {} already holds every active leave type for {}",
                employee_id,
                year
            );
            return Ok(false);
        }

        for lt in &missing {
            let allocation = LeaveAllocation::new(
                employee_id,
                lt.id,
                year,
                Days::from(lt.default_days),
                Some(expiry_date),
                Some(format!("Auto-allocated {} for {}", lt.name, year)),
                &caller.name,
            );
            leave_allocation::insert(&mut tx, &allocation).await?;
        }

        tx.commit().await?;

        log::info!(
            "Successfully allocated {} leave types to employee {} for year {}",
            missing.len(),
            employee_id,
            year
        );
        Ok(true)
    }

    /// Administrative override. Remaining days are recomputed from what has
    /// already been used and may go negative.
    pub async fn update_allocation(
        &self,
        caller: &Caller,
        id: Uuid,
        update: LeaveAllocationUpdateInput,
    ) -> Result<LeaveAllocation, AppError> {
        log::info!("Updating allocation with ID: {}", id);

        validate_allocated_days(&update.allocated_days)?;

        let mut tx = database::begin_write(&self.pool).await?;

        let mut allocation = find_allocation(&mut tx, id).await?;
        allocation.apply_update(update, &caller.name);
        let allocation = leave_allocation::save(&mut tx, &allocation).await?;

        tx.commit().await?;

        log::info!("Allocation with ID: {} updated successfully", id);
        Ok(allocation)
    }

    pub async fn delete_allocation(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        log::info!("Deleting allocation with ID: {} ({})", id, caller.name);

        let mut tx = database::begin_write(&self.pool).await?;

        let allocation = find_allocation(&mut tx, id).await?;
        if allocation.has_usage() {
            return Err(AppError::invalid_operation(
                "Cannot delete allocation that has been used. Consider deactivating instead.",
            ));
        }

        leave_allocation::delete(&mut tx, id).await?;
        tx.commit().await?;

        log::info!("Allocation with ID: {} deleted successfully", id);
        Ok(())
    }

    pub async fn get_allocation(&self, id: Uuid) -> Result<LeaveAllocation, AppError> {
        let mut conn = self.pool.acquire().await?;
        find_allocation(&mut conn, id).await
    }

    pub async fn list_allocations(&self) -> Result<Vec<LeaveAllocation>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(leave_allocation::list_all(&mut conn).await?)
    }

    pub async fn allocations_for_employee(
        &self,
        employee_id: Uuid,
        year: Option<i32>,
    ) -> Result<Vec<LeaveAllocation>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(leave_allocation::list_for_employee(&mut conn, employee_id, year).await?)
    }

    // ---------------------------------------------------------------------
    // Requests
    // ---------------------------------------------------------------------

    /// Records a pending request after checking it fits the allocation for
    /// the year it starts in. Nothing is debited until approval, and pending
    /// requests are not reserved against each other.
    pub async fn request_leave(
        &self,
        caller: &Caller,
        input: LeaveRequestInput,
    ) -> Result<LeaveRequest, AppError> {
        log::info!("Creating leave request for employee: {}", input.employee_id);

        let mut tx = database::begin_write(&self.pool).await?;

        ensure_employee(&mut tx, input.employee_id).await?;
        ensure_leave_type(&mut tx, input.leave_type_id).await?;
        validate_period(input.start_date, input.end_date, &input.total_days)?;

        let request = LeaveRequest::new(input, &caller.name);
        let year = request.fiscal_year();

        let allocation = leave_allocation::find_active_for(
            &mut tx,
            request.employee_id,
            request.leave_type_id,
            year,
        )
        .await?
        .ok_or_else(|| {
            AppError::invalid_operation(format!(
                "No leave allocation found for this employee and leave type for year {}",
                year
            ))
        })?;

        if allocation.remaining_days < request.total_days {
            return Err(AppError::invalid_operation(format!(
                "Insufficient leave balance. Available: {} days, Requested: {} days",
                allocation.remaining_days, request.total_days
            )));
        }

        let request = leave_request::insert(&mut tx, &request).await?;
        tx.commit().await?;

        log::info!("Leave request created with ID: {}", request.id);
        Ok(request)
    }

    /// Edits a pending request. The new period is not re-checked against the
    /// allocation.
    pub async fn update_request(
        &self,
        caller: &Caller,
        id: Uuid,
        update: LeaveRequestUpdateInput,
    ) -> Result<LeaveRequest, AppError> {
        log::info!("Updating leave request with ID: {}", id);

        let mut tx = database::begin_write(&self.pool).await?;

        let mut request = find_request(&mut tx, id).await?;
        if !request.is_pending() {
            return Err(AppError::invalid_operation(
                "Only pending leave requests can be updated",
            ));
        }
        validate_period(update.start_date, update.end_date, &update.total_days)?;

        request.apply_update(update, &caller.name)?;
        let request = leave_request::save(&mut tx, &request).await?;
        tx.commit().await?;

        log::info!("Leave request with ID: {} updated successfully", id);
        Ok(request)
    }

    pub async fn delete_request(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        log::info!("Deleting leave request with ID: {} ({})", id, caller.name);

        let mut tx = database::begin_write(&self.pool).await?;

        let request = find_request(&mut tx, id).await?;
        if request.status == LeaveStatus::Approved {
            return Err(AppError::invalid_operation(
                "Cannot delete approved leave requests. Please cancel instead.",
            ));
        }

        leave_request::delete(&mut tx, id).await?;
        tx.commit().await?;

        log::info!("Leave request with ID: {} deleted successfully", id);
        Ok(())
    }

    /// Approves a pending request and debits the matching active allocation.
    ///
    /// When no such allocation exists any more the request is still approved
    /// and the debit is skipped with a warning.
    pub async fn approve(
        &self,
        caller: &Caller,
        id: Uuid,
        comments: Option<String>,
    ) -> Result<LeaveRequest, AppError> {
        log::info!("Approving leave request with ID: {}", id);

        let mut tx = database::begin_write(&self.pool).await?;

        let mut request = find_request(&mut tx, id).await?;
        request.approve(caller.id, &caller.name, comments)?;

        match leave_allocation::find_active_for(
            &mut tx,
            request.employee_id,
            request.leave_type_id,
            request.fiscal_year(),
        )
        .await?
        {
            Some(mut allocation) => {
                allocation.debit(&request.total_days, &caller.name);
                leave_allocation::save(&mut tx, &allocation).await?;
            }
            None => log::warn!(
                "No active allocation for leave request {} (employee {}, year {}); balance not debited",
                id,
                request.employee_id,
                request.fiscal_year()
            ),
        }

        let request = leave_request::save(&mut tx, &request).await?;
        tx.commit().await?;

        log::info!("Leave request {} approved", id);
        Ok(request)
    }

    /// Rejects a pending request. Allocations are never touched.
    pub async fn reject(
        &self,
        caller: &Caller,
        id: Uuid,
        rejection_reason: Option<String>,
        comments: Option<String>,
    ) -> Result<LeaveRequest, AppError> {
        log::info!("Rejecting leave request with ID: {}", id);

        let mut tx = database::begin_write(&self.pool).await?;

        let mut request = find_request(&mut tx, id).await?;
        request.reject(caller.id, &caller.name, rejection_reason, comments)?;
        let request = leave_request::save(&mut tx, &request).await?;

        tx.commit().await?;

        log::info!("Leave rejected for leave request {}", id);
        Ok(request)
    }

    /// Cancels a request; an approved one gives its days back to the
    /// allocation it was debited from.
    pub async fn cancel(
        &self,
        caller: &Caller,
        id: Uuid,
        reason: String,
    ) -> Result<LeaveRequest, AppError> {
        log::info!("Cancelling leave request with ID: {}", id);

        let mut tx = database::begin_write(&self.pool).await?;

        let mut request = find_request(&mut tx, id).await?;
        let previous = request.cancel(reason, &caller.name)?;

        if previous == LeaveStatus::Approved {
            match leave_allocation::find_active_for(
                &mut tx,
                request.employee_id,
                request.leave_type_id,
                request.fiscal_year(),
            )
            .await?
            {
                Some(mut allocation) => {
                    allocation.credit(&request.total_days, &caller.name);
                    leave_allocation::save(&mut tx, &allocation).await?;
                    log::info!("Leave balance restored for cancelled leave request {}", id);
                }
                None => log::warn!(
                    "No active allocation to restore for cancelled leave request {}",
                    id
                ),
            }
        }

        let request = leave_request::save(&mut tx, &request).await?;
        tx.commit().await?;

        log::info!("Leave request with ID: {} cancelled successfully", id);
        Ok(request)
    }

    pub async fn get_request(&self, id: Uuid) -> Result<LeaveRequest, AppError> {
        let mut conn = self.pool.acquire().await?;
        find_request(&mut conn, id).await
    }

    pub async fn list_requests(
        &self,
        filter: &LeaveRequestFilter,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(leave_request::list(&mut conn, filter).await?)
    }

    pub async fn requests_for_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        self.list_requests(&LeaveRequestFilter {
            employee_id: Some(employee_id),
            status: None,
        })
        .await
    }

    pub async fn requests_with_status(
        &self,
        status: LeaveStatus,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        self.list_requests(&LeaveRequestFilter {
            employee_id: None,
            status: Some(status),
        })
        .await
    }

    // ---------------------------------------------------------------------
    // Balances
    // ---------------------------------------------------------------------

    /// Per-allocation balances for the employee and year, ordered by leave
    /// type name. Pending days are reported alongside and never subtracted.
    pub async fn balance_summary(
        &self,
        employee_id: Uuid,
        year: i32,
    ) -> Result<LeaveBalanceSummary, AppError> {
        log::debug!(
            "Building leave balance summary for employee {} for {}",
            employee_id,
            year
        );

        let mut conn = self.pool.acquire().await?;

        let employee = ensure_employee(&mut conn, employee_id).await?;
        let allocations = leave_allocation::list_with_types(&mut conn, employee_id, year).await?;
        let mut pending = leave_request::pending_days_by_type(&mut conn, employee_id, year).await?;

        let leave_balances = allocations
            .into_iter()
            .map(|row| {
                let allocation = row.allocation;
                LeaveBalanceItem {
                    pending_days: pending
                        .remove(&allocation.leave_type_id)
                        .unwrap_or_else(Days::zero),
                    leave_type_id: allocation.leave_type_id,
                    leave_type_name: row.leave_type_name,
                    leave_type_code: row.leave_type_code,
                    allocated_days: allocation.allocated_days,
                    used_days: allocation.used_days,
                    remaining_days: allocation.remaining_days,
                    is_active: allocation.is_active,
                    expiry_date: allocation.expiry_date,
                }
            })
            .collect();

        Ok(LeaveBalanceSummary {
            employee_id,
            employee_name: employee.full_name(),
            employee_number: employee.employee_number,
            year,
            leave_balances,
            generated_at: Utc::now(),
        })
    }
}

fn validate_allocated_days(allocated_days: &Days) -> Result<(), AppError> {
    if allocated_days.is_negative() || *allocated_days > Days::full_year() {
        return Err(AppError::invalid_operation(format!(
            "Allocated days must be between 0 and 365, got {}",
            allocated_days
        )));
    }
    if !allocated_days.is_hundredths() {
        return Err(AppError::invalid_operation(
            "Allocated days cannot have more than two decimal places",
        ));
    }
    Ok(())
}

fn validate_period(
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_days: &Days,
) -> Result<(), AppError> {
    if end_date < start_date {
        return Err(AppError::invalid_operation(
            "End date cannot be earlier than start date",
        ));
    }
    if *total_days < Days::half_day() {
        return Err(AppError::invalid_operation(format!(
            "Total days must be at least 0.5, got {}",
            total_days
        )));
    }
    if !total_days.is_hundredths() {
        return Err(AppError::invalid_operation(
            "Total days cannot have more than two decimal places",
        ));
    }
    Ok(())
}

async fn ensure_employee(conn: &mut SqliteConnection, id: Uuid) -> Result<Employee, AppError> {
    employee::find_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee", id))
}

async fn ensure_leave_type(conn: &mut SqliteConnection, id: Uuid) -> Result<LeaveType, AppError> {
    leave_type::find_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("Leave type", id))
}

async fn find_allocation(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<LeaveAllocation, AppError> {
    match leave_allocation::find_by_id(conn, id).await? {
        Some(allocation) => Ok(allocation),
        None => {
            log::warn!("Allocation with ID: {} not found", id);
            Err(AppError::not_found("Leave allocation", id))
        }
    }
}

async fn find_request(conn: &mut SqliteConnection, id: Uuid) -> Result<LeaveRequest, AppError> {
    match leave_request::find_by_id(conn, id).await? {
        Some(request) => Ok(request),
        None => {
            log::warn!("Leave request with ID: {} not found", id);
            Err(AppError::not_found("Leave request", id))
        }
    }
}

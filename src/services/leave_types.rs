use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database;
use crate::database::models::{LeaveType, LeaveTypeInput};
use crate::database::repositories::leave_type;
use crate::error::AppError;
use crate::services::caller::Caller;

/// Administration of the leave type catalogue.
#[derive(Clone)]
pub struct LeaveTypeService {
    pool: SqlitePool,
}

impl LeaveTypeService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        input: LeaveTypeInput,
    ) -> Result<LeaveType, AppError> {
        log::info!("Creating new leave type with code: {}", input.code);

        validate(&input)?;

        let mut tx = database::begin_write(&self.pool).await?;

        if leave_type::code_taken(&mut tx, &input.code, None).await? {
            return Err(AppError::invalid_operation(format!(
                "Leave type with code {} already exists",
                input.code
            )));
        }

        let created = leave_type::insert(&mut tx, input, &caller.name).await?;
        tx.commit().await?;

        log::info!("Leave type created with ID: {}", created.id);
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<LeaveType, AppError> {
        let mut conn = self.pool.acquire().await?;
        leave_type::find_by_id(&mut conn, id).await?.ok_or_else(|| {
            log::warn!("Leave type with ID: {} not found", id);
            AppError::not_found("Leave type", id)
        })
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<LeaveType>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(leave_type::find_by_code(&mut conn, code).await?)
    }

    pub async fn list(&self) -> Result<Vec<LeaveType>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(leave_type::list_all(&mut conn).await?)
    }

    pub async fn list_active(&self) -> Result<Vec<LeaveType>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(leave_type::list_active(&mut conn).await?)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: Uuid,
        input: LeaveTypeInput,
    ) -> Result<LeaveType, AppError> {
        log::info!("Updating leave type with ID: {}", id);

        validate(&input)?;

        let mut tx = database::begin_write(&self.pool).await?;

        if leave_type::code_taken(&mut tx, &input.code, Some(id)).await? {
            return Err(AppError::invalid_operation(format!(
                "Leave type with code {} already exists",
                input.code
            )));
        }

        let updated = leave_type::update(&mut tx, id, input, &caller.name)
            .await?
            .ok_or_else(|| AppError::not_found("Leave type", id))?;
        tx.commit().await?;

        Ok(updated)
    }

    /// Fails while any request or allocation still references the type;
    /// deactivate it instead.
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        log::info!("Deleting leave type with ID: {} ({})", id, caller.name);

        let mut tx = database::begin_write(&self.pool).await?;

        if leave_type::find_by_id(&mut tx, id).await?.is_none() {
            return Err(AppError::not_found("Leave type", id));
        }
        if leave_type::is_in_use(&mut tx, id).await? {
            return Err(AppError::invalid_operation(
                "Cannot delete a leave type that has requests or allocations. Deactivate it instead.",
            ));
        }

        leave_type::delete(&mut tx, id).await?;
        tx.commit().await?;

        Ok(())
    }
}

fn validate(input: &LeaveTypeInput) -> Result<(), AppError> {
    if input.name.trim().is_empty() || input.code.trim().is_empty() {
        return Err(AppError::invalid_operation(
            "Leave type name and code are required",
        ));
    }
    if !(0..=365).contains(&input.default_days) {
        return Err(AppError::invalid_operation(format!(
            "Default days must be between 0 and 365, got {}",
            input.default_days
        )));
    }
    Ok(())
}

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database;
use crate::database::models::{
    Department, DepartmentInput, Employee, EmployeeInformation, EmployeeInformationInput,
    EmployeeInput, EmploymentStatus,
};
use crate::database::repositories::{department, employee, employee_information};
use crate::error::AppError;
use crate::services::caller::Caller;

/// Departments, employees and their personal information.
#[derive(Clone)]
pub struct StaffService {
    pool: SqlitePool,
}

impl StaffService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Departments

    pub async fn create_department(
        &self,
        caller: &Caller,
        input: DepartmentInput,
    ) -> Result<Department, AppError> {
        log::info!("Creating department with code: {}", input.code);

        let mut tx = database::begin_write(&self.pool).await?;

        if department::code_taken(&mut tx, &input.code, None).await? {
            return Err(AppError::invalid_operation(format!(
                "Department with code {} already exists",
                input.code
            )));
        }

        let created = department::insert(&mut tx, input, &caller.name).await?;
        tx.commit().await?;

        log::info!("Department created with ID: {}", created.id);
        Ok(created)
    }

    pub async fn get_department(&self, id: Uuid) -> Result<Department, AppError> {
        let mut conn = self.pool.acquire().await?;
        department::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("Department", id))
    }

    pub async fn find_department_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Department>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(department::find_by_code(&mut conn, code).await?)
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(department::list_all(&mut conn).await?)
    }

    pub async fn update_department(
        &self,
        caller: &Caller,
        id: Uuid,
        input: DepartmentInput,
    ) -> Result<Department, AppError> {
        log::info!("Updating department with ID: {}", id);

        let mut tx = database::begin_write(&self.pool).await?;

        if department::code_taken(&mut tx, &input.code, Some(id)).await? {
            return Err(AppError::invalid_operation(format!(
                "Department code {} is already in use",
                input.code
            )));
        }

        let updated = department::update(&mut tx, id, input, &caller.name)
            .await?
            .ok_or_else(|| AppError::not_found("Department", id))?;
        tx.commit().await?;

        Ok(updated)
    }

    pub async fn delete_department(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        log::info!("Deleting department with ID: {} ({})", id, caller.name);

        let mut tx = database::begin_write(&self.pool).await?;

        if department::find_by_id(&mut tx, id).await?.is_none() {
            return Err(AppError::not_found("Department", id));
        }
        if department::count_employees(&mut tx, id).await? > 0 {
            return Err(AppError::invalid_operation(
                "Cannot delete department with existing employees. Please reassign or remove employees first.",
            ));
        }

        department::delete(&mut tx, id).await?;
        tx.commit().await?;

        Ok(())
    }

    // Employees

    pub async fn create_employee(
        &self,
        caller: &Caller,
        input: EmployeeInput,
    ) -> Result<Employee, AppError> {
        log::info!("Creating employee {}", input.employee_number);

        let mut tx = database::begin_write(&self.pool).await?;

        self.check_employee_input(&mut tx, &input, None).await?;
        let created = employee::insert(&mut tx, input, &caller.name).await?;
        tx.commit().await?;

        log::info!("Employee created with ID: {}", created.id);
        Ok(created)
    }

    pub async fn get_employee(&self, id: Uuid) -> Result<Employee, AppError> {
        let mut conn = self.pool.acquire().await?;
        employee::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee", id))
    }

    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(employee::list_all(&mut conn).await?)
    }

    pub async fn list_active_employees(&self) -> Result<Vec<Employee>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(employee::list_by_status(&mut conn, EmploymentStatus::Active).await?)
    }

    pub async fn employees_in_department(
        &self,
        department_id: Uuid,
    ) -> Result<Vec<Employee>, AppError> {
        let mut conn = self.pool.acquire().await?;
        if department::find_by_id(&mut conn, department_id).await?.is_none() {
            return Err(AppError::not_found("Department", department_id));
        }
        Ok(employee::list_by_department(&mut conn, department_id).await?)
    }

    pub async fn update_employee(
        &self,
        caller: &Caller,
        id: Uuid,
        input: EmployeeInput,
    ) -> Result<Employee, AppError> {
        log::info!("Updating employee with ID: {}", id);

        let mut tx = database::begin_write(&self.pool).await?;

        if !employee::exists(&mut tx, id).await? {
            return Err(AppError::not_found("Employee", id));
        }
        self.check_employee_input(&mut tx, &input, Some(id)).await?;

        let updated = employee::update(&mut tx, id, input, &caller.name)
            .await?
            .ok_or_else(|| AppError::not_found("Employee", id))?;
        tx.commit().await?;

        Ok(updated)
    }

    /// Removes the employee and their personal information. Employees with
    /// leave history are kept; terminate them instead.
    pub async fn delete_employee(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        log::info!("Deleting employee with ID: {} ({})", id, caller.name);

        let mut tx = database::begin_write(&self.pool).await?;

        if !employee::exists(&mut tx, id).await? {
            return Err(AppError::not_found("Employee", id));
        }
        if employee::count_leave_records(&mut tx, id).await? > 0 {
            return Err(AppError::invalid_operation(
                "Cannot delete an employee with leave requests or allocations. Terminate the employee instead.",
            ));
        }

        employee_information::delete_by_employee(&mut tx, id).await?;
        employee::delete(&mut tx, id).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn check_employee_input(
        &self,
        conn: &mut sqlx::SqliteConnection,
        input: &EmployeeInput,
        exclude_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if department::find_by_id(conn, input.department_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("Department", input.department_id));
        }
        if employee::email_taken(conn, &input.email, exclude_id).await? {
            return Err(AppError::invalid_operation(format!(
                "Email {} is already in use",
                input.email
            )));
        }
        if employee::employee_number_taken(conn, &input.employee_number, exclude_id).await? {
            return Err(AppError::invalid_operation(format!(
                "Employee number {} is already in use",
                input.employee_number
            )));
        }
        if input.salary.is_negative() {
            return Err(AppError::invalid_operation("Salary cannot be negative"));
        }
        Ok(())
    }

    // Employee information

    pub async fn create_employee_information(
        &self,
        caller: &Caller,
        employee_id: Uuid,
        input: EmployeeInformationInput,
    ) -> Result<EmployeeInformation, AppError> {
        let mut tx = database::begin_write(&self.pool).await?;

        if !employee::exists(&mut tx, employee_id).await? {
            return Err(AppError::not_found("Employee", employee_id));
        }
        if employee_information::find_by_employee(&mut tx, employee_id)
            .await?
            .is_some()
        {
            return Err(AppError::invalid_operation(format!(
                "Employee information already exists for employee {}",
                employee_id
            )));
        }

        let created =
            employee_information::insert(&mut tx, employee_id, input, &caller.name).await?;
        tx.commit().await?;

        Ok(created)
    }

    pub async fn get_employee_information(
        &self,
        employee_id: Uuid,
    ) -> Result<EmployeeInformation, AppError> {
        let mut conn = self.pool.acquire().await?;
        employee_information::find_by_employee(&mut conn, employee_id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee information for employee", employee_id))
    }

    pub async fn update_employee_information(
        &self,
        caller: &Caller,
        employee_id: Uuid,
        input: EmployeeInformationInput,
    ) -> Result<EmployeeInformation, AppError> {
        let mut conn = self.pool.acquire().await?;
        employee_information::update_by_employee(&mut conn, employee_id, input, &caller.name)
            .await?
            .ok_or_else(|| AppError::not_found("Employee information for employee", employee_id))
    }

    pub async fn delete_employee_information(
        &self,
        caller: &Caller,
        employee_id: Uuid,
    ) -> Result<(), AppError> {
        log::info!(
            "Deleting employee information of {} ({})",
            employee_id,
            caller.name
        );

        let mut conn = self.pool.acquire().await?;
        if !employee_information::delete_by_employee(&mut conn, employee_id).await? {
            return Err(AppError::not_found(
                "Employee information for employee",
                employee_id,
            ));
        }
        Ok(())
    }
}

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::database::models::{LeaveAllocation, LeaveAllocationWithType};

const COLUMNS: &str = r#"
    id,
    employee_id,
    leave_type_id,
    year,
    allocated_days,
    used_days,
    remaining_days,
    is_active,
    expiry_date,
    notes,
    created_at,
    created_by,
    updated_at,
    updated_by
"#;

pub async fn insert(
    conn: &mut SqliteConnection,
    allocation: &LeaveAllocation,
) -> Result<LeaveAllocation, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO
            leave_allocations (
                id,
                employee_id,
                leave_type_id,
                year,
                allocated_days,
                used_days,
                remaining_days,
                is_active,
                expiry_date,
                notes,
                created_at,
                created_by
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as::<_, LeaveAllocation>(&query)
        .bind(allocation.id)
        .bind(allocation.employee_id)
        .bind(allocation.leave_type_id)
        .bind(allocation.year)
        .bind(&allocation.allocated_days)
        .bind(&allocation.used_days)
        .bind(&allocation.remaining_days)
        .bind(allocation.is_active)
        .bind(allocation.expiry_date)
        .bind(&allocation.notes)
        .bind(allocation.created_at)
        .bind(&allocation.created_by)
        .fetch_one(&mut *conn)
        .await
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<LeaveAllocation>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM leave_allocations WHERE id = ?");
    sqlx::query_as::<_, LeaveAllocation>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// The allocation for an (employee, leave type, year) triple, active or not.
pub async fn find_for(
    conn: &mut SqliteConnection,
    employee_id: Uuid,
    leave_type_id: Uuid,
    year: i32,
) -> Result<Option<LeaveAllocation>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {COLUMNS}
        FROM
            leave_allocations
        WHERE
            employee_id = ?
            AND leave_type_id = ?
            AND year = ?
        "#
    );

    sqlx::query_as::<_, LeaveAllocation>(&query)
        .bind(employee_id)
        .bind(leave_type_id)
        .bind(year)
        .fetch_optional(&mut *conn)
        .await
}

/// Same as [`find_for`] but only returns an active allocation.
pub async fn find_active_for(
    conn: &mut SqliteConnection,
    employee_id: Uuid,
    leave_type_id: Uuid,
    year: i32,
) -> Result<Option<LeaveAllocation>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {COLUMNS}
        FROM
            leave_allocations
        WHERE
            employee_id = ?
            AND leave_type_id = ?
            AND year = ?
            AND is_active = 1
        "#
    );

    sqlx::query_as::<_, LeaveAllocation>(&query)
        .bind(employee_id)
        .bind(leave_type_id)
        .bind(year)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<LeaveAllocation>, sqlx::Error> {
    let query =
        format!("SELECT {COLUMNS} FROM leave_allocations ORDER BY year DESC, created_at DESC");
    sqlx::query_as::<_, LeaveAllocation>(&query)
        .fetch_all(&mut *conn)
        .await
}

pub async fn list_for_employee(
    conn: &mut SqliteConnection,
    employee_id: Uuid,
    year: Option<i32>,
) -> Result<Vec<LeaveAllocation>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {COLUMNS}
        FROM
            leave_allocations
        WHERE
            employee_id = ?
            AND (? IS NULL OR year = ?)
        ORDER BY
            year DESC,
            created_at
        "#
    );

    sqlx::query_as::<_, LeaveAllocation>(&query)
        .bind(employee_id)
        .bind(year)
        .bind(year)
        .fetch_all(&mut *conn)
        .await
}

/// Leave type ids that already have an allocation for the employee and year.
pub async fn allocated_leave_type_ids(
    conn: &mut SqliteConnection,
    employee_id: Uuid,
    year: i32,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT leave_type_id FROM leave_allocations WHERE employee_id = ? AND year = ?",
    )
    .bind(employee_id)
    .bind(year)
    .fetch_all(&mut *conn)
    .await
}

/// An employee's allocations for a year with their leave type, ordered by leave type name.
pub async fn list_with_types(
    conn: &mut SqliteConnection,
    employee_id: Uuid,
    year: i32,
) -> Result<Vec<LeaveAllocationWithType>, sqlx::Error> {
    sqlx::query_as::<_, LeaveAllocationWithType>(
        r#"
        SELECT
            la.id,
            la.employee_id,
            la.leave_type_id,
            la.year,
            la.allocated_days,
            la.used_days,
            la.remaining_days,
            la.is_active,
            la.expiry_date,
            la.notes,
            la.created_at,
            la.created_by,
            la.updated_at,
            la.updated_by,
            lt.name AS leave_type_name,
            lt.code AS leave_type_code
        FROM
            leave_allocations la
            INNER JOIN leave_types lt ON lt.id = la.leave_type_id
        WHERE
            la.employee_id = ?
            AND la.year = ?
        ORDER BY
            lt.name
        "#,
    )
    .bind(employee_id)
    .bind(year)
    .fetch_all(&mut *conn)
    .await
}

/// Writes back the mutable columns of an allocation.
pub async fn save(
    conn: &mut SqliteConnection,
    allocation: &LeaveAllocation,
) -> Result<LeaveAllocation, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE
            leave_allocations
        SET
            allocated_days = ?,
            used_days = ?,
            remaining_days = ?,
            is_active = ?,
            expiry_date = ?,
            notes = ?,
            updated_at = ?,
            updated_by = ?
        WHERE
            id = ?
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as::<_, LeaveAllocation>(&query)
        .bind(&allocation.allocated_days)
        .bind(&allocation.used_days)
        .bind(&allocation.remaining_days)
        .bind(allocation.is_active)
        .bind(allocation.expiry_date)
        .bind(&allocation.notes)
        .bind(allocation.updated_at)
        .bind(&allocation.updated_by)
        .bind(allocation.id)
        .fetch_one(&mut *conn)
        .await
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM leave_allocations WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::database::models::{Employee, EmployeeInput, EmploymentStatus};

const COLUMNS: &str = r#"
    id,
    employee_number,
    first_name,
    last_name,
    email,
    phone,
    position,
    salary,
    hire_date,
    employment_status,
    department_id,
    created_at,
    created_by,
    updated_at,
    updated_by
"#;

pub async fn insert(
    conn: &mut SqliteConnection,
    input: EmployeeInput,
    created_by: &str,
) -> Result<Employee, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO
            employees (
                id,
                employee_number,
                first_name,
                last_name,
                email,
                phone,
                position,
                salary,
                hire_date,
                employment_status,
                department_id,
                created_at,
                created_by
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as::<_, Employee>(&query)
        .bind(Uuid::new_v4())
        .bind(input.employee_number)
        .bind(input.first_name)
        .bind(input.last_name)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.position)
        .bind(input.salary)
        .bind(input.hire_date)
        .bind(input.employment_status)
        .bind(input.department_id)
        .bind(Utc::now())
        .bind(created_by)
        .fetch_one(&mut *conn)
        .await
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<Employee>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM employees WHERE id = ?");
    sqlx::query_as::<_, Employee>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn exists(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM employees")
        .fetch_one(&mut *conn)
        .await
}

pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<Employee>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM employees ORDER BY last_name, first_name");
    sqlx::query_as::<_, Employee>(&query)
        .fetch_all(&mut *conn)
        .await
}

pub async fn list_by_department(
    conn: &mut SqliteConnection,
    department_id: Uuid,
) -> Result<Vec<Employee>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM employees WHERE department_id = ? ORDER BY last_name, first_name"
    );
    sqlx::query_as::<_, Employee>(&query)
        .bind(department_id)
        .fetch_all(&mut *conn)
        .await
}

pub async fn list_by_status(
    conn: &mut SqliteConnection,
    status: EmploymentStatus,
) -> Result<Vec<Employee>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM employees WHERE employment_status = ? ORDER BY last_name, first_name"
    );
    sqlx::query_as::<_, Employee>(&query)
        .bind(status)
        .fetch_all(&mut *conn)
        .await
}

pub async fn email_taken(
    conn: &mut SqliteConnection,
    email: &str,
    exclude_id: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM employees WHERE email = ? AND (? IS NULL OR id <> ?)",
    )
    .bind(email)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count > 0)
}

pub async fn employee_number_taken(
    conn: &mut SqliteConnection,
    employee_number: &str,
    exclude_id: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM employees WHERE employee_number = ? AND (? IS NULL OR id <> ?)",
    )
    .bind(employee_number)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count > 0)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: Uuid,
    input: EmployeeInput,
    updated_by: &str,
) -> Result<Option<Employee>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE
            employees
        SET
            employee_number = ?,
            first_name = ?,
            last_name = ?,
            email = ?,
            phone = ?,
            position = ?,
            salary = ?,
            hire_date = ?,
            employment_status = ?,
            department_id = ?,
            updated_at = ?,
            updated_by = ?
        WHERE
            id = ?
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as::<_, Employee>(&query)
        .bind(input.employee_number)
        .bind(input.first_name)
        .bind(input.last_name)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.position)
        .bind(input.salary)
        .bind(input.hire_date)
        .bind(input.employment_status)
        .bind(input.department_id)
        .bind(Utc::now())
        .bind(updated_by)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Number of leave requests and allocations that still point at the employee.
pub async fn count_leave_records(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT
            (SELECT COUNT(*) FROM leave_requests WHERE employee_id = ?)
            + (SELECT COUNT(*) FROM leave_allocations WHERE employee_id = ?)
        "#,
    )
    .bind(id)
    .bind(id)
    .fetch_one(&mut *conn)
    .await
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

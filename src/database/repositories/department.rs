use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::database::models::{Department, DepartmentInput};

const COLUMNS: &str = r#"
    id,
    name,
    code,
    description,
    manager_id,
    is_active,
    created_at,
    created_by,
    updated_at,
    updated_by
"#;

pub async fn insert(
    conn: &mut SqliteConnection,
    input: DepartmentInput,
    created_by: &str,
) -> Result<Department, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO
            departments (
                id,
                name,
                code,
                description,
                manager_id,
                is_active,
                created_at,
                created_by
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as::<_, Department>(&query)
        .bind(Uuid::new_v4())
        .bind(input.name)
        .bind(input.code)
        .bind(input.description)
        .bind(input.manager_id)
        .bind(input.is_active)
        .bind(Utc::now())
        .bind(created_by)
        .fetch_one(&mut *conn)
        .await
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<Department>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM departments WHERE id = ?");
    sqlx::query_as::<_, Department>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn find_by_code(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<Option<Department>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM departments WHERE code = ?");
    sqlx::query_as::<_, Department>(&query)
        .bind(code)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<Department>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM departments ORDER BY name");
    sqlx::query_as::<_, Department>(&query)
        .fetch_all(&mut *conn)
        .await
}

/// Is `code` used by a department other than `exclude_id`?
pub async fn code_taken(
    conn: &mut SqliteConnection,
    code: &str,
    exclude_id: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT
            COUNT(*)
        FROM
            departments
        WHERE
            code = ?
            AND (? IS NULL OR id <> ?)
        "#,
    )
    .bind(code)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count > 0)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: Uuid,
    input: DepartmentInput,
    updated_by: &str,
) -> Result<Option<Department>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE
            departments
        SET
            name = ?,
            code = ?,
            description = ?,
            manager_id = ?,
            is_active = ?,
            updated_at = ?,
            updated_by = ?
        WHERE
            id = ?
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as::<_, Department>(&query)
        .bind(input.name)
        .bind(input.code)
        .bind(input.description)
        .bind(input.manager_id)
        .bind(input.is_active)
        .bind(Utc::now())
        .bind(updated_by)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn count_employees(conn: &mut SqliteConnection, id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE department_id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::database::models::{LeaveType, LeaveTypeInput};

const COLUMNS: &str = r#"
    id,
    name,
    code,
    description,
    default_days,
    is_paid,
    requires_approval,
    max_consecutive_days,
    min_notice_days,
    is_active,
    gender,
    created_at,
    created_by,
    updated_at,
    updated_by
"#;

pub async fn insert(
    conn: &mut SqliteConnection,
    input: LeaveTypeInput,
    created_by: &str,
) -> Result<LeaveType, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO
            leave_types (
                id,
                name,
                code,
                description,
                default_days,
                is_paid,
                requires_approval,
                max_consecutive_days,
                min_notice_days,
                is_active,
                gender,
                created_at,
                created_by
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as::<_, LeaveType>(&query)
        .bind(Uuid::new_v4())
        .bind(input.name)
        .bind(input.code)
        .bind(input.description)
        .bind(input.default_days)
        .bind(input.is_paid)
        .bind(input.requires_approval)
        .bind(input.max_consecutive_days)
        .bind(input.min_notice_days)
        .bind(input.is_active)
        .bind(input.gender)
        .bind(Utc::now())
        .bind(created_by)
        .fetch_one(&mut *conn)
        .await
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<LeaveType>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM leave_types WHERE id = ?");
    sqlx::query_as::<_, LeaveType>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn find_by_code(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<Option<LeaveType>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM leave_types WHERE code = ?");
    sqlx::query_as::<_, LeaveType>(&query)
        .bind(code)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<LeaveType>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM leave_types ORDER BY name");
    sqlx::query_as::<_, LeaveType>(&query)
        .fetch_all(&mut *conn)
        .await
}

pub async fn list_active(conn: &mut SqliteConnection) -> Result<Vec<LeaveType>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM leave_types WHERE is_active = 1 ORDER BY name");
    sqlx::query_as::<_, LeaveType>(&query)
        .fetch_all(&mut *conn)
        .await
}

/// Is `code` used by a leave type other than `exclude_id`?
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
            leave_types
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
    input: LeaveTypeInput,
    updated_by: &str,
) -> Result<Option<LeaveType>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE
            leave_types
        SET
            name = ?,
            code = ?,
            description = ?,
            default_days = ?,
            is_paid = ?,
            requires_approval = ?,
            max_consecutive_days = ?,
            min_notice_days = ?,
            is_active = ?,
            gender = ?,
            updated_at = ?,
            updated_by = ?
        WHERE
            id = ?
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as::<_, LeaveType>(&query)
        .bind(input.name)
        .bind(input.code)
        .bind(input.description)
        .bind(input.default_days)
        .bind(input.is_paid)
        .bind(input.requires_approval)
        .bind(input.max_consecutive_days)
        .bind(input.min_notice_days)
        .bind(input.is_active)
        .bind(input.gender)
        .bind(Utc::now())
        .bind(updated_by)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Is the leave type referenced by any request or allocation?
pub async fn is_in_use(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT
            (SELECT COUNT(*) FROM leave_requests WHERE leave_type_id = ?)
            + (SELECT COUNT(*) FROM leave_allocations WHERE leave_type_id = ?)
        "#,
    )
    .bind(id)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count > 0)
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM leave_types WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

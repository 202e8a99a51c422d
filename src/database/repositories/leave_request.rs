use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::database::models::{LeaveRequest, LeaveRequestFilter, LeaveStatus};
use crate::database::types::Days;

const COLUMNS: &str = r#"
    id,
    employee_id,
    leave_type_id,
    start_date,
    end_date,
    total_days,
    reason,
    status,
    approved_by,
    approver_name,
    approved_at,
    approver_comments,
    rejection_reason,
    cancelled_at,
    cancellation_reason,
    attachment_path,
    created_at,
    created_by,
    updated_at,
    updated_by
"#;

pub async fn insert(
    conn: &mut SqliteConnection,
    request: &LeaveRequest,
) -> Result<LeaveRequest, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO
            leave_requests (
                id,
                employee_id,
                leave_type_id,
                start_date,
                end_date,
                total_days,
                reason,
                status,
                attachment_path,
                created_at,
                created_by
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as::<_, LeaveRequest>(&query)
        .bind(request.id)
        .bind(request.employee_id)
        .bind(request.leave_type_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.total_days)
        .bind(&request.reason)
        .bind(&request.status)
        .bind(&request.attachment_path)
        .bind(request.created_at)
        .bind(&request.created_by)
        .fetch_one(&mut *conn)
        .await
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<LeaveRequest>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM leave_requests WHERE id = ?");
    sqlx::query_as::<_, LeaveRequest>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Requests matching the filter. An employee's own history is listed by
/// start date, everything else by submission time, newest first.
pub async fn list(
    conn: &mut SqliteConnection,
    filter: &LeaveRequestFilter,
) -> Result<Vec<LeaveRequest>, sqlx::Error> {
    let mut query = format!("SELECT {COLUMNS} FROM leave_requests");
    let mut conditions = vec![];

    if filter.employee_id.is_some() {
        conditions.push("employee_id = ?");
    }
    if filter.status.is_some() {
        conditions.push("status = ?");
    }

    if !conditions.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&conditions.join(" AND "));
    }

    if filter.employee_id.is_some() && filter.status.is_none() {
        query.push_str(" ORDER BY start_date DESC, created_at DESC");
    } else {
        query.push_str(" ORDER BY created_at DESC");
    }

    let mut prepared = sqlx::query_as::<_, LeaveRequest>(&query);
    if let Some(employee_id) = filter.employee_id {
        prepared = prepared.bind(employee_id);
    }
    if let Some(status) = &filter.status {
        prepared = prepared.bind(status.clone());
    }

    prepared.fetch_all(&mut *conn).await
}

/// Writes back the mutable columns of a request.
pub async fn save(
    conn: &mut SqliteConnection,
    request: &LeaveRequest,
) -> Result<LeaveRequest, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE
            leave_requests
        SET
            start_date = ?,
            end_date = ?,
            total_days = ?,
            reason = ?,
            status = ?,
            approved_by = ?,
            approver_name = ?,
            approved_at = ?,
            approver_comments = ?,
            rejection_reason = ?,
            cancelled_at = ?,
            cancellation_reason = ?,
            attachment_path = ?,
            updated_at = ?,
            updated_by = ?
        WHERE
            id = ?
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as::<_, LeaveRequest>(&query)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.total_days)
        .bind(&request.reason)
        .bind(&request.status)
        .bind(request.approved_by)
        .bind(&request.approver_name)
        .bind(request.approved_at)
        .bind(&request.approver_comments)
        .bind(&request.rejection_reason)
        .bind(request.cancelled_at)
        .bind(&request.cancellation_reason)
        .bind(&request.attachment_path)
        .bind(request.updated_at)
        .bind(&request.updated_by)
        .bind(request.id)
        .fetch_one(&mut *conn)
        .await
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM leave_requests WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Days asked for in pending requests starting in `year`, keyed by leave type.
pub async fn pending_days_by_type(
    conn: &mut SqliteConnection,
    employee_id: Uuid,
    year: i32,
) -> Result<HashMap<Uuid, Days>, sqlx::Error> {
    let (Some(first_day), Some(last_day)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return Ok(HashMap::new());
    };

    let rows: Vec<(Uuid, Days)> = sqlx::query_as(
        r#"
        SELECT
            leave_type_id,
            total_days
        FROM
            leave_requests
        WHERE
            employee_id = ?
            AND status = ?
            AND start_date BETWEEN ? AND ?
        "#,
    )
    .bind(employee_id)
    .bind(LeaveStatus::Pending)
    .bind(first_day)
    .bind(last_day)
    .fetch_all(&mut *conn)
    .await?;

    // total_days is TEXT, so the sum happens here rather than in SQL
    let mut pending: HashMap<Uuid, Days> = HashMap::new();
    for (leave_type_id, days) in rows {
        let entry = pending.entry(leave_type_id).or_insert_with(Days::zero);
        *entry = &*entry + &days;
    }

    Ok(pending)
}

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::database::models::{EmployeeInformation, EmployeeInformationInput};

const COLUMNS: &str = r#"
    id,
    employee_id,
    address,
    city,
    state,
    postal_code,
    country,
    phone_number,
    mobile_number,
    date_of_birth,
    gender,
    marital_status,
    nationality,
    emergency_contact_name,
    emergency_contact_relationship,
    emergency_contact_phone,
    national_id,
    passport_number,
    tax_id,
    bank_name,
    bank_account_number,
    bank_routing_number,
    created_at,
    created_by,
    updated_at,
    updated_by
"#;

pub async fn insert(
    conn: &mut SqliteConnection,
    employee_id: Uuid,
    input: EmployeeInformationInput,
    created_by: &str,
) -> Result<EmployeeInformation, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO
            employee_information (
                id,
                employee_id,
                address,
                city,
                state,
                postal_code,
                country,
                phone_number,
                mobile_number,
                date_of_birth,
                gender,
                marital_status,
                nationality,
                emergency_contact_name,
                emergency_contact_relationship,
                emergency_contact_phone,
                national_id,
                passport_number,
                tax_id,
                bank_name,
                bank_account_number,
                bank_routing_number,
                created_at,
                created_by
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as::<_, EmployeeInformation>(&query)
        .bind(Uuid::new_v4())
        .bind(employee_id)
        .bind(input.address)
        .bind(input.city)
        .bind(input.state)
        .bind(input.postal_code)
        .bind(input.country)
        .bind(input.phone_number)
        .bind(input.mobile_number)
        .bind(input.date_of_birth)
        .bind(input.gender)
        .bind(input.marital_status)
        .bind(input.nationality)
        .bind(input.emergency_contact_name)
        .bind(input.emergency_contact_relationship)
        .bind(input.emergency_contact_phone)
        .bind(input.national_id)
        .bind(input.passport_number)
        .bind(input.tax_id)
        .bind(input.bank_name)
        .bind(input.bank_account_number)
        .bind(input.bank_routing_number)
        .bind(Utc::now())
        .bind(created_by)
        .fetch_one(&mut *conn)
        .await
}

pub async fn find_by_employee(
    conn: &mut SqliteConnection,
    employee_id: Uuid,
) -> Result<Option<EmployeeInformation>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM employee_information WHERE employee_id = ?");
    sqlx::query_as::<_, EmployeeInformation>(&query)
        .bind(employee_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn update_by_employee(
    conn: &mut SqliteConnection,
    employee_id: Uuid,
    input: EmployeeInformationInput,
    updated_by: &str,
) -> Result<Option<EmployeeInformation>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE
            employee_information
        SET
            address = ?,
            city = ?,
            state = ?,
            postal_code = ?,
            country = ?,
            phone_number = ?,
            mobile_number = ?,
            date_of_birth = ?,
            gender = ?,
            marital_status = ?,
            nationality = ?,
            emergency_contact_name = ?,
            emergency_contact_relationship = ?,
            emergency_contact_phone = ?,
            national_id = ?,
            passport_number = ?,
            tax_id = ?,
            bank_name = ?,
            bank_account_number = ?,
            bank_routing_number = ?,
            updated_at = ?,
            updated_by = ?
        WHERE
            employee_id = ?
        RETURNING {COLUMNS}
        "#
    );

    sqlx::query_as::<_, EmployeeInformation>(&query)
        .bind(input.address)
        .bind(input.city)
        .bind(input.state)
        .bind(input.postal_code)
        .bind(input.country)
        .bind(input.phone_number)
        .bind(input.mobile_number)
        .bind(input.date_of_birth)
        .bind(input.gender)
        .bind(input.marital_status)
        .bind(input.nationality)
        .bind(input.emergency_contact_name)
        .bind(input.emergency_contact_relationship)
        .bind(input.emergency_contact_phone)
        .bind(input.national_id)
        .bind(input.passport_number)
        .bind(input.tax_id)
        .bind(input.bank_name)
        .bind(input.bank_account_number)
        .bind(input.bank_routing_number)
        .bind(Utc::now())
        .bind(updated_by)
        .bind(employee_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn delete_by_employee(
    conn: &mut SqliteConnection,
    employee_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM employee_information WHERE employee_id = ?")
        .bind(employee_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

//! Reference data every installation needs, plus an optional set of sample
//! staff for demos. Both are safe to run repeatedly.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::begin_write;
use crate::database::models::{
    DepartmentInput, Employee, EmployeeInput, EmploymentStatus, Gender, LeaveTypeInput,
};
use crate::database::repositories::{department, employee, leave_type};
use crate::database::types::Money;
use crate::error::AppError;
use crate::services::caller::Caller;

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub departments_created: usize,
    pub leave_types_created: usize,
    pub employees_created: usize,
}

struct DepartmentSeed {
    code: &'static str,
    name: &'static str,
    description: &'static str,
}

const DEPARTMENTS: &[DepartmentSeed] = &[
    DepartmentSeed {
        code: "HR",
        name: "Human Resources",
        description: "Recruitment, employee relations and leave administration",
    },
    DepartmentSeed {
        code: "IT",
        name: "Information Technology",
        description: "Software development and infrastructure",
    },
    DepartmentSeed {
        code: "FIN",
        name: "Finance",
        description: "Accounting, payroll and budgeting",
    },
    DepartmentSeed {
        code: "OPS",
        name: "Operations",
        description: "Day-to-day business operations",
    },
];

struct LeaveTypeSeed {
    code: &'static str,
    name: &'static str,
    description: &'static str,
    default_days: i32,
    min_notice_days: i32,
    max_consecutive_days: i32,
    gender: Option<Gender>,
}

const LEAVE_TYPES: &[LeaveTypeSeed] = &[
    LeaveTypeSeed {
        code: "VL",
        name: "Vacation Leave",
        description: "Annual vacation leave",
        default_days: 15,
        min_notice_days: 7,
        max_consecutive_days: 15,
        gender: None,
    },
    LeaveTypeSeed {
        code: "SL",
        name: "Sick Leave",
        description: "Leave for illness or medical appointments",
        default_days: 10,
        min_notice_days: 0,
        max_consecutive_days: 30,
        gender: None,
    },
    LeaveTypeSeed {
        code: "ML",
        name: "Maternity Leave",
        description: "Leave for maternity",
        default_days: 90,
        min_notice_days: 30,
        max_consecutive_days: 120,
        gender: Some(Gender::Female),
    },
];

struct EmployeeSeed {
    number: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    position: &'static str,
    salary: i32,
    hired: (i32, u32, u32),
    department: &'static str,
}

const SAMPLE_EMPLOYEES: &[EmployeeSeed] = &[
    EmployeeSeed {
        number: "EMP-2026-001",
        first_name: "John",
        last_name: "Anderson",
        position: "HR Manager",
        salary: 75_000,
        hired: (2020, 1, 15),
        department: "HR",
    },
    EmployeeSeed {
        number: "EMP-2026-002",
        first_name: "Sarah",
        last_name: "Johnson",
        position: "Senior Software Engineer",
        salary: 95_000,
        hired: (2019, 6, 20),
        department: "IT",
    },
    EmployeeSeed {
        number: "EMP-2026-003",
        first_name: "Michael",
        last_name: "Smith",
        position: "Software Engineer",
        salary: 85_000,
        hired: (2021, 3, 10),
        department: "IT",
    },
    EmployeeSeed {
        number: "EMP-2026-004",
        first_name: "Emma",
        last_name: "Williams",
        position: "Finance Analyst",
        salary: 65_000,
        hired: (2022, 1, 5),
        department: "FIN",
    },
    EmployeeSeed {
        number: "EMP-2026-005",
        first_name: "David",
        last_name: "Brown",
        position: "Operations Manager",
        salary: 72_000,
        hired: (2020, 7, 12),
        department: "OPS",
    },
];

/// Inserts the standard departments and leave types that are not there yet.
pub async fn seed_reference_data(
    pool: &SqlitePool,
    caller: &Caller,
) -> Result<SeedReport, AppError> {
    let mut report = SeedReport::default();
    let mut tx = begin_write(pool).await?;

    for seed in DEPARTMENTS {
        if department::find_by_code(&mut tx, seed.code).await?.is_some() {
            continue;
        }
        department::insert(
            &mut tx,
            DepartmentInput {
                name: seed.name.to_string(),
                code: seed.code.to_string(),
                description: Some(seed.description.to_string()),
                manager_id: None,
                is_active: true,
            },
            &caller.name,
        )
        .await?;
        report.departments_created += 1;
    }

    for seed in LEAVE_TYPES {
        if leave_type::find_by_code(&mut tx, seed.code).await?.is_some() {
            continue;
        }
        leave_type::insert(
            &mut tx,
            LeaveTypeInput {
                name: seed.name.to_string(),
                code: seed.code.to_string(),
                description: Some(seed.description.to_string()),
                default_days: seed.default_days,
                is_paid: true,
                requires_approval: true,
                max_consecutive_days: Some(seed.max_consecutive_days),
                min_notice_days: Some(seed.min_notice_days),
                is_active: true,
                gender: seed.gender.clone(),
            },
            &caller.name,
        )
        .await?;
        report.leave_types_created += 1;
    }

    tx.commit().await?;

    log::info!(
        "Reference data seeded: {} departments, {} leave types",
        report.departments_created,
        report.leave_types_created
    );
    Ok(report)
}

/// Adds five sample employees, one or two per department. Does nothing when
/// any employee already exists. Requires the reference departments.
pub async fn seed_sample_employees(
    pool: &SqlitePool,
    caller: &Caller,
) -> Result<Vec<Employee>, AppError> {
    let mut tx = begin_write(pool).await?;

    if employee::count(&mut tx).await? > 0 {
        log::info!("Employees already present, skipping sample staff");
        return Ok(Vec::new());
    }

    let mut created = Vec::with_capacity(SAMPLE_EMPLOYEES.len());
    for seed in SAMPLE_EMPLOYEES {
        let department = department::find_by_code(&mut tx, seed.department)
            .await?
            .ok_or_else(|| {
                AppError::invalid_operation(format!(
                    "Department {} must be seeded before sample employees",
                    seed.department
                ))
            })?;
        let (year, month, day) = seed.hired;
        let hire_date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            AppError::internal_server_error_message(format!(
                "Invalid hire date for {}",
                seed.number
            ))
        })?;

        let input = EmployeeInput {
            employee_number: seed.number.to_string(),
            first_name: seed.first_name.to_string(),
            last_name: seed.last_name.to_string(),
            email: format!(
                "{}.{}@company.com",
                seed.first_name.to_lowercase(),
                seed.last_name.to_lowercase()
            ),
            phone: None,
            position: seed.position.to_string(),
            salary: Money::from(seed.salary),
            hire_date,
            employment_status: EmploymentStatus::Active,
            department_id: department.id,
        };
        created.push(employee::insert(&mut tx, input, &caller.name).await?);
    }

    tx.commit().await?;

    log::info!("Seeded {} sample employees", created.len());
    Ok(created)
}

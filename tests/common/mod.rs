#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName};
use sqlx::SqlitePool;
use std::env;
use std::str::FromStr;
use tempfile::TempDir;
use uuid::Uuid;

use hris::database::init_database;
use hris::database::models::*;
use hris::database::types::{Days, Money};
use hris::{AppState, Caller};

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn days(value: &str) -> Days {
    Days::from_str(value).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

// Test database wrapper
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());
        let pool = init_database(&database_url, 5).await?;

        Ok(TestDb {
            pool,
            _temp_dir: temp_dir,
        })
    }
}

/// A migrated database, the services over it and an HR caller.
pub struct TestContext {
    pub db: TestDb,
    pub state: AppState,
    pub hr: Caller,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        setup_test_env();

        let db = TestDb::new().await?;
        let state = AppState::new(db.pool.clone());
        let hr = Caller::hr(Uuid::new_v4(), "Hannah HR");

        Ok(TestContext { db, state, hr })
    }

    pub async fn department(&self) -> Department {
        self.state
            .staff
            .create_department(&self.hr, MockData::department())
            .await
            .unwrap()
    }

    pub async fn employee(&self) -> Employee {
        let department = self.department().await;
        self.employee_in(department.id).await
    }

    pub async fn employee_in(&self, department_id: Uuid) -> Employee {
        self.state
            .staff
            .create_employee(&self.hr, MockData::employee(department_id))
            .await
            .unwrap()
    }

    pub async fn leave_type(&self, code: &str, default_days: i32) -> LeaveType {
        self.state
            .leave_types
            .create(&self.hr, MockData::leave_type(code, default_days))
            .await
            .unwrap()
    }

    pub async fn allocation(
        &self,
        employee_id: Uuid,
        leave_type_id: Uuid,
        year: i32,
        allocated: &str,
    ) -> LeaveAllocation {
        self.state
            .leave_ledger
            .create_allocation(
                &self.hr,
                MockData::allocation(employee_id, leave_type_id, year, allocated),
            )
            .await
            .unwrap()
    }

    /// Employee, one leave type and an allocation of `allocated` days for 2026.
    pub async fn funded_employee(&self, allocated: &str) -> (Employee, LeaveType, LeaveAllocation) {
        let employee = self.employee().await;
        let leave_type = self.leave_type("VL", 15).await;
        let allocation = self
            .allocation(employee.id, leave_type.id, 2026, allocated)
            .await;
        (employee, leave_type, allocation)
    }

    pub fn caller_for(&self, employee: &Employee) -> Caller {
        Caller::employee(employee.id, employee.full_name())
    }
}

// Mock data generators
pub struct MockData;

impl MockData {
    pub fn department() -> DepartmentInput {
        let code = format!("D{}", &Uuid::new_v4().simple().to_string()[..6]).to_uppercase();
        DepartmentInput {
            name: format!("{} Department", LastName().fake::<String>()),
            code,
            description: Some(Sentence(3..6).fake()),
            manager_id: None,
            is_active: true,
        }
    }

    pub fn employee(department_id: Uuid) -> EmployeeInput {
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();
        let tag = Uuid::new_v4().simple().to_string();

        EmployeeInput {
            employee_number: format!("EMP-{}", &tag[..8]),
            email: format!(
                "{}.{}.{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                &tag[..6]
            ),
            first_name,
            last_name,
            phone: None,
            position: "Analyst".to_string(),
            salary: Money::from((40_000..120_000).fake::<i32>()),
            hire_date: date(2021, 4, 1),
            employment_status: EmploymentStatus::Active,
            department_id,
        }
    }

    pub fn leave_type(code: &str, default_days: i32) -> LeaveTypeInput {
        LeaveTypeInput {
            name: format!("{} Leave", code),
            code: code.to_string(),
            description: None,
            default_days,
            is_paid: true,
            requires_approval: true,
            max_consecutive_days: None,
            min_notice_days: None,
            is_active: true,
            gender: None,
        }
    }

    pub fn allocation(
        employee_id: Uuid,
        leave_type_id: Uuid,
        year: i32,
        allocated: &str,
    ) -> LeaveAllocationInput {
        LeaveAllocationInput {
            employee_id,
            leave_type_id,
            year,
            allocated_days: days(allocated),
            expiry_date: None,
            notes: None,
        }
    }

    pub fn leave_request(
        employee_id: Uuid,
        leave_type_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total: &str,
    ) -> LeaveRequestInput {
        LeaveRequestInput {
            employee_id,
            leave_type_id,
            start_date,
            end_date,
            total_days: days(total),
            reason: Sentence(3..8).fake(),
            attachment_path: None,
        }
    }

    pub fn employee_information() -> EmployeeInformationInput {
        EmployeeInformationInput {
            city: Some("Springfield".to_string()),
            country: Some("US".to_string()),
            phone_number: "+1-555-0100".to_string(),
            date_of_birth: date(1990, 5, 17),
            gender: Some(Gender::Female),
            emergency_contact_name: format!(
                "{} {}",
                FirstName().fake::<String>(),
                LastName().fake::<String>()
            ),
            emergency_contact_relationship: "Sibling".to_string(),
            emergency_contact_phone: "+1-555-0101".to_string(),
            ..Default::default()
        }
    }
}

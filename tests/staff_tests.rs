use pretty_assertions::assert_eq;
use uuid::Uuid;

use hris::database::models::*;
use hris::database::types::Money;

mod common;
use common::{MockData, TestContext, date};

#[tokio::test]
async fn test_department_lifecycle() {
    let ctx = TestContext::new().await.unwrap();
    let staff = &ctx.state.staff;

    let created = staff
        .create_department(
            &ctx.hr,
            DepartmentInput {
                name: "Legal".to_string(),
                code: "LEG".to_string(),
                description: None,
                manager_id: None,
                is_active: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.created_by, "Hannah HR");

    let duplicate = staff
        .create_department(
            &ctx.hr,
            DepartmentInput {
                name: "Legal Affairs".to_string(),
                code: "LEG".to_string(),
                description: None,
                manager_id: None,
                is_active: true,
            },
        )
        .await
        .unwrap_err();
    assert!(duplicate.is_invalid_operation());

    let manager = ctx.employee_in(created.id).await;
    let updated = staff
        .update_department(
            &ctx.hr,
            created.id,
            DepartmentInput {
                name: "Legal & Compliance".to_string(),
                code: "LEG".to_string(),
                description: Some("Contracts and compliance".to_string()),
                manager_id: Some(manager.id),
                is_active: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.manager_id, Some(manager.id));
    assert_eq!(
        staff.find_department_by_code("LEG").await.unwrap().map(|d| d.name),
        Some("Legal & Compliance".to_string())
    );

    let occupied = staff.delete_department(&ctx.hr, created.id).await.unwrap_err();
    assert!(occupied.is_invalid_operation());

    staff.delete_employee(&ctx.hr, manager.id).await.unwrap();
    staff.delete_department(&ctx.hr, created.id).await.unwrap();
    assert!(staff.get_department(created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_employee_uniqueness_and_references() {
    let ctx = TestContext::new().await.unwrap();
    let staff = &ctx.state.staff;
    let department = ctx.department().await;
    let existing = ctx.employee_in(department.id).await;

    let mut same_email = MockData::employee(department.id);
    same_email.email = existing.email.clone();
    let err = staff.create_employee(&ctx.hr, same_email).await.unwrap_err();
    assert!(err.is_invalid_operation());
    assert!(err.to_string().contains("Email"));

    let mut same_number = MockData::employee(department.id);
    same_number.employee_number = existing.employee_number.clone();
    let err = staff.create_employee(&ctx.hr, same_number).await.unwrap_err();
    assert!(err.is_invalid_operation());
    assert!(err.to_string().contains("Employee number"));

    let err = staff
        .create_employee(&ctx.hr, MockData::employee(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_employee_update_and_listing() {
    let ctx = TestContext::new().await.unwrap();
    let staff = &ctx.state.staff;
    let it = ctx.department().await;
    let ops = ctx.department().await;
    let employee = ctx.employee_in(it.id).await;
    ctx.employee_in(it.id).await;

    let mut change = MockData::employee(ops.id);
    change.employee_number = employee.employee_number.clone();
    change.email = employee.email.clone();
    change.salary = Money::from(99_500);
    change.employment_status = EmploymentStatus::OnLeave;
    let updated = staff.update_employee(&ctx.hr, employee.id, change).await.unwrap();
    assert_eq!(updated.department_id, ops.id);
    assert_eq!(updated.salary, Money::from(99_500));
    assert_eq!(updated.employment_status, EmploymentStatus::OnLeave);

    assert_eq!(staff.employees_in_department(it.id).await.unwrap().len(), 1);
    assert_eq!(staff.employees_in_department(ops.id).await.unwrap().len(), 1);
    assert_eq!(staff.list_employees().await.unwrap().len(), 2);
    assert_eq!(staff.list_active_employees().await.unwrap().len(), 1);

    let err = staff
        .update_employee(&ctx.hr, Uuid::new_v4(), MockData::employee(ops.id))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_employee_with_leave_history_is_kept() {
    let ctx = TestContext::new().await.unwrap();
    let (employee, _, _) = ctx.funded_employee("15").await;

    let err = ctx
        .state
        .staff
        .delete_employee(&ctx.hr, employee.id)
        .await
        .unwrap_err();
    assert!(err.is_invalid_operation());
}

#[tokio::test]
async fn test_employee_information() {
    let ctx = TestContext::new().await.unwrap();
    let staff = &ctx.state.staff;
    let employee = ctx.employee().await;

    let created = staff
        .create_employee_information(&ctx.hr, employee.id, MockData::employee_information())
        .await
        .unwrap();
    assert_eq!(created.employee_id, employee.id);
    assert_eq!(created.date_of_birth, date(1990, 5, 17));
    assert_eq!(created.gender, Some(Gender::Female));

    let again = staff
        .create_employee_information(&ctx.hr, employee.id, MockData::employee_information())
        .await
        .unwrap_err();
    assert!(again.is_invalid_operation());

    let mut change = MockData::employee_information();
    change.bank_name = Some("First Savings".to_string());
    change.marital_status = Some("Married".to_string());
    let updated = staff
        .update_employee_information(&ctx.hr, employee.id, change)
        .await
        .unwrap();
    assert_eq!(updated.bank_name.as_deref(), Some("First Savings"));
    assert_eq!(
        staff
            .get_employee_information(employee.id)
            .await
            .unwrap()
            .marital_status
            .as_deref(),
        Some("Married")
    );

    // Removing the employee takes the personal information along
    staff.delete_employee(&ctx.hr, employee.id).await.unwrap();
    assert!(
        staff
            .get_employee_information(employee.id)
            .await
            .unwrap_err()
            .is_not_found()
    );

    let err = staff
        .create_employee_information(&ctx.hr, employee.id, MockData::employee_information())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_employee_information() {
    let ctx = TestContext::new().await.unwrap();
    let staff = &ctx.state.staff;
    let employee = ctx.employee().await;

    staff
        .create_employee_information(&ctx.hr, employee.id, MockData::employee_information())
        .await
        .unwrap();
    staff
        .delete_employee_information(&ctx.hr, employee.id)
        .await
        .unwrap();

    let err = staff
        .delete_employee_information(&ctx.hr, employee.id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

use pretty_assertions::assert_eq;
use uuid::Uuid;

use hris::database::models::*;

mod common;
use common::{MockData, TestContext, date, days};

#[tokio::test]
async fn test_create_allocation() {
    let ctx = TestContext::new().await.unwrap();
    let employee = ctx.employee().await;
    let vl = ctx.leave_type("VL", 15).await;

    let allocation = ctx
        .state
        .leave_ledger
        .create_allocation(
            &ctx.hr,
            LeaveAllocationInput {
                employee_id: employee.id,
                leave_type_id: vl.id,
                year: 2026,
                allocated_days: days("12.5"),
                expiry_date: Some(date(2026, 12, 31)),
                notes: Some("Pro-rated".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(allocation.allocated_days, days("12.5"));
    assert_eq!(allocation.used_days, days("0"));
    assert_eq!(allocation.remaining_days, days("12.5"));
    assert!(allocation.is_active);
    assert_eq!(allocation.expiry_date, Some(date(2026, 12, 31)));
    assert_eq!(allocation.created_by, "Hannah HR");
}

#[tokio::test]
async fn test_create_allocation_rejects_duplicates_and_bad_amounts() {
    let ctx = TestContext::new().await.unwrap();
    let ledger = &ctx.state.leave_ledger;
    let (employee, vl, _) = ctx.funded_employee("15").await;

    let duplicate = ledger
        .create_allocation(&ctx.hr, MockData::allocation(employee.id, vl.id, 2026, "5"))
        .await
        .unwrap_err();
    assert!(duplicate.is_invalid_operation());

    // A different year is a different allocation
    ledger
        .create_allocation(&ctx.hr, MockData::allocation(employee.id, vl.id, 2027, "5"))
        .await
        .unwrap();

    for bad in ["366", "-1", "1.125"] {
        let err = ledger
            .create_allocation(&ctx.hr, MockData::allocation(employee.id, vl.id, 2028, bad))
            .await
            .unwrap_err();
        assert!(err.is_invalid_operation(), "{} should be rejected", bad);
    }

    let boundary = ledger
        .create_allocation(&ctx.hr, MockData::allocation(employee.id, vl.id, 2028, "365"))
        .await
        .unwrap();
    assert_eq!(boundary.remaining_days, days("365"));
}

#[tokio::test]
async fn test_create_allocation_for_unknown_references() {
    let ctx = TestContext::new().await.unwrap();
    let ledger = &ctx.state.leave_ledger;
    let employee = ctx.employee().await;
    let vl = ctx.leave_type("VL", 15).await;

    let err = ledger
        .create_allocation(&ctx.hr, MockData::allocation(Uuid::new_v4(), vl.id, 2026, "5"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = ledger
        .create_allocation(
            &ctx.hr,
            MockData::allocation(employee.id, Uuid::new_v4(), 2026, "5"),
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_auto_allocate_is_idempotent() {
    let ctx = TestContext::new().await.unwrap();
    let ledger = &ctx.state.leave_ledger;
    let employee = ctx.employee().await;
    let vl = ctx.leave_type("VL", 15).await;
    let sl = ctx.leave_type("SL", 10).await;

    let mut retired = MockData::leave_type("OLD", 5);
    retired.is_active = false;
    ctx.state.leave_types.create(&ctx.hr, retired).await.unwrap();

    assert!(ledger.auto_allocate(&ctx.hr, employee.id, 2026).await.unwrap());

    let allocations = ledger
        .allocations_for_employee(employee.id, Some(2026))
        .await
        .unwrap();
    assert_eq!(allocations.len(), 2);
    for allocation in &allocations {
        let expected = if allocation.leave_type_id == vl.id {
            days("15")
        } else {
            assert_eq!(allocation.leave_type_id, sl.id);
            days("10")
        };
        assert_eq!(allocation.allocated_days, expected);
        assert_eq!(allocation.remaining_days, expected);
        assert_eq!(allocation.expiry_date, Some(date(2026, 12, 31)));
    }

    assert!(!ledger.auto_allocate(&ctx.hr, employee.id, 2026).await.unwrap());
    assert_eq!(
        ledger
            .allocations_for_employee(employee.id, Some(2026))
            .await
            .unwrap()
            .len(),
        2
    );

    // Only the new leave type is added later on
    ctx.leave_type("BL", 3).await;
    assert!(ledger.auto_allocate(&ctx.hr, employee.id, 2026).await.unwrap());
    assert_eq!(
        ledger
            .allocations_for_employee(employee.id, Some(2026))
            .await
            .unwrap()
            .len(),
        3
    );

    let err = ledger
        .auto_allocate(&ctx.hr, Uuid::new_v4(), 2026)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_auto_allocate_keeps_existing_manual_allocation() {
    let ctx = TestContext::new().await.unwrap();
    let ledger = &ctx.state.leave_ledger;
    let (employee, _, manual) = ctx.funded_employee("7").await;
    ctx.leave_type("SL", 10).await;

    assert!(ledger.auto_allocate(&ctx.hr, employee.id, 2026).await.unwrap());

    let kept = ledger.get_allocation(manual.id).await.unwrap();
    assert_eq!(kept.allocated_days, days("7"));
}

#[tokio::test]
async fn test_update_allocation_recomputes_without_clamping() {
    let ctx = TestContext::new().await.unwrap();
    let ledger = &ctx.state.leave_ledger;
    let (employee, vl, allocation) = ctx.funded_employee("10").await;

    let request = ledger
        .request_leave(
            &ctx.caller_for(&employee),
            MockData::leave_request(employee.id, vl.id, date(2026, 3, 2), date(2026, 3, 11), "8"),
        )
        .await
        .unwrap();
    ledger.approve(&ctx.hr, request.id, None).await.unwrap();

    let updated = ledger
        .update_allocation(
            &ctx.hr,
            allocation.id,
            LeaveAllocationUpdateInput {
                allocated_days: days("5"),
                is_active: true,
                expiry_date: Some(date(2026, 12, 31)),
                notes: Some("Reduced after transfer".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.used_days, days("8"));
    assert_eq!(updated.remaining_days, days("-3"));
    assert_eq!(updated.notes.as_deref(), Some("Reduced after transfer"));
    assert_eq!(updated.updated_by.as_deref(), Some("Hannah HR"));

    let err = ledger
        .update_allocation(
            &ctx.hr,
            Uuid::new_v4(),
            LeaveAllocationUpdateInput {
                allocated_days: days("5"),
                is_active: true,
                expiry_date: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_allocation_only_when_unused() {
    let ctx = TestContext::new().await.unwrap();
    let ledger = &ctx.state.leave_ledger;
    let (employee, vl, used) = ctx.funded_employee("10").await;
    let sl = ctx.leave_type("SL", 10).await;
    let unused = ctx.allocation(employee.id, sl.id, 2026, "10").await;

    let request = ledger
        .request_leave(
            &ctx.caller_for(&employee),
            MockData::leave_request(employee.id, vl.id, date(2026, 3, 2), date(2026, 3, 2), "1"),
        )
        .await
        .unwrap();
    ledger.approve(&ctx.hr, request.id, None).await.unwrap();

    let err = ledger.delete_allocation(&ctx.hr, used.id).await.unwrap_err();
    assert!(err.is_invalid_operation());

    ledger.delete_allocation(&ctx.hr, unused.id).await.unwrap();
    assert!(ledger.get_allocation(unused.id).await.unwrap_err().is_not_found());

    let err = ledger.delete_allocation(&ctx.hr, unused.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_allocation_listings() {
    let ctx = TestContext::new().await.unwrap();
    let ledger = &ctx.state.leave_ledger;
    let (employee, vl, _) = ctx.funded_employee("15").await;
    ctx.allocation(employee.id, vl.id, 2025, "12").await;
    let colleague = ctx.employee().await;
    ctx.allocation(colleague.id, vl.id, 2026, "15").await;

    let all = ledger.list_allocations().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all.last().map(|a| a.year), Some(2025));

    let mine = ledger
        .allocations_for_employee(employee.id, None)
        .await
        .unwrap();
    let years: Vec<i32> = mine.iter().map(|a| a.year).collect();
    assert_eq!(years, vec![2026, 2025]);

    let mine_2025 = ledger
        .allocations_for_employee(employee.id, Some(2025))
        .await
        .unwrap();
    assert_eq!(mine_2025.len(), 1);
    assert_eq!(mine_2025[0].allocated_days, days("12"));
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::macros::string_enum;
use crate::error::AppError;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum Role {
        Hr => "hr",
        Employee => "employee",
    }
}

/// Who is performing an operation.
///
/// Every mutating service call takes one of these; its `name` lands in the
/// `created_by`/`updated_by` audit columns and, for approvals, its `id` and
/// `name` are recorded as the approver. For an `Employee` caller `id` is the
/// employee's own id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caller {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

impl Caller {
    pub fn new(id: Uuid, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }

    pub fn hr(id: Uuid, name: impl Into<String>) -> Self {
        Self::new(id, name, Role::Hr)
    }

    pub fn employee(employee_id: Uuid, name: impl Into<String>) -> Self {
        Self::new(employee_id, name, Role::Employee)
    }

    pub fn is_hr(&self) -> bool {
        self.role == Role::Hr
    }

    /// Fails with `Forbidden` unless the caller holds one of `roles`.
    pub fn require_role(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            return Ok(());
        }

        log::warn!(
            "{} ({}) denied: role {} not in {:?}",
            self.name,
            self.id,
            self.role,
            roles
        );
        Err(AppError::Forbidden(format!(
            "Role {} is not allowed to perform this operation",
            self.role
        )))
    }

    /// HR can act on anyone; employees only on themselves.
    pub fn can_access_employee(&self, employee_id: Uuid) -> bool {
        self.is_hr() || self.id == employee_id
    }

    pub fn require_employee_access(&self, employee_id: Uuid) -> Result<(), AppError> {
        if self.can_access_employee(employee_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "{} cannot access records of employee {}",
                self.name, employee_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hr_passes_hr_only_checks() {
        let hr = Caller::hr(Uuid::new_v4(), "Hannah HR");
        assert!(hr.require_role(&[Role::Hr]).is_ok());
        assert!(hr.can_access_employee(Uuid::new_v4()));
    }

    #[test]
    fn employee_is_limited_to_own_records() {
        let me = Uuid::new_v4();
        let caller = Caller::employee(me, "Eli Employee");

        assert!(caller.can_access_employee(me));
        assert!(!caller.can_access_employee(Uuid::new_v4()));
        assert!(matches!(
            caller.require_employee_access(Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            caller.require_role(&[Role::Hr]),
            Err(AppError::Forbidden(_))
        ));
        assert!(caller.require_role(&[Role::Hr, Role::Employee]).is_ok());
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("HR".parse::<Role>(), Ok(Role::Hr));
        assert_eq!(" employee ".parse::<Role>(), Ok(Role::Employee));
        assert!("manager".parse::<Role>().is_err());
    }
}

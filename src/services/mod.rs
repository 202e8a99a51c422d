pub mod caller;
pub mod leave_ledger;
pub mod leave_types;
pub mod staff;

pub use caller::{Caller, Role};
pub use leave_ledger::LeaveLedger;
pub use leave_types::LeaveTypeService;
pub use staff::StaffService;

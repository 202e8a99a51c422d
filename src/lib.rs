pub mod config;
pub mod database;
pub mod error;
pub mod services;

use sqlx::SqlitePool;

pub use config::Config;
pub use error::AppError;
pub use services::{Caller, LeaveLedger, LeaveTypeService, Role, StaffService};

/// The services sharing one pool.
#[derive(Clone)]
pub struct AppState {
    pub leave_ledger: LeaveLedger,
    pub leave_types: LeaveTypeService,
    pub staff: StaffService,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            leave_ledger: LeaveLedger::new(pool.clone()),
            leave_types: LeaveTypeService::new(pool.clone()),
            staff: StaffService::new(pool),
        }
    }
}

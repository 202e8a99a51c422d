//! Plain SQL over a single connection.
//!
//! Every function takes `&mut SqliteConnection` so callers decide whether it
//! runs on a pooled connection or inside a transaction.

pub mod department;
pub mod employee;
pub mod employee_information;
pub mod leave_allocation;
pub mod leave_request;
pub mod leave_type;

pub mod balance;
pub mod department;
pub mod employee;
pub mod employee_information;
pub mod leave_allocation;
pub mod leave_request;
pub mod leave_type;
pub(crate) mod macros;

// Re-export all models for easy importing
pub use balance::*;
pub use department::*;
pub use employee::*;
pub use employee_information::*;
pub use leave_allocation::*;
pub use leave_request::*;
pub use leave_type::*;

//! Employees domain module.
//!
//! Employee entities and the observable roster the employee list is rendered
//! from. Pure domain logic: no UI, no storage.

pub mod employee;
pub mod roster;

pub use employee::{Employee, EmployeeId};
pub use roster::{EmployeeRoster, RosterObserver, RowOrder, SubscriptionId};

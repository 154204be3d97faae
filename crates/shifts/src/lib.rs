//! Work shifts domain module.
//!
//! Work shift entities and the per-employee shift log (clock in / clock out).

pub mod shift_log;
pub mod work_shift;

pub use shift_log::ShiftLog;
pub use work_shift::{WorkShift, WorkShiftId};

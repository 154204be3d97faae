//! Per-employee shift list with clock in / clock out.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

use timeclock_core::{DomainError, DomainResult, IdGenerator, IdScheme, RandomIdGenerator};
use timeclock_employees::EmployeeId;

use crate::work_shift::{WorkShift, WorkShiftId};

/// In-memory log of work shifts for all employees.
pub struct ShiftLog {
    shifts: RwLock<Vec<WorkShift>>,
    generator: Box<dyn IdGenerator>,
}

impl ShiftLog {
    pub fn new() -> Self {
        Self::with_generator(Box::new(RandomIdGenerator))
    }

    pub fn with_scheme(scheme: IdScheme) -> Self {
        Self::with_generator(scheme.generator())
    }

    pub fn with_generator(generator: Box<dyn IdGenerator>) -> Self {
        Self {
            shifts: RwLock::new(Vec::new()),
            generator,
        }
    }

    /// Open a shift for `employee_id`. At most one shift per employee may be open.
    pub fn clock_in(&self, employee_id: EmployeeId, at: DateTime<Utc>) -> DomainResult<WorkShiftId> {
        let mut shifts = self.write()?;
        if shifts
            .iter()
            .any(|s| s.employee_id() == employee_id && s.is_open())
        {
            return Err(DomainError::conflict(format!(
                "employee {employee_id} is already clocked in"
            )));
        }

        let shift = WorkShift::start_with(employee_id, at, &self.generator);
        let shift_id = shift.shift_id();
        tracing::debug!(%employee_id, %shift_id, "clocked in");
        shifts.push(shift);
        Ok(shift_id)
    }

    /// Close the open shift of `employee_id`.
    pub fn clock_out(&self, employee_id: EmployeeId, at: DateTime<Utc>) -> DomainResult<WorkShiftId> {
        let mut shifts = self.write()?;
        let shift = shifts
            .iter_mut()
            .find(|s| s.employee_id() == employee_id && s.is_open())
            .ok_or_else(DomainError::not_found)?;

        shift.close(at)?;
        let shift_id = shift.shift_id();
        tracing::debug!(%employee_id, %shift_id, "clocked out");
        Ok(shift_id)
    }

    /// Insert a shift, or replace the one with the same id.
    ///
    /// A stored closed shift may only be replaced by one with the same end,
    /// and an employee never ends up with more than one open shift.
    pub fn record(&self, shift: WorkShift) -> DomainResult<()> {
        let mut shifts = self.write()?;
        let shift_id = shift.shift_id();
        let employee_id = shift.employee_id();
        let existing = shifts.iter().position(|s| s.shift_id() == shift_id);

        if let Some(index) = existing {
            let stored = &shifts[index];
            if !stored.is_open() && stored.end_time() != shift.end_time() {
                return Err(DomainError::conflict(format!(
                    "work shift {shift_id} is already closed"
                )));
            }
        }

        if shift.is_open()
            && shifts.iter().any(|s| {
                s.shift_id() != shift_id && s.employee_id() == employee_id && s.is_open()
            })
        {
            return Err(DomainError::conflict(format!(
                "employee {employee_id} is already clocked in"
            )));
        }

        match existing {
            Some(index) => shifts[index] = shift,
            None => shifts.push(shift),
        }
        tracing::debug!(%employee_id, %shift_id, "shift recorded");
        Ok(())
    }

    /// Shifts of one employee, earliest first.
    pub fn shifts_for(&self, employee_id: EmployeeId) -> Vec<WorkShift> {
        let shifts = match self.shifts.read() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut out: Vec<WorkShift> = shifts
            .iter()
            .filter(|s| s.employee_id() == employee_id)
            .cloned()
            .collect();
        out.sort_by_key(|s| s.start_time());
        out
    }

    pub fn open_shift(&self, employee_id: EmployeeId) -> Option<WorkShift> {
        let shifts = self.shifts.read().ok()?;
        shifts
            .iter()
            .find(|s| s.employee_id() == employee_id && s.is_open())
            .cloned()
    }

    /// Total time worked by `employee_id`, counting an open shift up to `now`.
    pub fn total_worked(&self, employee_id: EmployeeId, now: DateTime<Utc>) -> Duration {
        self.shifts_for(employee_id)
            .iter()
            .fold(Duration::zero(), |acc, s| acc + s.duration(now))
    }

    fn write(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, Vec<WorkShift>>> {
        self.shifts.write().map_err(|_| {
            tracing::warn!("shift log lock poisoned");
            DomainError::invariant("shift log lock poisoned")
        })
    }
}

impl Default for ShiftLog {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ShiftLog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let count = self.shifts.read().map(|s| s.len()).unwrap_or(0);
        f.debug_struct("ShiftLog")
            .field("shifts", &count)
            .finish_non_exhaustive()
    }
}

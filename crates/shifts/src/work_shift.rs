use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use timeclock_core::{DomainError, DomainResult, EntityId, IdGenerator, Identified, Identity};
use timeclock_employees::EmployeeId;

/// Work shift identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkShiftId(pub EntityId);

impl core::fmt::Display for WorkShiftId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A span of work by one employee. Open until `close` sets its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkShift {
    identity: Identity,
    employee_id: EmployeeId,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
}

impl WorkShift {
    /// Open a shift for `employee_id` starting at `at`.
    pub fn start(employee_id: EmployeeId, at: DateTime<Utc>) -> Self {
        Self::start_with(employee_id, at, &timeclock_core::RandomIdGenerator)
    }

    pub fn start_with<G>(employee_id: EmployeeId, at: DateTime<Utc>, generator: &G) -> Self
    where
        G: IdGenerator + ?Sized,
    {
        Self {
            identity: Identity::generate_with(generator),
            employee_id,
            start: at,
            end: None,
        }
    }

    /// Rebuild a stored shift.
    pub fn restore(
        id: Option<Uuid>,
        employee_id: EmployeeId,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> DomainResult<Self> {
        let identity = Identity::try_from_uuid(id)?;
        if let Some(end) = end {
            ensure_not_before(start, end)?;
        }
        Ok(Self {
            identity,
            employee_id,
            start,
            end,
        })
    }

    /// End the shift at `at`.
    pub fn close(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        if self.end.is_some() {
            return Err(DomainError::conflict("work shift is already closed"));
        }
        ensure_not_before(self.start, at)?;
        self.end = Some(at);
        Ok(())
    }

    pub fn shift_id(&self) -> WorkShiftId {
        WorkShiftId(self.identity.id())
    }

    pub fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Time worked; open shifts count up to `now`, never below zero.
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        let end = self.end.unwrap_or(now);
        (end - self.start).max(Duration::zero())
    }
}

fn ensure_not_before(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<()> {
    if end < start {
        return Err(DomainError::validation(format!(
            "work shift end ({end}) is before start ({start})"
        )));
    }
    Ok(())
}

impl Identified for WorkShift {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn employee() -> EmployeeId {
        EmployeeId::new(Identity::generate().id())
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 10, 25, hour, 0, 0).unwrap()
    }

    #[test]
    fn start_opens_shift() {
        let shift = WorkShift::start(employee(), at(9));
        assert!(shift.is_open());
        assert_eq!(shift.end_time(), None);
        assert_eq!(shift.duration(at(11)), Duration::hours(2));
    }

    #[test]
    fn close_sets_end_and_fixes_duration() {
        let mut shift = WorkShift::start(employee(), at(9));
        shift.close(at(17)).unwrap();
        assert!(!shift.is_open());
        assert_eq!(shift.duration(at(23)), Duration::hours(8));
    }

    #[test]
    fn close_rejects_end_before_start() {
        let mut shift = WorkShift::start(employee(), at(9));
        let err = shift.close(at(8)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(shift.is_open());
    }

    #[test]
    fn close_twice_is_a_conflict() {
        let mut shift = WorkShift::start(employee(), at(9));
        shift.close(at(10)).unwrap();
        let err = shift.close(at(11)).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(shift.end_time(), Some(at(10)));
    }

    #[test]
    fn open_shift_duration_is_clamped_at_zero() {
        let shift = WorkShift::start(employee(), at(9));
        assert_eq!(shift.duration(at(8)), Duration::zero());
    }

    #[test]
    fn restore_validates_id_and_times() {
        let id = Uuid::parse_str("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
        let shift = WorkShift::restore(Some(id), employee(), at(9), Some(at(12))).unwrap();
        assert_eq!(shift.id().as_uuid(), &id);

        assert!(matches!(
            WorkShift::restore(None, employee(), at(9), None),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            WorkShift::restore(Some(id), employee(), at(9), Some(at(8))),
            Err(DomainError::Validation(_))
        ));
    }
}

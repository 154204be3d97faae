use serde::{Deserialize, Serialize};
use uuid::Uuid;

use timeclock_core::{DomainError, DomainResult, EntityId, IdGenerator, Identified, Identity};

/// Employee identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub EntityId);

impl EmployeeId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for EmployeeId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// An employee on the roster.
///
/// Two employees are equal when they share an id, whatever their names.
#[derive(Debug, Clone)]
pub struct Employee {
    identity: Identity,
    name: String,
}

impl Employee {
    /// New employee with a randomly generated id.
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        Self::build(Identity::generate(), name.into())
    }

    /// New employee whose id comes from `generator`.
    pub fn with_generator<G>(name: impl Into<String>, generator: &G) -> DomainResult<Self>
    where
        G: IdGenerator + ?Sized,
    {
        Self::build(Identity::generate_with(generator), name.into())
    }

    /// Rebuild a stored employee from its persisted id and name.
    pub fn restore(id: Option<Uuid>, name: impl Into<String>) -> DomainResult<Self> {
        let identity = Identity::try_from_uuid(id)?;
        Self::build(identity, name.into())
    }

    fn build(identity: Identity, name: String) -> DomainResult<Self> {
        let name = normalize_name(name)?;
        tracing::debug!(employee_id = %identity.id(), "employee constructed");
        Ok(Self { identity, name })
    }

    pub fn employee_id(&self) -> EmployeeId {
        EmployeeId(self.identity.id())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Change the display name. Identity is unaffected.
    pub fn rename(&mut self, name: impl Into<String>) -> DomainResult<()> {
        self.name = normalize_name(name.into())?;
        Ok(())
    }

    /// Text shown for this employee in a list row.
    pub fn display_row(&self) -> String {
        self.name.clone()
    }
}

fn normalize_name(name: String) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("employee name cannot be empty"));
    }
    if trimmed.len() == name.len() {
        Ok(name)
    } else {
        Ok(trimmed.to_string())
    }
}

impl Identified for Employee {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}

impl PartialEq for Employee {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Employee {}

impl core::hash::Hash for Employee {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeclock_core::SequentialIdGenerator;

    #[test]
    fn new_employee_gets_generated_id_and_trimmed_name() {
        let employee = Employee::new("  Ada Lovelace ").unwrap();
        assert_eq!(employee.name(), "Ada Lovelace");
        assert!(!employee.id().as_uuid().is_nil());
        assert_eq!(employee.employee_id().0, employee.id());
    }

    #[test]
    fn new_employee_rejects_blank_name() {
        let err = Employee::new("   ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn restore_rejects_missing_id() {
        let err = Employee::restore(None, "Grace").unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn restore_keeps_explicit_id() {
        let uuid = Uuid::parse_str("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
        let employee = Employee::restore(Some(uuid), "Grace").unwrap();
        assert_eq!(employee.id().as_uuid(), &uuid);
    }

    #[test]
    fn rename_keeps_identity() {
        let mut employee = Employee::new("Grace").unwrap();
        let before = employee.clone();
        employee.rename("Grace Hopper").unwrap();

        assert_eq!(employee, before);
        assert_eq!(employee.name(), "Grace Hopper");
        assert!(employee.rename("").is_err());
        assert_eq!(employee.name(), "Grace Hopper");
    }

    #[test]
    fn employees_with_same_name_are_distinct() {
        let generator = SequentialIdGenerator::new(3);
        let a = Employee::with_generator("Sam", &generator).unwrap();
        let b = Employee::with_generator("Sam", &generator).unwrap();
        assert_ne!(a, b);
        assert!(!a.same_entity(&b));
    }

    #[test]
    fn employee_id_parses_and_serializes_transparently() {
        let id: EmployeeId = "3fa85f64-5717-4562-b3fc-2c963f66afa6".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");
        assert!("".parse::<EmployeeId>().is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any non-blank name is accepted and stored trimmed.
            #[test]
            fn non_blank_names_are_stored_trimmed(name in " {0,3}[A-Za-z][A-Za-z .'-]{0,40} {0,3}") {
                let employee = Employee::new(name.clone()).unwrap();
                prop_assert_eq!(employee.name(), name.trim());
            }
        }
    }
}

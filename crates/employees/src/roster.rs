//! Observable in-memory employee list backing the employee list screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};

use timeclock_core::{DomainError, DomainResult, IdGenerator, IdScheme, RandomIdGenerator};

use crate::employee::{Employee, EmployeeId};

/// Callback invoked with the full employee list after every change.
pub type RosterObserver = Arc<dyn Fn(&[Employee]) + Send + Sync>;

/// Handle returned by [`EmployeeRoster::subscribe`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordering of rendered rows.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowOrder {
    #[default]
    Insertion,
    Name,
}

/// Employee collection that notifies subscribers whenever it changes.
///
/// Snapshots reach observers in write order; a snapshot older than one
/// already delivered is dropped. Observers may read the roster while being
/// notified but must not save to it.
pub struct EmployeeRoster {
    employees: RwLock<Vec<Employee>>,
    observers: RwLock<Vec<(SubscriptionId, RosterObserver)>>,
    revision: AtomicU64,
    delivered: Mutex<u64>,
    next_subscription: AtomicU64,
    generator: Box<dyn IdGenerator>,
}

impl EmployeeRoster {
    pub fn new() -> Self {
        Self::with_generator(Box::new(RandomIdGenerator))
    }

    pub fn with_scheme(scheme: IdScheme) -> Self {
        Self::with_generator(scheme.generator())
    }

    pub fn with_generator(generator: Box<dyn IdGenerator>) -> Self {
        Self {
            employees: RwLock::new(Vec::new()),
            observers: RwLock::new(Vec::new()),
            revision: AtomicU64::new(0),
            delivered: Mutex::new(0),
            next_subscription: AtomicU64::new(0),
            generator,
        }
    }

    /// Create an employee named `name` and save it. Returns the new id.
    pub fn add_employee(&self, name: impl Into<String>) -> DomainResult<EmployeeId> {
        let employee = Employee::with_generator(name, &self.generator)?;
        let id = employee.employee_id();
        self.save_employee(employee)?;
        Ok(id)
    }

    /// Insert `employee`, or replace the entry with the same id in place.
    pub fn save_employee(&self, employee: Employee) -> DomainResult<()> {
        let (revision, snapshot) = {
            let mut employees = self.employees.write().map_err(|_| {
                tracing::warn!("employee roster lock poisoned");
                DomainError::invariant("employee roster lock poisoned")
            })?;

            let employee_id = employee.employee_id();
            match employees.iter().position(|e| e.employee_id() == employee_id) {
                Some(index) => {
                    tracing::debug!(%employee_id, "employee updated");
                    employees[index] = employee;
                }
                None => {
                    tracing::debug!(%employee_id, "employee added");
                    employees.push(employee);
                }
            }
            // Bumped under the write lock so revisions follow write order.
            let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
            (revision, employees.clone())
        };

        self.notify(revision, &snapshot);
        Ok(())
    }

    pub fn get(&self, employee_id: EmployeeId) -> Option<Employee> {
        let employees = self.employees.read().ok()?;
        employees
            .iter()
            .find(|e| e.employee_id() == employee_id)
            .cloned()
    }

    /// Snapshot of all employees in insertion order.
    pub fn employees(&self) -> Vec<Employee> {
        match self.employees.read() {
            Ok(employees) => employees.clone(),
            Err(_) => vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.employees.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An empty roster should prompt for its first employee.
    pub fn needs_first_employee(&self) -> bool {
        self.is_empty()
    }

    /// One display row per employee, in insertion order.
    pub fn rows(&self) -> Vec<String> {
        self.rows_sorted(RowOrder::Insertion)
    }

    pub fn rows_sorted(&self, order: RowOrder) -> Vec<String> {
        let mut rows: Vec<String> = self.employees().iter().map(Employee::display_row).collect();
        if order == RowOrder::Name {
            rows.sort_by_key(|row| row.to_lowercase());
        }
        rows
    }

    /// Register `observer`; it is called after every change to the roster.
    pub fn subscribe<F>(&self, observer: F) -> DomainResult<SubscriptionId>
    where
        F: Fn(&[Employee]) + Send + Sync + 'static,
    {
        let mut observers = self.observers.write().map_err(|_| {
            tracing::warn!("roster observer lock poisoned");
            DomainError::invariant("roster observer lock poisoned")
        })?;
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        observers.push((id, Arc::new(observer)));
        Ok(id)
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut observers) = self.observers.write() else {
            return false;
        };
        let before = observers.len();
        observers.retain(|(sub, _)| *sub != id);
        observers.len() != before
    }

    fn notify(&self, revision: u64, snapshot: &[Employee]) {
        // Held for the whole delivery; the roster lock is not, so observers can read.
        let mut delivered = self.delivered.lock().unwrap_or_else(|e| e.into_inner());
        if revision <= *delivered {
            tracing::debug!(revision, delivered = *delivered, "dropped stale roster snapshot");
            return;
        }
        *delivered = revision;

        let observers: Vec<RosterObserver> = match self.observers.read() {
            Ok(observers) => observers.iter().map(|(_, o)| Arc::clone(o)).collect(),
            Err(_) => return,
        };
        for observer in observers {
            observer(snapshot);
        }
    }
}

impl Default for EmployeeRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for EmployeeRoster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EmployeeRoster")
            .field("employees", &self.len())
            .finish_non_exhaustive()
    }
}

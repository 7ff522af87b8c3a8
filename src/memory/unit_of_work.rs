use async_trait::async_trait;
use std::mem;

use crate::errors::Result;
use crate::memory::repositories::{
    InMemoryInvoiceRepository, InMemoryPaymentRepository, InMemorySchoolRepository,
    InMemoryStudentRepository,
};
use crate::memory::store::{InMemoryStore, StagedWrites};
use crate::ports::repository::{
    InvoiceRepository, PaymentRepository, SchoolRepository, StudentRepository,
};
use crate::ports::unit_of_work::UnitOfWork;

/// in-memory Unit of Work
///
/// One instance is one transaction scope. Repository handles stage writes in
/// transaction-local overlays; `commit` lands them in the shared store as a
/// single atomic step and releases the row locks taken by `for_update`
/// reads. Dropping the scope without committing discards everything — the
/// implicit rollback the port contract requires.
pub struct InMemoryUnitOfWork {
    store: InMemoryStore,
    invoices: InMemoryInvoiceRepository,
    payments: InMemoryPaymentRepository,
    students: InMemoryStudentRepository,
    schools: InMemorySchoolRepository,
    committed: bool,
    rolled_back: bool,
}

impl InMemoryUnitOfWork {
    /// open a transaction scope against the store
    pub fn begin(store: &InMemoryStore) -> Self {
        Self {
            store: store.clone(),
            invoices: InMemoryInvoiceRepository::new(store.clone()),
            payments: InMemoryPaymentRepository::new(store.clone()),
            students: InMemoryStudentRepository::new(store.clone()),
            schools: InMemorySchoolRepository::new(store.clone()),
            committed: false,
            rolled_back: false,
        }
    }

    fn release_locks(&mut self) {
        self.invoices.locks.clear();
        self.payments.locks.clear();
        self.students.locks.clear();
        self.schools.locks.clear();
    }

    /// whether commit was called, for test assertions
    pub fn committed(&self) -> bool {
        self.committed
    }

    /// whether rollback was called, for test assertions
    pub fn rolled_back(&self) -> bool {
        self.rolled_back
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn invoices(&mut self) -> &mut dyn InvoiceRepository {
        &mut self.invoices
    }

    fn payments(&mut self) -> &mut dyn PaymentRepository {
        &mut self.payments
    }

    fn students(&mut self) -> &mut dyn StudentRepository {
        &mut self.students
    }

    fn schools(&mut self) -> &mut dyn SchoolRepository {
        &mut self.schools
    }

    async fn commit(&mut self) -> Result<()> {
        let staged = StagedWrites {
            invoices: mem::take(&mut self.invoices.staged),
            payments: mem::take(&mut self.payments.staged),
            students: mem::take(&mut self.students.staged),
            schools: mem::take(&mut self.schools.staged),
        };
        self.store.apply(staged).await;
        self.release_locks();
        self.committed = true;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.invoices.staged.clear();
        self.payments.staged.clear();
        self.students.staged.clear();
        self.schools.staged.clear();
        self.release_locks();
        self.rolled_back = true;
        Ok(())
    }
}

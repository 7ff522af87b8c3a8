use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use crate::entities::{Invoice, Payment, School, Student};
use crate::types::{InvoiceId, PaymentId, SchoolId, StudentId};

/// shared in-memory entity store
///
/// Cheap to clone; all clones see the same data. Transactions never write
/// here directly — they stage in an overlay and [`InMemoryStore::apply`]
/// lands the whole overlay while holding every table's write lock, so a
/// commit is all-or-nothing from any reader's point of view.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    invoices: RwLock<HashMap<InvoiceId, Invoice>>,
    payments: RwLock<HashMap<PaymentId, Payment>>,
    students: RwLock<HashMap<StudentId, Student>>,
    schools: RwLock<HashMap<SchoolId, School>>,
    row_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

/// staged writes from one transaction
#[derive(Default)]
pub(crate) struct StagedWrites {
    pub invoices: HashMap<InvoiceId, Invoice>,
    pub payments: HashMap<PaymentId, Payment>,
    pub students: HashMap<StudentId, Student>,
    pub schools: HashMap<SchoolId, School>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// acquire the pessimistic lock for one row, waiting if another
    /// transaction holds it
    pub(crate) async fn lock_row(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut registry = self.inner.row_locks.lock().await;
            registry
                .entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// land a transaction's staged writes atomically
    pub(crate) async fn apply(&self, staged: StagedWrites) {
        // take every table write lock before touching any of them, always in
        // the same order
        let mut invoices = self.inner.invoices.write().await;
        let mut payments = self.inner.payments.write().await;
        let mut students = self.inner.students.write().await;
        let mut schools = self.inner.schools.write().await;

        invoices.extend(staged.invoices);
        payments.extend(staged.payments);
        students.extend(staged.students);
        schools.extend(staged.schools);
    }

    pub(crate) async fn read_invoice(&self, id: InvoiceId) -> Option<Invoice> {
        self.inner.invoices.read().await.get(&id).cloned()
    }

    pub(crate) async fn read_payment(&self, id: PaymentId) -> Option<Payment> {
        self.inner.payments.read().await.get(&id).cloned()
    }

    pub(crate) async fn read_student(&self, id: StudentId) -> Option<Student> {
        self.inner.students.read().await.get(&id).cloned()
    }

    pub(crate) async fn read_school(&self, id: SchoolId) -> Option<School> {
        self.inner.schools.read().await.get(&id).cloned()
    }

    pub(crate) async fn all_invoices(&self) -> Vec<Invoice> {
        self.inner.invoices.read().await.values().cloned().collect()
    }

    pub(crate) async fn all_payments(&self) -> Vec<Payment> {
        self.inner.payments.read().await.values().cloned().collect()
    }

    pub(crate) async fn all_students(&self) -> Vec<Student> {
        self.inner.students.read().await.values().cloned().collect()
    }

    /// committed invoice state, for assertions and diagnostics
    pub async fn invoice(&self, id: InvoiceId) -> Option<Invoice> {
        self.read_invoice(id).await
    }

    /// committed payment state, for assertions and diagnostics
    pub async fn payment(&self, id: PaymentId) -> Option<Payment> {
        self.read_payment(id).await
    }

    /// number of committed payments
    pub async fn payment_count(&self) -> usize {
        self.inner.payments.read().await.len()
    }
}

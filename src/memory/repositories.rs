use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::decimal::Money;
use crate::entities::{Invoice, Payment, School, Student};
use crate::errors::Result;
use crate::memory::store::InMemoryStore;
use crate::ports::query::{
    InvoiceFilters, Page, PaginationParams, PaymentFilters, SortOrder, SortParams,
};
use crate::ports::repository::{
    InvoiceRepository, PaymentRepository, SchoolRepository, StudentRepository,
};
use crate::types::{InvoiceId, PaymentId, SchoolId, StudentId};

fn paginate<T>(mut items: Vec<T>, pagination: PaginationParams) -> Page<T> {
    let total = items.len() as u64;
    let offset = pagination.offset() as usize;
    let items = if offset >= items.len() {
        Vec::new()
    } else {
        items
            .drain(offset..items.len().min(offset + pagination.limit() as usize))
            .collect()
    };
    Page {
        items,
        total,
        offset: pagination.offset(),
        limit: pagination.limit(),
    }
}

/// in-memory invoice repository bound to one transaction
pub struct InMemoryInvoiceRepository {
    store: InMemoryStore,
    pub(crate) staged: HashMap<InvoiceId, Invoice>,
    pub(crate) locks: HashMap<Uuid, OwnedMutexGuard<()>>,
}

impl InMemoryInvoiceRepository {
    pub(crate) fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            staged: HashMap::new(),
            locks: HashMap::new(),
        }
    }

    /// committed rows with this transaction's staged writes overlaid
    async fn snapshot(&self) -> Vec<Invoice> {
        let mut merged: HashMap<InvoiceId, Invoice> = self
            .store
            .all_invoices()
            .await
            .into_iter()
            .map(|i| (i.id(), i))
            .collect();
        for (id, invoice) in &self.staged {
            merged.insert(*id, invoice.clone());
        }
        merged.into_values().collect()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn get(&mut self, id: InvoiceId, for_update: bool) -> Result<Option<Invoice>> {
        // take the row lock before reading so the value seen is the one the
        // lock protects; re-entrant within the same transaction
        if for_update && !self.locks.contains_key(&id.as_uuid()) {
            let guard = self.store.lock_row(id.as_uuid()).await;
            self.locks.insert(id.as_uuid(), guard);
        }

        if let Some(staged) = self.staged.get(&id) {
            return Ok(Some(staged.clone()));
        }
        Ok(self.store.read_invoice(id).await)
    }

    async fn save(&mut self, invoice: Invoice) -> Result<Invoice> {
        self.staged.insert(invoice.id(), invoice.clone());
        Ok(invoice)
    }

    async fn find(
        &self,
        filters: &InvoiceFilters,
        pagination: PaginationParams,
        sort: &SortParams,
    ) -> Result<Page<Invoice>> {
        let mut items = self.snapshot().await;

        if let Some(student_id) = filters.student_id {
            items.retain(|i| i.student_id() == student_id);
        }
        if let Some(school_id) = filters.school_id {
            // cross-aggregate filter resolved against committed students
            let school_students: HashSet<StudentId> = self
                .store
                .all_students()
                .await
                .into_iter()
                .filter(|s| s.school_id() == school_id)
                .map(|s| s.id())
                .collect();
            items.retain(|i| school_students.contains(&i.student_id()));
        }
        if let Some(status) = filters.status {
            items.retain(|i| i.status() == status);
        }
        if let Some(from) = filters.due_date_from {
            items.retain(|i| i.due_date() >= from);
        }
        if let Some(to) = filters.due_date_to {
            items.retain(|i| i.due_date() <= to);
        }

        items.sort_by(|a, b| {
            let ord = match sort.field.as_str() {
                "due_date" => a.due_date().cmp(&b.due_date()),
                "amount" => a.amount().cmp(&b.amount()),
                // callers validate sort fields; default rather than error
                _ => a.created_at().cmp(&b.created_at()),
            };
            match sort.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        Ok(paginate(items, pagination))
    }

    async fn list_by_student(&self, student_id: StudentId) -> Result<Vec<Invoice>> {
        let mut items = self.snapshot().await;
        items.retain(|i| i.student_id() == student_id);
        items.sort_by_key(|i| i.created_at());
        Ok(items)
    }
}

/// in-memory payment repository bound to one transaction
pub struct InMemoryPaymentRepository {
    store: InMemoryStore,
    pub(crate) staged: HashMap<PaymentId, Payment>,
    pub(crate) locks: HashMap<Uuid, OwnedMutexGuard<()>>,
}

impl InMemoryPaymentRepository {
    pub(crate) fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            staged: HashMap::new(),
            locks: HashMap::new(),
        }
    }

    async fn snapshot(&self) -> Vec<Payment> {
        let mut merged: HashMap<PaymentId, Payment> = self
            .store
            .all_payments()
            .await
            .into_iter()
            .map(|p| (p.id(), p))
            .collect();
        for (id, payment) in &self.staged {
            merged.insert(*id, payment.clone());
        }
        merged.into_values().collect()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn get(&mut self, id: PaymentId, for_update: bool) -> Result<Option<Payment>> {
        if for_update && !self.locks.contains_key(&id.as_uuid()) {
            let guard = self.store.lock_row(id.as_uuid()).await;
            self.locks.insert(id.as_uuid(), guard);
        }

        if let Some(staged) = self.staged.get(&id) {
            return Ok(Some(staged.clone()));
        }
        Ok(self.store.read_payment(id).await)
    }

    async fn save(&mut self, payment: Payment) -> Result<Payment> {
        self.staged.insert(payment.id(), payment.clone());
        Ok(payment)
    }

    async fn find(
        &self,
        filters: &PaymentFilters,
        pagination: PaginationParams,
        sort: &SortParams,
    ) -> Result<Page<Payment>> {
        let mut items = self.snapshot().await;

        if let Some(invoice_id) = filters.invoice_id {
            items.retain(|p| p.invoice_id() == invoice_id);
        }
        if let Some(from) = filters.payment_date_from {
            items.retain(|p| p.payment_date() >= from);
        }
        if let Some(to) = filters.payment_date_to {
            items.retain(|p| p.payment_date() <= to);
        }

        items.sort_by(|a, b| {
            let ord = match sort.field.as_str() {
                "payment_date" => a.payment_date().cmp(&b.payment_date()),
                "amount" => a.amount().cmp(&b.amount()),
                _ => a.created_at().cmp(&b.created_at()),
            };
            match sort.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        Ok(paginate(items, pagination))
    }

    async fn total_by_invoice(&self, invoice_id: InvoiceId) -> Result<Money> {
        Ok(self
            .snapshot()
            .await
            .into_iter()
            .filter(|p| p.invoice_id() == invoice_id)
            .map(|p| p.amount())
            .sum())
    }

    async fn list_by_student(&self, student_id: StudentId) -> Result<Vec<Payment>> {
        let student_invoices: HashSet<InvoiceId> = self
            .store
            .all_invoices()
            .await
            .into_iter()
            .filter(|i| i.student_id() == student_id)
            .map(|i| i.id())
            .collect();

        let mut items = self.snapshot().await;
        items.retain(|p| student_invoices.contains(&p.invoice_id()));
        items.sort_by_key(|p| p.created_at());
        Ok(items)
    }
}

/// in-memory student repository bound to one transaction
pub struct InMemoryStudentRepository {
    store: InMemoryStore,
    pub(crate) staged: HashMap<StudentId, Student>,
    pub(crate) locks: HashMap<Uuid, OwnedMutexGuard<()>>,
}

impl InMemoryStudentRepository {
    pub(crate) fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            staged: HashMap::new(),
            locks: HashMap::new(),
        }
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn get(&mut self, id: StudentId, for_update: bool) -> Result<Option<Student>> {
        if for_update && !self.locks.contains_key(&id.as_uuid()) {
            let guard = self.store.lock_row(id.as_uuid()).await;
            self.locks.insert(id.as_uuid(), guard);
        }

        if let Some(staged) = self.staged.get(&id) {
            return Ok(Some(staged.clone()));
        }
        Ok(self.store.read_student(id).await)
    }

    async fn save(&mut self, student: Student) -> Result<Student> {
        self.staged.insert(student.id(), student.clone());
        Ok(student)
    }

    async fn list_by_school(&self, school_id: SchoolId) -> Result<Vec<Student>> {
        let mut merged: HashMap<StudentId, Student> = self
            .store
            .all_students()
            .await
            .into_iter()
            .map(|s| (s.id(), s))
            .collect();
        for (id, student) in &self.staged {
            merged.insert(*id, student.clone());
        }

        let mut items: Vec<Student> = merged
            .into_values()
            .filter(|s| s.school_id() == school_id)
            .collect();
        items.sort_by_key(|s| s.created_at());
        Ok(items)
    }
}

/// in-memory school repository bound to one transaction
pub struct InMemorySchoolRepository {
    store: InMemoryStore,
    pub(crate) staged: HashMap<SchoolId, School>,
    pub(crate) locks: HashMap<Uuid, OwnedMutexGuard<()>>,
}

impl InMemorySchoolRepository {
    pub(crate) fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            staged: HashMap::new(),
            locks: HashMap::new(),
        }
    }
}

#[async_trait]
impl SchoolRepository for InMemorySchoolRepository {
    async fn get(&mut self, id: SchoolId, for_update: bool) -> Result<Option<School>> {
        if for_update && !self.locks.contains_key(&id.as_uuid()) {
            let guard = self.store.lock_row(id.as_uuid()).await;
            self.locks.insert(id.as_uuid(), guard);
        }

        if let Some(staged) = self.staged.get(&id) {
            return Ok(Some(staged.clone()));
        }
        Ok(self.store.read_school(id).await)
    }

    async fn save(&mut self, school: School) -> Result<School> {
        self.staged.insert(school.id(), school.clone());
        Ok(school)
    }
}

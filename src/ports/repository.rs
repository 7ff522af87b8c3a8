use async_trait::async_trait;

use crate::decimal::Money;
use crate::entities::{Invoice, Payment, School, Student};
use crate::errors::Result;
use crate::ports::query::{InvoiceFilters, Page, PaginationParams, PaymentFilters, SortParams};
use crate::types::{InvoiceId, PaymentId, SchoolId, StudentId};

/// invoice data access bound to one transaction
///
/// Absence is reported as `Ok(None)`, never as a domain error; only the
/// orchestration layer turns absence into [`crate::BillingError::NotFound`].
/// `save` stages a write inside the surrounding transaction; committing is
/// solely the Unit of Work's job.
#[async_trait]
pub trait InvoiceRepository: Send {
    /// fetch by id; `for_update` takes a pessimistic row lock held until the
    /// transaction commits or rolls back
    async fn get(&mut self, id: InvoiceId, for_update: bool) -> Result<Option<Invoice>>;

    async fn save(&mut self, invoice: Invoice) -> Result<Invoice>;

    async fn find(
        &self,
        filters: &InvoiceFilters,
        pagination: PaginationParams,
        sort: &SortParams,
    ) -> Result<Page<Invoice>>;

    /// every invoice of one student, for statement computation
    async fn list_by_student(&self, student_id: StudentId) -> Result<Vec<Invoice>>;
}

/// payment data access bound to one transaction
#[async_trait]
pub trait PaymentRepository: Send {
    async fn get(&mut self, id: PaymentId, for_update: bool) -> Result<Option<Payment>>;

    async fn save(&mut self, payment: Payment) -> Result<Payment>;

    async fn find(
        &self,
        filters: &PaymentFilters,
        pagination: PaginationParams,
        sort: &SortParams,
    ) -> Result<Page<Payment>>;

    /// sum of payments recorded against one invoice
    ///
    /// Determines the balance due when recording a payment; must read within
    /// the same transaction as the row lock taken on the invoice.
    async fn total_by_invoice(&self, invoice_id: InvoiceId) -> Result<Money>;

    /// every payment on any of the student's invoices, for statements
    async fn list_by_student(&self, student_id: StudentId) -> Result<Vec<Payment>>;
}

/// student data access bound to one transaction
#[async_trait]
pub trait StudentRepository: Send {
    async fn get(&mut self, id: StudentId, for_update: bool) -> Result<Option<Student>>;

    async fn save(&mut self, student: Student) -> Result<Student>;

    async fn list_by_school(&self, school_id: SchoolId) -> Result<Vec<Student>>;
}

/// school data access bound to one transaction
#[async_trait]
pub trait SchoolRepository: Send {
    async fn get(&mut self, id: SchoolId, for_update: bool) -> Result<Option<School>>;

    async fn save(&mut self, school: School) -> Result<School>;
}

//! invoice lifecycle use cases

use chrono::{DateTime, Utc};
use tracing::info;

use crate::entities::Invoice;
use crate::errors::{BillingError, Result};
use crate::ports::{InvoiceFilters, Page, PaginationParams, SortParams, UnitOfWork};

/// Sort fields accepted by [`list_invoices`]. Anything else is rejected
/// before reaching the repository.
const INVOICE_SORT_FIELDS: &[&str] = &["created_at", "due_date", "amount"];

/// Creates an invoice for an existing student and commits it.
///
/// The student is looked up without a row lock: creation never mutates the
/// student, it only needs the reference to exist.
pub async fn create_invoice<U: UnitOfWork>(
    uow: &mut U,
    request: super::CreateInvoiceRequest,
    now: DateTime<Utc>,
) -> Result<Invoice> {
    let student = uow
        .students()
        .get(request.student_id, false)
        .await?
        .ok_or(BillingError::NotFound {
            entity: "student",
            id: request.student_id.as_uuid(),
        })?;

    let invoice = Invoice::create(
        student.id(),
        request.amount,
        request.due_date,
        &request.description,
        request.late_fee_policy,
        now,
    )?;
    let saved = uow.invoices().save(invoice).await?;
    uow.commit().await?;

    info!(
        invoice_id = %saved.id(),
        student_id = %saved.student_id(),
        amount = %saved.amount(),
        "invoice created"
    );
    Ok(saved)
}

/// Cancels an invoice under a row lock and commits the new status.
pub async fn cancel_invoice<U: UnitOfWork>(
    uow: &mut U,
    request: super::CancelInvoiceRequest,
    now: DateTime<Utc>,
) -> Result<Invoice> {
    let invoice = uow
        .invoices()
        .get(request.invoice_id, true)
        .await?
        .ok_or(BillingError::NotFound {
            entity: "invoice",
            id: request.invoice_id.as_uuid(),
        })?;

    let cancelled = invoice.cancel(now)?;
    let saved = uow.invoices().save(cancelled).await?;
    uow.commit().await?;

    info!(
        invoice_id = %saved.id(),
        reason = request.reason.as_deref().unwrap_or("unspecified"),
        "invoice cancelled"
    );
    Ok(saved)
}

/// Lists invoices matching `filters`, validating the sort field up front.
pub async fn list_invoices<U: UnitOfWork>(
    uow: &mut U,
    filters: &InvoiceFilters,
    pagination: PaginationParams,
    sort: &SortParams,
) -> Result<Page<Invoice>> {
    if !INVOICE_SORT_FIELDS.contains(&sort.field.as_str()) {
        return Err(BillingError::InvalidData {
            message: format!("unknown invoice sort field: {}", sort.field),
        });
    }
    uow.invoices().find(filters, pagination, sort).await
}

//! Orchestration of compound billing operations.
//!
//! Each use case runs inside exactly one Unit of Work scope: it reads
//! entities through the scope's repository handles, invokes domain
//! operations to compute new values, stages them through the same handles
//! and commits once. `now` is always injected by the caller — typically from
//! a [`hourglass_rs::SafeTimeProvider`] — and is never read ambiently here.

pub mod invoice;
pub mod payment;
pub mod statement;

use chrono::{DateTime, Utc};

use crate::decimal::Money;
use crate::late_fee::LateFeePolicy;
use crate::types::{InvoiceId, StudentId};

pub use invoice::{cancel_invoice, create_invoice, list_invoices};
pub use payment::{list_payments, record_payment};
pub use statement::{school_account_statement, student_account_statement};

/// input for [`create_invoice`]
#[derive(Debug, Clone)]
pub struct CreateInvoiceRequest {
    pub student_id: StudentId,
    pub amount: Money,
    pub due_date: DateTime<Utc>,
    pub description: String,
    pub late_fee_policy: LateFeePolicy,
}

/// input for [`cancel_invoice`]
#[derive(Debug, Clone)]
pub struct CancelInvoiceRequest {
    pub invoice_id: InvoiceId,
    pub reason: Option<String>,
}

/// input for [`record_payment`]
#[derive(Debug, Clone)]
pub struct RecordPaymentRequest {
    pub invoice_id: InvoiceId,
    pub amount: Money,
    pub payment_date: DateTime<Utc>,
    pub payment_method: String,
    pub reference: Option<String>,
}

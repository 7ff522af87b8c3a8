use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::decimal::Money;
use crate::entities::{Invoice, Payment, Student};
use crate::errors::{BillingError, Result};
use crate::types::{InvoiceStatus, SchoolId, StudentId, StudentStatus};

/// point-in-time financial summary for one student
///
/// Derived, never persisted: recomputed on demand from the student's
/// invoices and payments, optionally cached by an external collaborator.
/// Every late-fee evaluation inside one computation uses the same `now`
/// snapshot, so a single statement can never be internally skewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAccountStatement {
    pub student_id: StudentId,
    pub total_invoiced: Money,
    pub total_paid: Money,
    pub total_pending: Money,
    pub invoices_pending: u32,
    pub invoices_partially_paid: u32,
    pub invoices_paid: u32,
    pub invoices_cancelled: u32,
    pub invoices_overdue: u32,
    pub total_late_fees: Money,
    pub statement_date: DateTime<Utc>,
}

impl StudentAccountStatement {
    /// compute a statement from the student's invoices and their payments
    ///
    /// Payments not referencing one of the given invoices are ignored.
    /// Fails only if the data is inconsistent (payments exceeding the
    /// invoiced total), which a correctly guarded write path cannot produce.
    pub fn compute(
        student_id: StudentId,
        invoices: &[Invoice],
        payments: &[Payment],
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let invoice_ids: HashSet<_> = invoices.iter().map(|i| i.id()).collect();

        let mut total_invoiced = Money::ZERO;
        let mut invoices_pending = 0;
        let mut invoices_partially_paid = 0;
        let mut invoices_paid = 0;
        let mut invoices_cancelled = 0;
        let mut invoices_overdue = 0;
        let mut total_late_fees = Money::ZERO;

        for invoice in invoices {
            total_invoiced += invoice.amount();

            match invoice.status() {
                InvoiceStatus::Pending => invoices_pending += 1,
                InvoiceStatus::PartiallyPaid => invoices_partially_paid += 1,
                InvoiceStatus::Paid => invoices_paid += 1,
                InvoiceStatus::Cancelled => invoices_cancelled += 1,
            }

            if invoice.is_overdue(now) {
                invoices_overdue += 1;
                total_late_fees += invoice.calculate_late_fee(now);
            }
        }

        let total_paid: Money = payments
            .iter()
            .filter(|p| invoice_ids.contains(&p.invoice_id()))
            .map(|p| p.amount())
            .sum();

        let total_pending =
            total_invoiced
                .checked_sub(total_paid)
                .ok_or_else(|| BillingError::InvalidData {
                    message: format!(
                        "payments {total_paid} exceed invoiced total {total_invoiced} \
                         for student {student_id}"
                    ),
                })?;

        Ok(Self {
            student_id,
            total_invoiced,
            total_paid,
            total_pending,
            invoices_pending,
            invoices_partially_paid,
            invoices_paid,
            invoices_cancelled,
            invoices_overdue,
            total_late_fees,
            statement_date: now,
        })
    }
}

/// point-in-time financial summary for a school
///
/// The pointwise sum of the school's student statements, plus student
/// counts. All constituent statements must share the school statement's
/// `now` snapshot; the orchestration layer computes them in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolAccountStatement {
    pub school_id: SchoolId,
    pub total_students: u32,
    pub active_students: u32,
    pub total_invoiced: Money,
    pub total_paid: Money,
    pub total_pending: Money,
    pub invoices_pending: u32,
    pub invoices_partially_paid: u32,
    pub invoices_paid: u32,
    pub invoices_cancelled: u32,
    pub invoices_overdue: u32,
    pub total_late_fees: Money,
    pub statement_date: DateTime<Utc>,
}

impl SchoolAccountStatement {
    /// aggregate the statements of a school's students
    pub fn aggregate(
        school_id: SchoolId,
        students: &[Student],
        statements: &[StudentAccountStatement],
        now: DateTime<Utc>,
    ) -> Self {
        let mut out = Self {
            school_id,
            total_students: students.len() as u32,
            active_students: students
                .iter()
                .filter(|s| s.status() == StudentStatus::Active)
                .count() as u32,
            total_invoiced: Money::ZERO,
            total_paid: Money::ZERO,
            total_pending: Money::ZERO,
            invoices_pending: 0,
            invoices_partially_paid: 0,
            invoices_paid: 0,
            invoices_cancelled: 0,
            invoices_overdue: 0,
            total_late_fees: Money::ZERO,
            statement_date: now,
        };

        for s in statements {
            out.total_invoiced += s.total_invoiced;
            out.total_paid += s.total_paid;
            out.total_pending += s.total_pending;
            out.invoices_pending += s.invoices_pending;
            out.invoices_partially_paid += s.invoices_partially_paid;
            out.invoices_paid += s.invoices_paid;
            out.invoices_cancelled += s.invoices_cancelled;
            out.invoices_overdue += s.invoices_overdue;
            out.total_late_fees += s.total_late_fees;
        }

        out
    }
}

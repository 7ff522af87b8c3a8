use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::late_fee::LateFeePolicy;
use crate::types::{InvoiceId, InvoiceStatus, StudentId};

/// billing invoice issued to a student
///
/// Immutable: every state change returns a new instance (copy-on-write), the
/// receiver is never touched. The amount is fixed for the life of the
/// invoice. Status is stored and only changes through the legal-transition
/// table in [`InvoiceStatus::can_transition_to`]; "overdue" is never stored,
/// it is computed from the due date, the status and a caller-supplied `now`.
///
/// The invoice holds no payment history. Deciding which status applies after
/// a payment is the orchestration layer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    student_id: StudentId,
    invoice_number: String,
    amount: Money,
    description: String,
    due_date: DateTime<Utc>,
    late_fee_policy: LateFeePolicy,
    status: InvoiceStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Invoice {
    /// create a new pending invoice
    pub fn create(
        student_id: StudentId,
        amount: Money,
        due_date: DateTime<Utc>,
        description: &str,
        late_fee_policy: LateFeePolicy,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if amount.is_zero() {
            return Err(BillingError::InvalidAmount {
                amount: amount.as_decimal(),
            });
        }

        let description = description.trim();
        if description.is_empty() {
            return Err(BillingError::InvalidData {
                message: "invoice description cannot be empty".to_string(),
            });
        }

        if due_date < now {
            return Err(BillingError::InvalidData {
                message: format!("due date {due_date} cannot be before creation {now}"),
            });
        }

        Ok(Self {
            id: InvoiceId::new(),
            student_id,
            invoice_number: Self::generate_invoice_number(now),
            amount,
            description: description.to_string(),
            due_date,
            late_fee_policy,
            status: InvoiceStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// human-readable invoice number, display only
    ///
    /// Format INV-YYYY-NNNNNN with a timestamp-derived suffix. Not unique
    /// under load; the [`InvoiceId`] is the real identifier.
    fn generate_invoice_number(now: DateTime<Utc>) -> String {
        let suffix = (now.timestamp_millis().max(0) as u64) % 1_000_000;
        format!("INV-{}-{:06}", now.format("%Y"), suffix)
    }

    /// return a new invoice with the requested status
    ///
    /// Checked against the legal-transition table; an illegal transition
    /// yields [`BillingError::InvalidStateTransition`] naming both statuses
    /// and produces no new instance.
    pub fn update_status(&self, new_status: InvoiceStatus, now: DateTime<Utc>) -> Result<Self> {
        if !self.status.can_transition_to(new_status) {
            return Err(BillingError::InvalidStateTransition {
                from: self.status,
                to: new_status,
            });
        }

        let mut next = self.clone();
        next.status = new_status;
        next.updated_at = now;
        Ok(next)
    }

    /// return a new cancelled invoice
    pub fn cancel(&self, now: DateTime<Utc>) -> Result<Self> {
        self.update_status(InvoiceStatus::Cancelled, now)
    }

    /// overdue predicate, computed rather than stored
    ///
    /// Strict comparison: an invoice due exactly at `now` is not overdue.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.status,
            InvoiceStatus::Pending | InvoiceStatus::PartiallyPaid
        ) && now > self.due_date
    }

    /// late fee at `now`, zero unless overdue
    ///
    /// Delegates to the policy with the ORIGINAL amount, never the balance.
    pub fn calculate_late_fee(&self, now: DateTime<Utc>) -> Money {
        if !self.is_overdue(now) {
            return Money::ZERO;
        }
        self.late_fee_policy
            .calculate_fee(self.amount, self.due_date, now)
    }

    pub fn id(&self) -> InvoiceId {
        self.id
    }

    pub fn student_id(&self) -> StudentId {
        self.student_id
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn late_fee_policy(&self) -> LateFeePolicy {
        self.late_fee_policy
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

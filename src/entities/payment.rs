use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::types::{InvoiceId, PaymentId};

/// payment applied against one invoice
///
/// Append-only by construction: there is no mutating or deleting operation
/// anywhere on this type, and all fields sit behind read-only accessors.
/// Multiple payments may reference the same invoice (partial payments).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    invoice_id: InvoiceId,
    amount: Money,
    payment_date: DateTime<Utc>,
    payment_method: String,
    reference: Option<String>,
    created_at: DateTime<Utc>,
}

impl Payment {
    /// record a new payment
    ///
    /// `payment_date` is when the money moved (may be in the past);
    /// `now` is when the system recorded it.
    pub fn create(
        invoice_id: InvoiceId,
        amount: Money,
        payment_date: DateTime<Utc>,
        payment_method: &str,
        reference: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if amount.is_zero() {
            return Err(BillingError::InvalidAmount {
                amount: amount.as_decimal(),
            });
        }

        let payment_method = payment_method.trim();
        if payment_method.is_empty() {
            return Err(BillingError::InvalidData {
                message: "payment method cannot be empty".to_string(),
            });
        }

        Ok(Self {
            id: PaymentId::new(),
            invoice_id,
            amount,
            payment_date,
            payment_method: payment_method.to_string(),
            reference: reference.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()),
            created_at: now,
        })
    }

    pub fn id(&self) -> PaymentId {
        self.id
    }

    pub fn invoice_id(&self) -> InvoiceId {
        self.invoice_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn payment_date(&self) -> DateTime<Utc> {
        self.payment_date
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_create_valid_payment() {
        let payment = Payment::create(
            InvoiceId::new(),
            Money::from_str_exact("500.00").unwrap(),
            t0(),
            "bank_transfer",
            Some("TX-12345"),
            t0(),
        )
        .unwrap();

        assert_eq!(payment.amount(), Money::from_major(500));
        assert_eq!(payment.payment_method(), "bank_transfer");
        assert_eq!(payment.reference(), Some("TX-12345"));
    }

    #[test]
    fn test_zero_amount_rejected_at_construction() {
        let err = Payment::create(InvoiceId::new(), Money::ZERO, t0(), "cash", None, t0())
            .unwrap_err();
        assert!(matches!(err, BillingError::InvalidAmount { .. }));
        // negative amounts cannot even be expressed: Money construction
        // rejects them before a Payment is in sight
        assert!(Money::from_str_exact("-1.00").is_err());
    }

    #[test]
    fn test_blank_method_rejected() {
        let err = Payment::create(
            InvoiceId::new(),
            Money::from_major(10),
            t0(),
            "  ",
            None,
            t0(),
        )
        .unwrap_err();
        assert!(matches!(err, BillingError::InvalidData { .. }));
    }

    #[test]
    fn test_blank_reference_normalized_to_none() {
        let payment =
            Payment::create(InvoiceId::new(), Money::from_major(10), t0(), "cash", Some("  "), t0())
                .unwrap();
        assert_eq!(payment.reference(), None);
    }
}

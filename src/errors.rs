use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{InvoiceId, InvoiceStatus};

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("invalid monthly rate: {rate}")]
    InvalidRate { rate: Decimal },

    #[error("invalid data: {message}")]
    InvalidData { message: String },

    #[error("invalid status transition: {from} -> {to}")]
    InvalidStateTransition {
        from: InvoiceStatus,
        to: InvoiceStatus,
    },

    #[error("payment {amount} exceeds balance due {balance}")]
    PaymentExceedsBalance { amount: Money, balance: Money },

    #[error("cannot record payment for cancelled invoice {id}")]
    CannotPayCancelled { id: InvoiceId },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("infrastructure failure: {message}")]
    Infrastructure { message: String },
}

impl BillingError {
    /// true for errors caused by the caller's input or a business-rule
    /// violation, false for infrastructure failures
    pub fn is_client_fault(&self) -> bool {
        !matches!(self, BillingError::Infrastructure { .. })
    }
}

pub type Result<T> = std::result::Result<T, BillingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_classification() {
        let client = BillingError::PaymentExceedsBalance {
            amount: Money::from_major(50),
            balance: Money::from_major(10),
        };
        assert!(client.is_client_fault());

        let infra = BillingError::Infrastructure {
            message: "connection reset".to_string(),
        };
        assert!(!infra.is_client_fault());
    }
}

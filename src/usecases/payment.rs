//! payment recording

use chrono::{DateTime, Utc};
use tracing::info;

use crate::decimal::Money;
use crate::entities::Payment;
use crate::errors::{BillingError, Result};
use crate::ports::{Page, PaginationParams, PaymentFilters, SortParams, UnitOfWork};
use crate::types::InvoiceStatus;

const PAYMENT_SORT_FIELDS: &[&str] = &["created_at", "payment_date", "amount"];

/// Records a payment against an invoice and moves its status forward.
///
/// The invoice row is locked for the whole scope so that two concurrent
/// payments cannot both read the same outstanding balance. The payment and
/// the status change are staged together and land in a single commit.
pub async fn record_payment<U: UnitOfWork>(
    uow: &mut U,
    request: super::RecordPaymentRequest,
    now: DateTime<Utc>,
) -> Result<Payment> {
    let invoice = uow
        .invoices()
        .get(request.invoice_id, true)
        .await?
        .ok_or(BillingError::NotFound {
            entity: "invoice",
            id: request.invoice_id.as_uuid(),
        })?;

    if invoice.status() == InvoiceStatus::Cancelled {
        return Err(BillingError::CannotPayCancelled { id: invoice.id() });
    }

    let paid = uow.payments().total_by_invoice(invoice.id()).await?;
    let balance = invoice.amount().checked_sub(paid).unwrap_or(Money::ZERO);
    if request.amount > balance {
        return Err(BillingError::PaymentExceedsBalance {
            amount: request.amount,
            balance,
        });
    }

    let payment = Payment::create(
        invoice.id(),
        request.amount,
        request.payment_date,
        &request.payment_method,
        request.reference.as_deref(),
        now,
    )?;

    let new_balance = balance.checked_sub(request.amount).unwrap_or(Money::ZERO);
    let new_status = if new_balance == Money::ZERO {
        InvoiceStatus::Paid
    } else {
        InvoiceStatus::PartiallyPaid
    };
    let updated = invoice.update_status(new_status, now)?;

    let payment = uow.payments().save(payment).await?;
    uow.invoices().save(updated).await?;
    uow.commit().await?;

    info!(
        payment_id = %payment.id(),
        invoice_id = %payment.invoice_id(),
        amount = %payment.amount(),
        status = ?new_status,
        "payment recorded"
    );
    Ok(payment)
}

/// Lists payments matching `filters`, validating the sort field up front.
pub async fn list_payments<U: UnitOfWork>(
    uow: &mut U,
    filters: &PaymentFilters,
    pagination: PaginationParams,
    sort: &SortParams,
) -> Result<Page<Payment>> {
    if !PAYMENT_SORT_FIELDS.contains(&sort.field.as_str()) {
        return Err(BillingError::InvalidData {
            message: format!("unknown payment sort field: {}", sort.field),
        });
    }
    uow.payments().find(filters, pagination, sort).await
}

#[cfg(test)]
mod tests {
    use super::super::{CreateInvoiceRequest, RecordPaymentRequest};
    use super::*;
    use crate::entities::{Invoice, School, Student};
    use crate::late_fee::LateFeePolicy;
    use crate::memory::{InMemoryStore, InMemoryUnitOfWork};
    use crate::ports::SortOrder;
    use crate::usecases::create_invoice;
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};

    fn test_clock() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        ))
    }

    async fn seed_invoice(store: &InMemoryStore, now: chrono::DateTime<Utc>, amount: u64) -> Invoice {
        let school = School::create("Springfield Elementary", "742 Evergreen Terrace", now).unwrap();
        let student = Student::create(
            school.id(),
            "Bart",
            "Simpson",
            "bart@springfield.edu",
            now,
        )
        .unwrap();
        let mut uow = InMemoryUnitOfWork::begin(store);
        uow.schools().save(school).await.unwrap();
        let student = uow.students().save(student).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = InMemoryUnitOfWork::begin(store);
        create_invoice(
            &mut uow,
            CreateInvoiceRequest {
                student_id: student.id(),
                amount: Money::from_major(amount),
                due_date: now + Duration::days(30),
                description: "tuition".to_string(),
                late_fee_policy: LateFeePolicy::standard(),
            },
            now,
        )
        .await
        .unwrap()
    }

    fn request(invoice: &Invoice, amount: Money, now: chrono::DateTime<Utc>) -> RecordPaymentRequest {
        RecordPaymentRequest {
            invoice_id: invoice.id(),
            amount,
            payment_date: now,
            payment_method: "transfer".to_string(),
            reference: Some("OP-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_partial_then_full_payment() {
        let clock = test_clock();
        let now = clock.now();
        let store = InMemoryStore::default();
        let invoice = seed_invoice(&store, now, 100).await;

        let mut uow = InMemoryUnitOfWork::begin(&store);
        record_payment(&mut uow, request(&invoice, Money::from_major(40), now), now)
            .await
            .unwrap();
        assert_eq!(
            store.invoice(invoice.id()).await.unwrap().status(),
            InvoiceStatus::PartiallyPaid
        );

        let mut uow = InMemoryUnitOfWork::begin(&store);
        record_payment(&mut uow, request(&invoice, Money::from_major(60), now), now)
            .await
            .unwrap();
        assert_eq!(
            store.invoice(invoice.id()).await.unwrap().status(),
            InvoiceStatus::Paid
        );
        assert_eq!(store.payment_count().await, 2);
    }

    #[tokio::test]
    async fn test_overpayment_rejected_and_nothing_persisted() {
        let clock = test_clock();
        let now = clock.now();
        let store = InMemoryStore::default();
        let invoice = seed_invoice(&store, now, 100).await;

        let mut uow = InMemoryUnitOfWork::begin(&store);
        record_payment(&mut uow, request(&invoice, Money::from_major(70), now), now)
            .await
            .unwrap();

        let mut uow = InMemoryUnitOfWork::begin(&store);
        let err = record_payment(&mut uow, request(&invoice, Money::from_major(31), now), now)
            .await
            .unwrap_err();
        match err {
            BillingError::PaymentExceedsBalance { amount, balance } => {
                assert_eq!(amount, Money::from_major(31));
                assert_eq!(balance, Money::from_major(30));
            }
            other => panic!("unexpected error: {other}"),
        }
        drop(uow);

        assert_eq!(store.payment_count().await, 1);
        assert_eq!(
            store.invoice(invoice.id()).await.unwrap().status(),
            InvoiceStatus::PartiallyPaid
        );
    }

    #[tokio::test]
    async fn test_payment_on_cancelled_invoice_rejected() {
        let clock = test_clock();
        let now = clock.now();
        let store = InMemoryStore::default();
        let invoice = seed_invoice(&store, now, 100).await;

        let mut uow = InMemoryUnitOfWork::begin(&store);
        let cancelled = invoice.cancel(now).unwrap();
        uow.invoices().save(cancelled).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = InMemoryUnitOfWork::begin(&store);
        let err = record_payment(&mut uow, request(&invoice, Money::from_major(10), now), now)
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::CannotPayCancelled { .. }));
        assert_eq!(store.payment_count().await, 0);
    }

    #[tokio::test]
    async fn test_payment_on_unknown_invoice() {
        let clock = test_clock();
        let now = clock.now();
        let store = InMemoryStore::default();

        let mut uow = InMemoryUnitOfWork::begin(&store);
        let err = record_payment(
            &mut uow,
            RecordPaymentRequest {
                invoice_id: crate::types::InvoiceId::new(),
                amount: Money::from_major(10),
                payment_date: now,
                payment_method: "transfer".to_string(),
                reference: None,
            },
            now,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BillingError::NotFound { entity: "invoice", .. }));
    }

    #[tokio::test]
    async fn test_concurrent_payments_serialize_on_row_lock() {
        let clock = test_clock();
        let now = clock.now();
        let store = InMemoryStore::default();
        let invoice = seed_invoice(&store, now, 100).await;

        let mut handles = Vec::new();
        for _ in 0..2 {
            let store = store.clone();
            let invoice = invoice.clone();
            handles.push(tokio::spawn(async move {
                let mut uow = InMemoryUnitOfWork::begin(&store);
                record_payment(&mut uow, request(&invoice, Money::from_major(60), now), now).await
            }));
        }

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap());
        }

        // whichever transaction wins the lock pays 60; the other then sees
        // a balance of 40 and is rejected
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes.iter().any(|r| matches!(
            r,
            Err(BillingError::PaymentExceedsBalance { .. })
        )));
        assert_eq!(store.payment_count().await, 1);
        assert_eq!(
            store.invoice(invoice.id()).await.unwrap().status(),
            InvoiceStatus::PartiallyPaid
        );
    }

    #[tokio::test]
    async fn test_failure_before_commit_discards_staged_writes() {
        let clock = test_clock();
        let now = clock.now();
        let store = InMemoryStore::default();
        let invoice = seed_invoice(&store, now, 100).await;

        {
            let mut uow = InMemoryUnitOfWork::begin(&store);
            let payment = Payment::create(
                invoice.id(),
                Money::from_major(40),
                now,
                "transfer",
                None,
                now,
            )
            .unwrap();
            uow.payments().save(payment).await.unwrap();
            // a transition failure aborts the scope with a payment already
            // staged; dropping the scope must discard it
            let err = invoice.update_status(InvoiceStatus::Pending, now);
            assert!(err.is_ok());
            let paid = invoice.update_status(InvoiceStatus::Paid, now).unwrap();
            assert!(paid
                .update_status(InvoiceStatus::Pending, now)
                .is_err());
        }

        assert_eq!(store.payment_count().await, 0);
        assert_eq!(
            store.invoice(invoice.id()).await.unwrap().status(),
            InvoiceStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_list_payments_sorted() {
        let clock = test_clock();
        let now = clock.now();
        let store = InMemoryStore::default();
        let invoice = seed_invoice(&store, now, 100).await;

        for (amount, day) in [(30u64, 1i64), (20, 2), (10, 3)] {
            let mut uow = InMemoryUnitOfWork::begin(&store);
            record_payment(
                &mut uow,
                RecordPaymentRequest {
                    invoice_id: invoice.id(),
                    amount: Money::from_major(amount),
                    payment_date: now + Duration::days(day),
                    payment_method: "transfer".to_string(),
                    reference: None,
                },
                now,
            )
            .await
            .unwrap();
        }

        let mut uow = InMemoryUnitOfWork::begin(&store);
        let filters = PaymentFilters {
            invoice_id: Some(invoice.id()),
            ..PaymentFilters::default()
        };
        let sort = SortParams {
            field: "amount".to_string(),
            order: SortOrder::Desc,
        };
        let page = list_payments(&mut uow, &filters, PaginationParams::default(), &sort)
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items[0].amount(), Money::from_major(30));

        let bad_sort = SortParams {
            field: "reference".to_string(),
            order: SortOrder::Asc,
        };
        assert!(list_payments(&mut uow, &filters, PaginationParams::default(), &bad_sort)
            .await
            .is_err());
    }
}

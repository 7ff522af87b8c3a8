/// quick start - minimal example to get started
use school_billing_rs::{LateFeePolicy, Money, SafeTimeProvider, TimeSource, UnitOfWork};
use school_billing_rs::entities::{School, Student};
use school_billing_rs::memory::{InMemoryStore, InMemoryUnitOfWork};
use school_billing_rs::usecases::{
    create_invoice, record_payment, CreateInvoiceRequest, RecordPaymentRequest,
};
use chrono::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let clock = SafeTimeProvider::new(TimeSource::System);
    let now = clock.now();
    let store = InMemoryStore::default();

    // register a school and a student
    let school = School::create("Springfield Elementary", "742 Evergreen Terrace", now)?;
    let student = Student::create(school.id(), "Lisa", "Simpson", "lisa@springfield.edu", now)?;
    let mut uow = InMemoryUnitOfWork::begin(&store);
    uow.schools().save(school).await?;
    let student = uow.students().save(student).await?;
    uow.commit().await?;

    // issue a $1,500 tuition invoice due in 30 days
    let mut uow = InMemoryUnitOfWork::begin(&store);
    let invoice = create_invoice(
        &mut uow,
        CreateInvoiceRequest {
            student_id: student.id(),
            amount: Money::from_major(1_500),
            due_date: now + Duration::days(30),
            description: "March tuition".to_string(),
            late_fee_policy: LateFeePolicy::standard(),
        },
        now,
    )
    .await?;
    println!("invoice {}: ${}", invoice.invoice_number(), invoice.amount());

    // record a partial payment
    let mut uow = InMemoryUnitOfWork::begin(&store);
    let payment = record_payment(
        &mut uow,
        RecordPaymentRequest {
            invoice_id: invoice.id(),
            amount: Money::from_major(500),
            payment_date: now,
            payment_method: "transfer".to_string(),
            reference: None,
        },
        now,
    )
    .await?;
    println!("payment recorded: ${}", payment.amount());

    let updated = store.invoice(invoice.id()).await.ok_or("invoice missing")?;
    println!("invoice status: {:?}", updated.status());

    Ok(())
}

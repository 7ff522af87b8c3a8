/// time control - deterministic late fees with a test clock
use school_billing_rs::{LateFeePolicy, Money, SafeTimeProvider, TimeSource, UnitOfWork};
use school_billing_rs::entities::{School, Student};
use school_billing_rs::memory::{InMemoryStore, InMemoryUnitOfWork};
use school_billing_rs::usecases::{create_invoice, CreateInvoiceRequest};
use chrono::{Duration, TimeZone, Utc};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    // create controlled time for testing
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    println!("starting date: {}", time.now().format("%Y-%m-%d"));

    let store = InMemoryStore::default();
    let school = School::create("Springfield Elementary", "742 Evergreen Terrace", time.now())?;
    let student = Student::create(
        school.id(),
        "Bart",
        "Simpson",
        "bart@springfield.edu",
        time.now(),
    )?;
    let mut uow = InMemoryUnitOfWork::begin(&store);
    uow.schools().save(school).await?;
    let student = uow.students().save(student).await?;
    uow.commit().await?;

    // $1,500 invoice due in 10 days with the standard 5% monthly late fee
    let mut uow = InMemoryUnitOfWork::begin(&store);
    let invoice = create_invoice(
        &mut uow,
        CreateInvoiceRequest {
            student_id: student.id(),
            amount: Money::from_major(1_500),
            due_date: time.now() + Duration::days(10),
            description: "March tuition".to_string(),
            late_fee_policy: LateFeePolicy::standard(),
        },
        time.now(),
    )
    .await?;
    println!("invoice due: {}", invoice.due_date().format("%Y-%m-%d"));

    // on the due date no fee accrues
    controller.advance(Duration::days(10));
    println!("\nadvanced to: {}", time.now().format("%Y-%m-%d"));
    println!("overdue: {}", invoice.is_overdue(time.now()));
    println!("late fee: ${}", invoice.calculate_late_fee(time.now()));

    // 15 days past due: 1500 * 5% / 30 * 15 = $37.50
    controller.advance(Duration::days(15));
    println!("\nadvanced to: {}", time.now().format("%Y-%m-%d"));
    println!("overdue: {}", invoice.is_overdue(time.now()));
    println!("late fee: ${}", invoice.calculate_late_fee(time.now()));

    Ok(())
}

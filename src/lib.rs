pub mod clock;
pub mod decimal;
pub mod entities;
pub mod errors;
pub mod late_fee;
pub mod memory;
pub mod ports;
pub mod statement;
pub mod types;
pub mod usecases;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{BillingError, Result};
pub use entities::{Invoice, Payment, School, Student};
pub use late_fee::LateFeePolicy;
pub use ports::{
    InvoiceFilters, InvoiceRepository, NullCache, Page, PaginationParams, PaymentFilters,
    PaymentRepository, SchoolRepository, SortOrder, SortParams, StatementCache,
    StudentRepository, UnitOfWork,
};
pub use statement::{SchoolAccountStatement, StudentAccountStatement};
pub use types::{
    InvoiceId, InvoiceStatus, PaymentId, SchoolId, StudentId, StudentStatus,
};
pub use usecases::{
    CancelInvoiceRequest, CreateInvoiceRequest, RecordPaymentRequest,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;

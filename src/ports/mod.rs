pub mod cache;
pub mod query;
pub mod repository;
pub mod unit_of_work;

pub use cache::{NullCache, StatementCache};
pub use query::{
    InvoiceFilters, Page, PaginationParams, PaymentFilters, SortOrder, SortParams,
};
pub use repository::{
    InvoiceRepository, PaymentRepository, SchoolRepository, StudentRepository,
};
pub use unit_of_work::UnitOfWork;

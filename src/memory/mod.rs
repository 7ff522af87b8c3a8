//! In-memory adapters for the repository, Unit of Work and cache ports.
//!
//! Reference implementations used by the unit tests and by callers that do
//! not need a durable backend. Writes are staged in a per-transaction
//! overlay and only reach the shared store on commit; `for_update` reads
//! take per-row async locks, so concurrent read-modify-write sequences on
//! the same invoice serialize exactly like `SELECT ... FOR UPDATE` would.

pub mod cache;
pub mod repositories;
pub mod store;
pub mod unit_of_work;

pub use cache::InMemoryStatementCache;
pub use repositories::{
    InMemoryInvoiceRepository, InMemoryPaymentRepository, InMemorySchoolRepository,
    InMemoryStudentRepository,
};
pub use store::InMemoryStore;
pub use unit_of_work::InMemoryUnitOfWork;

use async_trait::async_trait;

use crate::errors::Result;
use crate::ports::repository::{
    InvoiceRepository, PaymentRepository, SchoolRepository, StudentRepository,
};

/// transactional scope binding repository writes into one atomic unit
///
/// Entering a scope begins a transaction; the repository handles it exposes
/// only stage writes, visible inside the transaction but not durable.
/// `commit` persists everything staged as one atomic unit; `rollback` — or
/// dropping the scope without committing — discards it all and releases any
/// row locks taken along the way. One scope per compound operation; scopes
/// are never nested.
#[async_trait]
pub trait UnitOfWork: Send {
    fn invoices(&mut self) -> &mut dyn InvoiceRepository;

    fn payments(&mut self) -> &mut dyn PaymentRepository;

    fn students(&mut self) -> &mut dyn StudentRepository;

    fn schools(&mut self) -> &mut dyn SchoolRepository;

    /// durably persist all staged writes atomically
    async fn commit(&mut self) -> Result<()>;

    /// discard all staged writes
    async fn rollback(&mut self) -> Result<()>;
}

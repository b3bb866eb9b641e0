//! Storage port consumed by the invoice service

use async_trait::async_trait;
use uuid::Uuid;

use super::error::StoreError;
use super::invoice::{Invoice, NewInvoice};

/// Persistence interface for invoices.
///
/// Implementations provide the five CRUD operations against a concrete
/// backend; the service is agnostic to the storage mechanism. All
/// methods must be safe under concurrent invocation.
///
/// Not-found conditions are reported as [`StoreError::NotFound`], never
/// folded into a generic backend error.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Assign an identifier and timestamps to the change set, persist it,
    /// and return the stored invoice.
    async fn create(&self, new: NewInvoice) -> Result<Invoice, StoreError>;

    /// Return all current invoices. Order is unspecified.
    async fn get_all(&self) -> Result<Vec<Invoice>, StoreError>;

    /// Return exactly the invoice with the given identifier.
    async fn get_by_id(&self, id: Uuid) -> Result<Invoice, StoreError>;

    /// Overwrite the mutable fields of an existing invoice, refreshing
    /// its update timestamp, and return the result.
    async fn update(&self, id: Uuid, changes: NewInvoice) -> Result<Invoice, StoreError>;

    /// Physically remove the invoice with the given identifier.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

//! Invoice service orchestrating validation and the storage port

use std::sync::Arc;
use uuid::Uuid;

use super::error::InvoicerError;
use super::invoice::{Invoice, NewInvoice};
use super::store::InvoiceStore;

/// Use-case layer between the bus dispatcher and the storage port.
///
/// One method per CRUD verb. Business rules run here, before any storage
/// call, so invalid data is rejected with a client error rather than
/// bounced off a database constraint. The service is stateless apart
/// from its shared store handle and is safe to share across concurrent
/// dispatcher invocations.
pub struct InvoiceService {
    store: Arc<dyn InvoiceStore>,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new invoice.
    pub async fn create(&self, new: NewInvoice) -> Result<Invoice, InvoicerError> {
        new.validate()?;
        Ok(self.store.create(new).await?)
    }

    /// Fetch all invoices.
    pub async fn get_all(&self) -> Result<Vec<Invoice>, InvoicerError> {
        Ok(self.store.get_all().await?)
    }

    /// Fetch one invoice by identifier.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Invoice, InvoicerError> {
        Ok(self.store.get_by_id(id).await?)
    }

    /// Validate a change set and overwrite an existing invoice.
    pub async fn update(&self, id: Uuid, changes: NewInvoice) -> Result<Invoice, InvoicerError> {
        changes.validate()?;
        Ok(self.store.update(id, changes).await?)
    }

    /// Remove an invoice by identifier.
    pub async fn delete(&self, id: Uuid) -> Result<(), InvoicerError> {
        Ok(self.store.delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{StoreError, ValidationError};
    use crate::storage::InMemoryInvoiceStore;

    fn service() -> InvoiceService {
        InvoiceService::new(Arc::new(InMemoryInvoiceStore::new()))
    }

    #[tokio::test]
    async fn test_create_assigns_identifier() {
        let service = service();

        let invoice = service
            .create(NewInvoice::new(100.50, "Acme"))
            .await
            .unwrap();

        assert!(!invoice.id.is_nil());
        assert_eq!(invoice.amount, 100.50);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_amount_before_storage() {
        let service = service();

        let err = service
            .create(NewInvoice::new(-3.0, "Acme"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InvoicerError::Validation(ValidationError::NonPositiveAmount { .. })
        ));
        assert!(service.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_empty_customer() {
        let service = service();
        let invoice = service.create(NewInvoice::new(10.0, "Acme")).await.unwrap();

        let err = service
            .update(invoice.id, NewInvoice::new(10.0, ""))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InvoicerError::Validation(ValidationError::EmptyCustomer)
        ));

        // Stored row is unchanged
        let stored = service.get_by_id(invoice.id).await.unwrap();
        assert_eq!(stored.customer, "Acme");
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let service = service();

        let err = service.get_by_id(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(
            err,
            InvoicerError::Store(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service();
        let invoice = service.create(NewInvoice::new(10.0, "Acme")).await.unwrap();

        service.delete(invoice.id).await.unwrap();

        let err = service.get_by_id(invoice.id).await.unwrap_err();
        assert_eq!(err.status(), 404);
    }
}

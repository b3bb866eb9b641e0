//! In-memory implementation of the invoice store for testing and development

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::StoreError;
use crate::core::invoice::{Invoice, NewInvoice};
use crate::core::store::InvoiceStore;

/// In-memory invoice store.
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<Uuid, Invoice>>>,
}

impl InMemoryInvoiceStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self {
            invoices: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryInvoiceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn create(&self, new: NewInvoice) -> Result<Invoice, StoreError> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| StoreError::backend(format!("Failed to acquire write lock: {}", e)))?;

        let invoice = Invoice::create(new);
        invoices.insert(invoice.id, invoice.clone());

        Ok(invoice)
    }

    async fn get_all(&self) -> Result<Vec<Invoice>, StoreError> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| StoreError::backend(format!("Failed to acquire read lock: {}", e)))?;

        Ok(invoices.values().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Invoice, StoreError> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| StoreError::backend(format!("Failed to acquire read lock: {}", e)))?;

        invoices
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn update(&self, id: Uuid, changes: NewInvoice) -> Result<Invoice, StoreError> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| StoreError::backend(format!("Failed to acquire write lock: {}", e)))?;

        let invoice = invoices.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        invoice.apply(changes);

        Ok(invoice.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| StoreError::backend(format!("Failed to acquire write lock: {}", e)))?;

        invoices
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryInvoiceStore::new();

        let created = store.create(NewInvoice::new(100.50, "Acme")).await.unwrap();
        let fetched = store.get_by_id(created.id).await.unwrap();

        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_all_empty_store() {
        let store = InMemoryInvoiceStore::new();

        let all = store.get_all().await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_get_all_returns_every_row() {
        let store = InMemoryInvoiceStore::new();

        store.create(NewInvoice::new(1.0, "A")).await.unwrap();
        store.create(NewInvoice::new(2.0, "B")).await.unwrap();
        store.create(NewInvoice::new(3.0, "C")).await.unwrap();

        assert_eq!(store.get_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = InMemoryInvoiceStore::new();
        let id = Uuid::new_v4();

        let err = store.get_by_id(id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: missing } if missing == id));
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let store = InMemoryInvoiceStore::new();
        let created = store.create(NewInvoice::new(10.0, "Acme")).await.unwrap();

        let updated = store
            .update(created.id, NewInvoice::new(25.0, "Globex"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.amount, 25.0);
        assert_eq!(updated.customer, "Globex");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryInvoiceStore::new();

        let err = store
            .update(Uuid::new_v4(), NewInvoice::new(1.0, "A"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let store = InMemoryInvoiceStore::new();
        let created = store.create(NewInvoice::new(10.0, "Acme")).await.unwrap();

        store.delete(created.id).await.unwrap();

        assert!(store.get_by_id(created.id).await.is_err());
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = InMemoryInvoiceStore::new();

        let err = store.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}

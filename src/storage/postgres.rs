//! PostgreSQL invoice store backed by `sqlx::PgPool`
//!
//! # Schema
//!
//! Invoices live in a single `invoices` table with dedicated columns for
//! every field (native UUID primary key, TIMESTAMPTZ timestamps).
//! [`ensure_schema`] creates the table when absent and is safe to call on
//! every startup; the bootstrap runs it in the development environment
//! only.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use async_trait::async_trait;

use crate::core::error::StoreError;
use crate::core::invoice::{Invoice, NewInvoice};
use crate::core::store::InvoiceStore;

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Apply the required table (idempotent).
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoices (
            id UUID PRIMARY KEY,
            amount DOUBLE PRECISION NOT NULL,
            customer TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| StoreError::backend(format!("Failed to create invoices table: {}", e)))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// PostgresInvoiceStore
// ---------------------------------------------------------------------------

/// Row shape shared by every query in this module
type InvoiceRow = (Uuid, f64, String, DateTime<Utc>, DateTime<Utc>);

fn from_row((id, amount, customer, created_at, updated_at): InvoiceRow) -> Invoice {
    Invoice {
        id,
        amount,
        customer,
        created_at,
        updated_at,
    }
}

/// Invoice store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// use sqlx::PgPool;
/// use invoicer::storage::PostgresInvoiceStore;
///
/// let pool = PgPool::connect("postgres://postgres@localhost/invoicer").await?;
/// let store = PostgresInvoiceStore::new(pool);
/// let invoice = store.create(NewInvoice::new(100.50, "Acme")).await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresInvoiceStore {
    pool: PgPool,
}

impl PostgresInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    async fn create(&self, new: NewInvoice) -> Result<Invoice, StoreError> {
        let invoice = Invoice::create(new);

        sqlx::query(
            "INSERT INTO invoices (id, amount, customer, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(invoice.id)
        .bind(invoice.amount)
        .bind(&invoice.customer)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::backend(format!("Failed to create invoice: {}", e)))?;

        Ok(invoice)
    }

    async fn get_all(&self) -> Result<Vec<Invoice>, StoreError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, amount, customer, created_at, updated_at \
             FROM invoices ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::backend(format!("Failed to list invoices: {}", e)))?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Invoice, StoreError> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, amount, customer, created_at, updated_at \
             FROM invoices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::backend(format!("Failed to get invoice: {}", e)))?;

        row.map(from_row).ok_or(StoreError::NotFound { id })
    }

    async fn update(&self, id: Uuid, changes: NewInvoice) -> Result<Invoice, StoreError> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            "UPDATE invoices SET amount = $2, customer = $3, updated_at = $4 \
             WHERE id = $1 \
             RETURNING id, amount, customer, created_at, updated_at",
        )
        .bind(id)
        .bind(changes.amount)
        .bind(&changes.customer)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::backend(format!("Failed to update invoice: {}", e)))?;

        row.map(from_row).ok_or(StoreError::NotFound { id })
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend(format!("Failed to delete invoice: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id });
        }

        Ok(())
    }
}

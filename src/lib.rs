//! # Invoicer
//!
//! An invoice CRUD microservice speaking JSON over a NATS message bus,
//! backed by PostgreSQL.
//!
//! ## Architecture
//!
//! - **Core**: the `Invoice` entity and its validation rules, the typed
//!   error hierarchy, the `InvoiceStore` port and the `InvoiceService`
//!   orchestrating the two.
//! - **Bus**: the protocol layer. A static table maps the five
//!   `invoice.*` subjects to operations; each inbound payload is decoded
//!   by an explicit per-shape decode function, executed against the
//!   service, and answered with either the entity JSON or a structured
//!   `{status, message}` error on the message's reply subject.
//! - **Storage**: `InvoiceStore` implementations, PostgreSQL via `sqlx`
//!   for production and an in-memory map for tests and development.
//! - **Config**: environment-driven settings with a `.env` fallback.
//!
//! ## Subjects
//!
//! | Subject | Request | Reply |
//! |---|---|---|
//! | `invoice.create` | invoice fields, no id | created invoice |
//! | `invoice.get` | `{"id": "<uuid>"}` | invoice |
//! | `invoice.get_all` | (ignored) | array of invoices |
//! | `invoice.update` | invoice fields with id | updated invoice |
//! | `invoice.delete` | `{"id": "<uuid>"}` | `{"status": "deleted"}` |
//!
//! Messages without a reply subject are processed fire-and-forget; the
//! result is logged and discarded.

pub mod bus;
pub mod config;
pub mod core;
pub mod storage;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::bus::{BusListener, Dispatcher, Operation};
    pub use crate::config::{AppEnv, Config};
    pub use crate::core::error::{
        ErrorResponse, InvoicerError, RequestError, StoreError, ValidationError,
    };
    pub use crate::core::invoice::{Invoice, NewInvoice};
    pub use crate::core::service::InvoiceService;
    pub use crate::core::store::InvoiceStore;
    pub use crate::storage::{InMemoryInvoiceStore, PostgresInvoiceStore};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}

//! Core module containing the invoice domain, errors, port and service

pub mod error;
pub mod invoice;
pub mod service;
pub mod store;

pub use error::{ErrorResponse, InvoicerError, RequestError, StoreError, ValidationError};
pub use invoice::{Invoice, NewInvoice};
pub use service::InvoiceService;
pub use store::InvoiceStore;

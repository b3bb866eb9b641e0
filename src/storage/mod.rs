//! Storage implementations for the invoice store port

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryInvoiceStore;
pub use postgres::PostgresInvoiceStore;

//! Invoice entity and its domain rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;

/// An invoice as stored and as published on the bus.
///
/// Fields:
/// - `id`: unique identifier, assigned by the server at creation and
///   immutable afterwards
/// - `amount`: monetary amount, strictly positive
/// - `customer`: customer name, non-empty
/// - `created_at`: set once at creation (wire name `createdAt`)
/// - `updated_at`: refreshed on every mutation (wire name `updatedAt`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub amount: f64,
    pub customer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Build a new invoice from a change set, assigning a fresh identifier
    /// and both timestamps.
    pub fn create(new: NewInvoice) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            amount: new.amount,
            customer: new.customer,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the mutable fields from a change set and refresh
    /// `updated_at`. The identifier and `created_at` are untouched.
    pub fn apply(&mut self, changes: NewInvoice) {
        self.amount = changes.amount;
        self.customer = changes.customer;
        self.touch();
    }

    /// Refresh the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// The caller-supplied portion of an invoice: everything except the
/// identifier and the server-assigned timestamps.
///
/// Used both as the creation input and as the update change set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub amount: f64,
    pub customer: String,
}

impl NewInvoice {
    pub fn new(amount: f64, customer: impl Into<String>) -> Self {
        Self {
            amount,
            customer: customer.into(),
        }
    }

    /// Check the business rules: amount strictly positive, customer
    /// non-empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.amount > 0.0) {
            return Err(ValidationError::NonPositiveAmount {
                amount: self.amount,
            });
        }
        if self.customer.trim().is_empty() {
            return Err(ValidationError::EmptyCustomer);
        }
        Ok(())
    }
}

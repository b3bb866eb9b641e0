//! Typed error handling for the invoicer service
//!
//! Every failure a bus caller can observe is mapped onto a small
//! taxonomy with HTTP-style numeric codes, carried in the reply body as
//! [`ErrorResponse`]:
//!
//! - [`RequestError`]: the payload could not be decoded into the expected
//!   request shape (400)
//! - [`ValidationError`]: the payload decoded but violates a business
//!   rule (400)
//! - [`StoreError`]: the storage backend failed; not-found is a distinct
//!   variant (404) so callers are not handed a 500 for a missing record
//! - Internal: marshaling or other unexpected faults (500)
//!
//! The codes are HTTP-like by convention only; there is no HTTP transport.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The main error type for the invoicer service
#[derive(Debug)]
pub enum InvoicerError {
    /// Request decoding errors
    Request(RequestError),

    /// Business rule violations
    Validation(ValidationError),

    /// Storage backend errors
    Store(StoreError),

    /// Configuration errors (bootstrap path only, never sent on the bus)
    Config(ConfigError),

    /// Internal faults (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for InvoicerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoicerError::Request(e) => write!(f, "{}", e),
            InvoicerError::Validation(e) => write!(f, "{}", e),
            InvoicerError::Store(e) => write!(f, "{}", e),
            InvoicerError::Config(e) => write!(f, "{}", e),
            InvoicerError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for InvoicerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvoicerError::Request(e) => Some(e),
            InvoicerError::Validation(e) => Some(e),
            InvoicerError::Store(e) => Some(e),
            InvoicerError::Config(e) => Some(e),
            InvoicerError::Internal(_) => None,
        }
    }
}

/// Error body published on the reply subject
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Numeric code with HTTP-style semantics (400, 404, 500)
    pub status: u16,
    /// Human-readable error message
    pub message: String,
}

impl InvoicerError {
    /// Get the numeric reply code for this error
    pub fn status(&self) -> u16 {
        match self {
            InvoicerError::Request(_) => 400,
            InvoicerError::Validation(_) => 400,
            InvoicerError::Store(e) => e.status(),
            InvoicerError::Config(_) => 500,
            InvoicerError::Internal(_) => 500,
        }
    }

    /// Convert to the wire error body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.status(),
            message: self.to_string(),
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors raised while decoding an inbound payload
#[derive(Debug)]
pub enum RequestError {
    /// Malformed JSON or a type mismatch against the request shape
    InvalidPayload { message: String },

    /// A creation payload carried a non-nil identifier
    IdNotAllowed { id: Uuid },

    /// An update payload carried no identifier (or the nil identifier)
    MissingId,

    /// The identifier field did not parse as a UUID
    InvalidId { value: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidPayload { message } => {
                write!(f, "Invalid request payload: {}", message)
            }
            RequestError::IdNotAllowed { id } => {
                write!(f, "Identifier '{}' must not be supplied at creation", id)
            }
            RequestError::MissingId => {
                write!(f, "A non-nil identifier is required")
            }
            RequestError::InvalidId { value } => {
                write!(f, "Invalid identifier format: '{}'", value)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl From<RequestError> for InvoicerError {
    fn from(err: RequestError) -> Self {
        InvoicerError::Request(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Business rule violations on the invoice fields
#[derive(Debug)]
pub enum ValidationError {
    /// Amount must be strictly positive
    NonPositiveAmount { amount: f64 },

    /// Customer name must be non-empty
    EmptyCustomer,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NonPositiveAmount { amount } => {
                write!(f, "Amount must be positive (got {})", amount)
            }
            ValidationError::EmptyCustomer => {
                write!(f, "Customer name must not be empty")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for InvoicerError {
    fn from(err: ValidationError) -> Self {
        InvoicerError::Validation(err)
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors surfaced by the storage port.
///
/// `NotFound` is deliberately distinguishable from backend failure: the
/// dispatcher answers 404 for the former and 500 for the latter.
#[derive(Debug)]
pub enum StoreError {
    /// No row with the given identifier
    NotFound { id: Uuid },

    /// The backend failed to execute the operation
    Backend { message: String },
}

impl StoreError {
    pub fn status(&self) -> u16 {
        match self {
            StoreError::NotFound { .. } => 404,
            StoreError::Backend { .. } => 500,
        }
    }

    pub fn backend(message: impl fmt::Display) -> Self {
        StoreError::Backend {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { id } => {
                write!(f, "Invoice '{}' not found", id)
            }
            StoreError::Backend { message } => {
                write!(f, "Storage error: {}", message)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for InvoicerError {
    fn from(err: StoreError) -> Self {
        InvoicerError::Store(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors raised while loading the process configuration
#[derive(Debug)]
pub enum ConfigError {
    /// A required environment variable is not set
    MissingVar { name: &'static str },

    /// An environment variable holds an unusable value
    InvalidValue { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar { name } => {
                write!(f, "{} is not set in environment", name)
            }
            ConfigError::InvalidValue { name, value } => {
                write!(f, "Invalid value '{}' for {}", value, name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for InvoicerError {
    fn from(err: ConfigError) -> Self {
        InvoicerError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for InvoicerError {
    fn from(err: serde_json::Error) -> Self {
        InvoicerError::Request(RequestError::InvalidPayload {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_status() {
        let err: InvoicerError = RequestError::MissingId.into();
        assert_eq!(err.status(), 400);

        let err: InvoicerError = RequestError::InvalidId {
            value: "nope".to_string(),
        }
        .into();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_validation_error_status() {
        let err: InvoicerError = ValidationError::NonPositiveAmount { amount: -1.0 }.into();
        assert_eq!(err.status(), 400);

        let err: InvoicerError = ValidationError::EmptyCustomer.into();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_store_error_status_distinguishes_not_found() {
        let not_found: InvoicerError = StoreError::NotFound { id: Uuid::nil() }.into();
        assert_eq!(not_found.status(), 404);

        let backend: InvoicerError = StoreError::backend("connection refused").into();
        assert_eq!(backend.status(), 500);
    }

    #[test]
    fn test_not_found_display_names_the_id() {
        let id = Uuid::new_v4();
        let err = StoreError::NotFound { id };
        assert!(err.to_string().contains(&id.to_string()));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_error_response_wire_shape() {
        let err: InvoicerError = StoreError::NotFound { id: Uuid::nil() }.into();
        let response = err.to_response();

        assert_eq!(response.status, 404);
        assert!(!response.message.is_empty());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], 404);
        assert!(json["message"].is_string());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: InvoicerError = json_err.into();
        assert!(matches!(
            err,
            InvoicerError::Request(RequestError::InvalidPayload { .. })
        ));
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_config_error_display_and_status() {
        let err = ConfigError::MissingVar { name: "NATS_URL" };
        assert!(err.to_string().contains("NATS_URL"));

        let err: InvoicerError = err.into();
        assert_eq!(err.status(), 500);
    }
}

//! Protocol layer mapping bus subjects onto invoice operations
//!
//! Each inbound payload is decoded by an explicit per-shape decode
//! function, executed against the [`InvoiceService`], and answered with
//! exactly one reply body: the entity JSON on success, a structured
//! `{status, message}` object on failure. Decoding is strict; malformed
//! JSON or a type mismatch is a 400, never a crash.
//!
//! The subject set is a closed enum ([`Operation`]), so the
//! subject-to-handler mapping is exhaustive by construction and the
//! whole layer is unit-testable without a bus connection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::core::error::{InvoicerError, RequestError};
use crate::core::invoice::NewInvoice;
use crate::core::service::InvoiceService;

// ---------------------------------------------------------------------------
// Subject table
// ---------------------------------------------------------------------------

/// The five bus operations and their fixed subject names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
    GetAll,
    Update,
    Delete,
}

impl Operation {
    /// Every operation, in subscription order
    pub const ALL: [Operation; 5] = [
        Operation::Create,
        Operation::Get,
        Operation::GetAll,
        Operation::Update,
        Operation::Delete,
    ];

    /// The subject this operation listens on
    pub fn subject(self) -> &'static str {
        match self {
            Operation::Create => "invoice.create",
            Operation::Get => "invoice.get",
            Operation::GetAll => "invoice.get_all",
            Operation::Update => "invoice.update",
            Operation::Delete => "invoice.delete",
        }
    }

    /// Reverse lookup from a subject name
    pub fn from_subject(subject: &str) -> Option<Operation> {
        Operation::ALL.into_iter().find(|op| op.subject() == subject)
    }
}

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

/// Inbound invoice body shared by create and update.
///
/// The identifier is optional at this level; create and update apply
/// opposite rules to it. Unknown fields are ignored, wrong types are
/// decode errors.
#[derive(Debug, Deserialize)]
struct InvoicePayload {
    #[serde(default)]
    id: Option<Uuid>,
    amount: f64,
    customer: String,
}

/// Inbound identifier envelope for get and delete, `{"id": "<uuid>"}`
#[derive(Debug, Deserialize)]
struct IdPayload {
    id: String,
}

/// Acknowledgement body for successful deletions
#[derive(Debug, Serialize)]
struct DeleteAck {
    status: &'static str,
}

/// Decode a creation payload. A non-nil identifier is rejected; the nil
/// identifier counts as absent.
fn decode_create(payload: &[u8]) -> Result<NewInvoice, InvoicerError> {
    let body: InvoicePayload = serde_json::from_slice(payload)?;

    if let Some(id) = body.id
        && !id.is_nil()
    {
        return Err(RequestError::IdNotAllowed { id }.into());
    }

    Ok(NewInvoice::new(body.amount, body.customer))
}

/// Decode an update payload. A non-nil identifier is required.
fn decode_update(payload: &[u8]) -> Result<(Uuid, NewInvoice), InvoicerError> {
    let body: InvoicePayload = serde_json::from_slice(payload)?;

    match body.id {
        Some(id) if !id.is_nil() => Ok((id, NewInvoice::new(body.amount, body.customer))),
        _ => Err(RequestError::MissingId.into()),
    }
}

/// Decode an identifier envelope like
/// `{"id": "c8b0a72d-afe5-464e-81d6-d24b2f92ff2d"}`.
fn decode_id(payload: &[u8]) -> Result<Uuid, InvoicerError> {
    let body: IdPayload = serde_json::from_slice(payload)?;

    Uuid::parse_str(&body.id)
        .map_err(|_| RequestError::InvalidId { value: body.id }.into())
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Executes bus operations against the invoice service and encodes the
/// reply bodies.
///
/// Holds no per-request state; a single instance is shared by all
/// in-flight messages.
pub struct Dispatcher {
    service: Arc<InvoiceService>,
}

impl Dispatcher {
    pub fn new(service: Arc<InvoiceService>) -> Self {
        Self { service }
    }

    /// Handle one inbound message and produce exactly one reply body.
    ///
    /// Failures are logged here with the subject and a payload excerpt,
    /// then encoded as `{status, message}`. Whether the body is actually
    /// published depends on the message carrying a reply subject, which
    /// is the caller's concern.
    pub async fn dispatch(&self, op: Operation, payload: &[u8]) -> Vec<u8> {
        match self.execute(op, payload).await {
            Ok(body) => body,
            Err(err) => {
                error!(
                    subject = op.subject(),
                    payload = %excerpt(payload),
                    error = %err,
                    "Request failed"
                );
                encode_error(&err)
            }
        }
    }

    async fn execute(&self, op: Operation, payload: &[u8]) -> Result<Vec<u8>, InvoicerError> {
        match op {
            Operation::Create => {
                let new = decode_create(payload)?;
                encode(&self.service.create(new).await?)
            }
            Operation::Get => {
                let id = decode_id(payload)?;
                encode(&self.service.get_by_id(id).await?)
            }
            Operation::GetAll => encode(&self.service.get_all().await?),
            Operation::Update => {
                let (id, changes) = decode_update(payload)?;
                encode(&self.service.update(id, changes).await?)
            }
            Operation::Delete => {
                let id = decode_id(payload)?;
                self.service.delete(id).await?;
                encode(&DeleteAck { status: "deleted" })
            }
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, InvoicerError> {
    serde_json::to_vec(value)
        .map_err(|e| InvoicerError::Internal(format!("Failed to marshal response: {}", e)))
}

fn encode_error(err: &InvoicerError) -> Vec<u8> {
    serde_json::to_vec(&err.to_response())
        .unwrap_or_else(|_| br#"{"status":500,"message":"Internal error"}"#.to_vec())
}

/// Short lossy preview of a payload for log context
fn excerpt(payload: &[u8]) -> String {
    const MAX_CHARS: usize = 256;

    let text = String::from_utf8_lossy(payload);
    if text.chars().count() > MAX_CHARS {
        let truncated: String = text.chars().take(MAX_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bytes(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_subject_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_subject(op.subject()), Some(op));
        }
        assert_eq!(Operation::from_subject("invoice.unknown"), None);
    }

    #[test]
    fn test_decode_create_without_id() {
        let new = decode_create(&bytes(json!({"amount": 100.5, "customer": "Acme"}))).unwrap();
        assert_eq!(new.amount, 100.5);
        assert_eq!(new.customer, "Acme");
    }

    #[test]
    fn test_decode_create_accepts_nil_id() {
        let payload = bytes(json!({
            "id": Uuid::nil(),
            "amount": 10.0,
            "customer": "Acme"
        }));
        assert!(decode_create(&payload).is_ok());
    }

    #[test]
    fn test_decode_create_rejects_supplied_id() {
        let payload = bytes(json!({
            "id": Uuid::new_v4(),
            "amount": 10.0,
            "customer": "Acme"
        }));
        let err = decode_create(&payload).unwrap_err();
        assert!(matches!(
            err,
            InvoicerError::Request(RequestError::IdNotAllowed { .. })
        ));
    }

    #[test]
    fn test_decode_create_rejects_wrong_types() {
        let payload = bytes(json!({"amount": "a lot", "customer": "Acme"}));
        let err = decode_create(&payload).unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_decode_create_ignores_unknown_fields() {
        let payload = bytes(json!({
            "amount": 10.0,
            "customer": "Acme",
            "currency": "EUR"
        }));
        assert!(decode_create(&payload).is_ok());
    }

    #[test]
    fn test_decode_update_requires_id() {
        let missing = bytes(json!({"amount": 10.0, "customer": "Acme"}));
        assert!(matches!(
            decode_update(&missing).unwrap_err(),
            InvoicerError::Request(RequestError::MissingId)
        ));

        let nil = bytes(json!({
            "id": Uuid::nil(),
            "amount": 10.0,
            "customer": "Acme"
        }));
        assert!(matches!(
            decode_update(&nil).unwrap_err(),
            InvoicerError::Request(RequestError::MissingId)
        ));
    }

    #[test]
    fn test_decode_update_with_id() {
        let id = Uuid::new_v4();
        let (decoded_id, changes) = decode_update(&bytes(json!({
            "id": id,
            "amount": 25.0,
            "customer": "Globex"
        })))
        .unwrap();

        assert_eq!(decoded_id, id);
        assert_eq!(changes.amount, 25.0);
    }

    #[test]
    fn test_decode_id() {
        let id = Uuid::new_v4();
        assert_eq!(decode_id(&bytes(json!({"id": id}))).unwrap(), id);
    }

    #[test]
    fn test_decode_id_rejects_garbage() {
        let err = decode_id(&bytes(json!({"id": "not-a-uuid"}))).unwrap_err();
        assert!(matches!(
            err,
            InvoicerError::Request(RequestError::InvalidId { .. })
        ));

        let err = decode_id(b"{broken").unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_excerpt_truncates_long_payloads() {
        let long = "x".repeat(10_000);
        let shown = excerpt(long.as_bytes());
        assert!(shown.len() < 300);
        assert!(shown.ends_with("..."));

        assert_eq!(excerpt(b"{\"id\":1}"), "{\"id\":1}");
    }
}

//! Audit logging for security-relevant events.
//!
//! Signed requests and callback decisions are logged on the `audit` tracing
//! target so they can be routed to a separate sink. Events carry a UUID
//! correlation ID and never include the shared secret or full signatures.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Types of auditable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// An outbound request or payment form was signed.
    RequestSigned,
    /// An inbound callback passed every check.
    CallbackAccepted,
    /// An inbound callback failed a check.
    CallbackRejected,
}

/// Contextual details for an audit event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditDetails {
    /// Gateway operation name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Merchant-side order or payment identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Source address of an inbound callback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Audit log entry.
///
/// # Examples
///
/// ```
/// use piastrix::audit::{AuditEvent, AuditEventType, audit_log};
///
/// let event = AuditEvent::new(AuditEventType::RequestSigned)
///     .with_operation("bill")
///     .with_reference("order-42");
///
/// audit_log(&event);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the event occurred.
    pub timestamp: SystemTime,
    /// What happened.
    pub event_type: AuditEventType,
    /// Correlation ID.
    pub request_id: Uuid,
    /// Event details.
    pub details: AuditDetails,
}

impl AuditEvent {
    /// Creates a new audit event with a fresh correlation ID.
    #[must_use]
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            timestamp: SystemTime::now(),
            event_type,
            request_id: Uuid::new_v4(),
            details: AuditDetails::default(),
        }
    }

    /// Adds the gateway operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.details.operation = Some(operation.into());
        self
    }

    /// Adds the merchant-side reference (order or payment ID).
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.details.reference = Some(reference.into());
        self
    }

    /// Adds the callback source address.
    #[must_use]
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.details.remote_addr = Some(addr.into());
        self
    }

    /// Adds a failure description.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.details.error = Some(error.into());
        self
    }
}

/// Logs an audit event on the `audit` tracing target.
pub fn audit_log(event: &AuditEvent) {
    tracing::info!(
        target: "audit",
        timestamp = ?event.timestamp,
        event_type = ?event.event_type,
        request_id = %event.request_id,
        details = ?event.details,
        "AUDIT"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_details() {
        let event = AuditEvent::new(AuditEventType::CallbackRejected)
            .with_remote_addr("8.8.8.8")
            .with_error("IP address 8.8.8.8 is not in allowed IP addresses");

        assert_eq!(event.event_type, AuditEventType::CallbackRejected);
        assert_eq!(event.details.remote_addr.as_deref(), Some("8.8.8.8"));
        assert!(event.details.operation.is_none());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = AuditEvent::new(AuditEventType::RequestSigned);
        let b = AuditEvent::new(AuditEventType::RequestSigned);
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_details_skip_empty_fields() {
        let event = AuditEvent::new(AuditEventType::RequestSigned)
            .with_operation("shop_balance");
        let json = serde_json::to_value(&event.details).unwrap();

        assert_eq!(json, serde_json::json!({"operation": "shop_balance"}));
    }

    #[test]
    fn test_event_type_serialization() {
        let kind = AuditEventType::CallbackAccepted;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"callback_accepted\"");
    }
}

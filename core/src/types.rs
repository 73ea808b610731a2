//! Payload records exchanged with the gateway.
//!
//! # Design
//! The client forwards these without interpreting business fields. Each
//! record names the fields the client itself needs (the order id for paths,
//! the fields that feed callback signatures) and keeps everything else in a
//! flattened `extra` map, so fields the gateway adds later pass through
//! untouched. Response fields are kept as raw JSON values: the gateway may
//! send an amount as a number or a string, and either must decode. Response
//! records are `Default` so the refund operation can hand back a zero-valued
//! result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Credentials sent to the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

/// Bearer token issued by the login endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub token: String,
    /// The login response's `date` header, copied verbatim.
    #[serde(skip)]
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a one-off payment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub order_id: String,
    /// Decimal amount in the gateway's string notation, e.g. `"1250.00"`.
    pub amount: String,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a charge against a previously saved payment method.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPaymentRequest {
    pub order_id: String,
    /// Identifier of the original payment whose saved method is charged.
    pub recurring_id: String,
    pub amount: String,
    pub currency: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Gateway answer to a payment creation or recurring charge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    #[serde(default)]
    pub order_id: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    /// Hosted payment page the customer is sent to, when one applies.
    #[serde(default)]
    pub payment_url: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// State of an order, returned by status lookups and refunds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    #[serde(default)]
    pub order_id: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a refund. `order_id` also selects the refund path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub order_id: String,
    /// Partial refund amount; the full amount is refunded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

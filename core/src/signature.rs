//! Signatures on payment-status callbacks.
//!
//! The gateway signs each callback it sends to the integrator with
//! `sha512(secretKey;event;orderId;createDate;paymentMethod;currency;customerEmail)`,
//! hex-encoded in lowercase. Field order is part of the scheme.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

/// The ordered inputs of a callback signature.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignatureFields {
    pub secret_key: String,
    pub event: String,
    pub order_id: String,
    pub create_date: String,
    pub payment_method: String,
    pub currency: String,
    pub customer_email: String,
}

impl SignatureFields {
    fn message(&self) -> String {
        [
            self.secret_key.as_str(),
            self.event.as_str(),
            self.order_id.as_str(),
            self.create_date.as_str(),
            self.payment_method.as_str(),
            self.currency.as_str(),
            self.customer_email.as_str(),
        ]
        .join(";")
    }
}

impl fmt::Debug for SignatureFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureFields")
            .field("secret_key", &"<redacted>")
            .field("event", &self.event)
            .field("order_id", &self.order_id)
            .field("create_date", &self.create_date)
            .field("payment_method", &self.payment_method)
            .field("currency", &self.currency)
            .field("customer_email", &self.customer_email)
            .finish()
    }
}

/// Lowercase hex SHA-512 over the `;`-joined fields.
pub fn generate_signature(fields: &SignatureFields) -> String {
    let digest = Sha512::digest(fields.message().as_bytes());
    hex::encode(digest)
}

/// Whether `candidate` is the signature of `fields`.
// TODO: compare in constant time (subtle::ConstantTimeEq) once the callback
// receiver is exposed beyond the integrator's private network.
pub fn verify_signature(candidate: &str, fields: &SignatureFields) -> bool {
    candidate == generate_signature(fields)
}

/// Payment-status callback as posted by the gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallback {
    pub event: String,
    pub order_id: String,
    pub create_date: String,
    pub payment_method: String,
    pub currency: String,
    #[serde(default)]
    pub customer_email: String,
    pub signature: String,
}

impl PaymentCallback {
    pub fn signature_fields(&self, secret_key: &str) -> SignatureFields {
        SignatureFields {
            secret_key: secret_key.to_string(),
            event: self.event.clone(),
            order_id: self.order_id.clone(),
            create_date: self.create_date.clone(),
            payment_method: self.payment_method.clone(),
            currency: self.currency.clone(),
            customer_email: self.customer_email.clone(),
        }
    }

    /// Check the carried signature against the shared secret.
    pub fn verify(&self, secret_key: &str) -> bool {
        verify_signature(&self.signature, &self.signature_fields(secret_key))
    }
}

//! Blocking client core for a remote payment-processing gateway.
//!
//! # Overview
//! Authenticates against the gateway, creates one-off and recurring
//! payments, looks up orders, issues refunds and verifies the signatures
//! the gateway puts on payment-status callbacks.
//!
//! # Design
//! - Every operation is a row of the `Endpoint` table (path, method, auth)
//!   run through one routine, `dispatch`, which returns a `GatewayResponse`
//!   with status, `date` header, raw body and decoded payload.
//! - `GatewayClient` is stateless apart from its immutable `GatewayConfig`;
//!   each call builds its own HTTP agent with the configured timeouts.
//! - Operations are split into `build_*` (pure) and an executing method, so
//!   request construction is testable without a network.
//! - Callback signatures live in `signature` and never touch the network.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod signature;
pub mod types;

pub use client::GatewayClient;
pub use config::GatewayConfig;
pub use dispatch::{dispatch, interpret, resolve_url};
pub use error::{ConfigError, DispatchError, GatewayError};
pub use http::{Endpoint, GatewayRequest, GatewayResponse, HttpMethod, HttpResponse};
pub use signature::{generate_signature, verify_signature, PaymentCallback, SignatureFields};
pub use types::{
    AuthRequest, AuthResponse, CreatePaymentRequest, OrderStatus, PaymentResponse, RecurringPaymentRequest,
    RefundRequest,
};

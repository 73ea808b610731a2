//! Blocking client for the payment gateway.
//!
//! # Design
//! `GatewayClient` holds only its `GatewayConfig` and carries no mutable
//! state between calls, so it can be shared freely across threads. Each
//! operation is split into a `build_*` method that produces a
//! `GatewayRequest` without I/O and an executing method that runs it through
//! `dispatch`. The bearer token is passed per call; storing and refreshing
//! it is the caller's job.

use serde::Serialize;
use tracing::warn;

use crate::config::GatewayConfig;
use crate::dispatch::dispatch;
use crate::error::GatewayError;
use crate::http::{Endpoint, GatewayRequest, GatewayResponse};
use crate::signature::{self, SignatureFields};
use crate::types::{
    AuthRequest, AuthResponse, CreatePaymentRequest, OrderStatus, PaymentResponse, RecurringPaymentRequest,
    RefundRequest,
};

const OK_STATUS: u16 = 200;

#[derive(Debug, Clone)]
pub struct GatewayClient {
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn build_authenticate(&self) -> Result<GatewayRequest, GatewayError> {
        let body = encode(&AuthRequest {
            username: self.config.login.clone(),
            password: self.config.password.clone(),
        })?;
        Ok(GatewayRequest::for_endpoint(Endpoint::Login, None).with_body(body))
    }

    pub fn build_create_payment(
        &self,
        input: &CreatePaymentRequest,
        token: &str,
    ) -> Result<GatewayRequest, GatewayError> {
        let body = encode(input)?;
        Ok(GatewayRequest::for_endpoint(Endpoint::CreatePayment, Some(token)).with_body(body))
    }

    pub fn build_charge_recurring(
        &self,
        input: &RecurringPaymentRequest,
        token: &str,
    ) -> Result<GatewayRequest, GatewayError> {
        let body = encode(input)?;
        Ok(GatewayRequest::for_endpoint(Endpoint::RecurringPayment, Some(token)).with_body(body))
    }

    pub fn build_order_status(&self, order_id: &str, token: &str) -> GatewayRequest {
        GatewayRequest::for_endpoint(Endpoint::OrderStatus(order_id), Some(token))
    }

    pub fn build_refund(&self, input: &RefundRequest, token: &str) -> Result<GatewayRequest, GatewayError> {
        let body = encode(input)?;
        Ok(GatewayRequest::for_endpoint(Endpoint::Refund(&input.order_id), Some(token)).with_body(body))
    }

    /// Log in with the configured credentials and obtain a bearer token.
    ///
    /// The response's `date` header is copied onto the returned value.
    pub fn authenticate(&self) -> Result<AuthResponse, GatewayError> {
        let request = self.build_authenticate()?;
        let response = dispatch::<AuthResponse>(&self.config, &request)?;
        let mut auth = response.data;
        auth.date = response.date;
        Ok(auth)
    }

    pub fn create_payment(
        &self,
        input: &CreatePaymentRequest,
        token: &str,
    ) -> Result<GatewayResponse<PaymentResponse>, GatewayError> {
        let request = self.build_create_payment(input, token)?;
        Ok(dispatch(&self.config, &request)?)
    }

    pub fn charge_recurring(
        &self,
        input: &RecurringPaymentRequest,
        token: &str,
    ) -> Result<GatewayResponse<PaymentResponse>, GatewayError> {
        let request = self.build_charge_recurring(input, token)?;
        Ok(dispatch(&self.config, &request)?)
    }

    /// Look up an order. Any status other than 500 is decoded and returned,
    /// so check `GatewayResponse::status` for 4xx answers.
    pub fn order_status(&self, order_id: &str, token: &str) -> Result<GatewayResponse<OrderStatus>, GatewayError> {
        let request = self.build_order_status(order_id, token);
        Ok(dispatch(&self.config, &request)?)
    }

    /// Refund an order.
    ///
    /// A dispatch failure is returned only when the gateway's status was not
    /// 200. When the gateway answered 200 but the body could not be decoded,
    /// the failure is logged and an empty `OrderStatus` is returned.
    pub fn refund(&self, input: &RefundRequest, token: &str) -> Result<OrderStatus, GatewayError> {
        let request = self.build_refund(input, token)?;
        match dispatch::<OrderStatus>(&self.config, &request) {
            Ok(response) => Ok(response.data),
            Err(err) if err.status() == Some(OK_STATUS) => {
                warn!(order_id = %input.order_id, error = %err, "refund accepted with unreadable response");
                Ok(OrderStatus::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn generate_signature(fields: &SignatureFields) -> String {
        signature::generate_signature(fields)
    }

    pub fn verify_signature(candidate: &str, fields: &SignatureFields) -> bool {
        signature::verify_signature(candidate, fields)
    }
}

fn encode<T: Serialize>(input: &T) -> Result<Vec<u8>, GatewayError> {
    serde_json::to_vec(input).map_err(GatewayError::Encode)
}

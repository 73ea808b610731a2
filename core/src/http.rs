//! HTTP-level data for talking to the gateway.
//!
//! # Design
//! Requests and responses are plain data. `GatewayClient::build_*` produces a
//! `GatewayRequest` without touching the network; the dispatcher executes
//! it and hands back a `GatewayResponse` carrying the status, the `date`
//! header, the raw body and the decoded payload by value.
//!
//! Endpoints live in one table (`Endpoint`) so every operation shares the
//! same description of path, method and whether a bearer token is needed.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

pub const LOGIN_PATH: &str = "/v1/login_check";
pub const CREATE_PAYMENT_PATH: &str = "/v1/payment";
pub const RECURRING_PAYMENT_PATH: &str = "/v1/payment/recurring";
/// Historical template without a leading slash; URL resolution joins it
/// with exactly one `/`.
pub const ORDER_PATH: &str = "v1/order/";
pub const REFUND_SUFFIX: &str = "/refund";

/// Every gateway endpoint the client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Login,
    CreatePayment,
    RecurringPayment,
    OrderStatus(&'a str),
    Refund(&'a str),
}

impl Endpoint<'_> {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => LOGIN_PATH.to_string(),
            Endpoint::CreatePayment => CREATE_PAYMENT_PATH.to_string(),
            Endpoint::RecurringPayment => RECURRING_PAYMENT_PATH.to_string(),
            Endpoint::OrderStatus(order_id) => format!("{ORDER_PATH}{order_id}"),
            Endpoint::Refund(order_id) => format!("/{ORDER_PATH}{order_id}{REFUND_SUFFIX}"),
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::OrderStatus(_) => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Endpoint::Login)
    }
}

/// A gateway request described as plain data.
///
/// `bearer` being `Some` is what makes the dispatcher attach the
/// `AuthorizationJWT` header. The token is sent as-is; an empty one is the
/// caller's problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    pub method: HttpMethod,
    pub path: String,
    /// Applied in order; a key set later overwrites an earlier one.
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub bearer: Option<String>,
}

impl GatewayRequest {
    /// Start a request for `endpoint`. Authenticated endpoints get `token`.
    pub fn for_endpoint(endpoint: Endpoint<'_>, token: Option<&str>) -> Self {
        let bearer = if endpoint.requires_auth() {
            Some(token.unwrap_or_default().to_string())
        } else {
            None
        };
        Self {
            method: endpoint.method(),
            path: endpoint.path(),
            query: Vec::new(),
            body: None,
            bearer,
        }
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// The `AuthorizationJWT` header value, when the request is authenticated.
    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_ref().map(|token| format!("Bearer {token}"))
    }
}

/// A received HTTP response, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// The `date` header, verbatim.
    pub date: Option<String>,
    pub body: Vec<u8>,
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse<T> {
    pub status: u16,
    pub date: Option<String>,
    /// Raw body bytes, for callers that log or archive them.
    pub body: Vec<u8>,
    pub data: T,
}

impl<T> GatewayResponse<T> {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

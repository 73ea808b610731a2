//! In-process stand-in for the payment gateway.
//!
//! Speaks the same wire protocol as the real gateway (login, payments,
//! recurring charges, order lookup, refunds) with in-memory state. Every
//! response carries the fixed `date` header `MOCK_DATE`, and
//! `GatewayState::inject` scripts the next answer for a path so tests can
//! provoke server errors and malformed bodies. Request URIs are recorded as
//! received, query string included.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const MOCK_DATE: &str = "Sat, 17 Oct 2026 12:00:00 GMT";
pub const AUTH_HEADER: &str = "AuthorizationJWT";
pub const DEFAULT_LOGIN: &str = "merchant";
pub const DEFAULT_PASSWORD: &str = "secret";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub status: String,
    pub amount: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refunded_amount: Option<String>,
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewPayment {
    order_id: String,
    amount: String,
    currency: String,
    payment_method: Option<String>,
    customer_email: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecurringCharge {
    order_id: String,
    recurring_id: String,
    amount: String,
    currency: String,
}

#[derive(Deserialize)]
struct RefundBody {
    amount: Option<String>,
}

#[derive(Clone, Debug)]
struct Fault {
    status: StatusCode,
    body: String,
}

/// Shared state behind the router. Cheap to clone.
#[derive(Clone)]
pub struct GatewayState {
    login: Arc<str>,
    password: Arc<str>,
    tokens: Arc<RwLock<HashSet<String>>>,
    orders: Arc<RwLock<HashMap<String, Order>>>,
    // The std mutexes below are never held across an await.
    faults: Arc<Mutex<HashMap<String, Fault>>>,
    received: Arc<Mutex<Vec<String>>>,
}

impl GatewayState {
    pub fn new(login: &str, password: &str) -> Self {
        Self {
            login: Arc::from(login),
            password: Arc::from(password),
            tokens: Arc::default(),
            orders: Arc::default(),
            faults: Arc::default(),
            received: Arc::default(),
        }
    }

    /// Answer the next request whose path is `path` with `status` and a raw
    /// `body`, bypassing the normal handler. One-shot.
    pub fn inject(&self, path: &str, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), Fault { status, body: body.to_string() });
    }

    /// Path and query of every request seen so far, oldest first.
    pub fn received_uris(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, uri: &str) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(uri.to_string());
    }

    fn take_fault(&self, path: &str) -> Option<Fault> {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
    }

    async fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let token = headers
            .get(AUTH_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));
        match token {
            Some(token) => self.tokens.read().await.contains(token),
            None => false,
        }
    }
}

impl Default for GatewayState {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN, DEFAULT_PASSWORD)
    }
}

pub fn app() -> Router {
    app_with_state(GatewayState::default())
}

pub fn app_with_state(state: GatewayState) -> Router {
    Router::new()
        .route("/v1/login_check", post(login))
        .route("/v1/payment", post(create_payment))
        .route("/v1/payment/recurring", post(charge_recurring))
        .route("/v1/order/{id}", get(get_order))
        .route("/v1/order/{id}/refund", post(refund))
        .layer(middleware::from_fn_with_state(state.clone(), intercept))
        .layer(middleware::from_fn(stamp_date))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: GatewayState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock gateway listening");
    }
    axum::serve(listener, app_with_state(state)).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "code": status.as_u16(), "message": message }))).into_response()
}

async fn intercept(State(state): State<GatewayState>, request: Request, next: Next) -> Response {
    state.record(&request.uri().to_string());
    if let Some(fault) = state.take_fault(request.uri().path()) {
        debug!(path = request.uri().path(), status = fault.status.as_u16(), "serving injected fault");
        return (fault.status, fault.body).into_response();
    }
    next.run(request).await
}

async fn stamp_date(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::DATE, HeaderValue::from_static(MOCK_DATE));
    response
}

async fn login(State(state): State<GatewayState>, Json(input): Json<Credentials>) -> Response {
    if input.username != *state.login || input.password != *state.password {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials.");
    }
    let token = Uuid::new_v4().simple().to_string();
    state.tokens.write().await.insert(token.clone());
    Json(json!({ "token": token })).into_response()
}

async fn create_payment(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(input): Json<NewPayment>,
) -> Response {
    if !state.is_authorized(&headers).await {
        return error(StatusCode::UNAUTHORIZED, "JWT Token not found");
    }
    let mut orders = state.orders.write().await;
    if orders.contains_key(&input.order_id) {
        return error(StatusCode::BAD_REQUEST, "Order already exists");
    }
    let order = Order {
        order_id: input.order_id.clone(),
        status: "pending".to_string(),
        amount: input.amount,
        currency: input.currency,
        payment_method: input.payment_method,
        customer_email: input.customer_email,
        refunded_amount: None,
    };
    orders.insert(order.order_id.clone(), order);
    Json(json!({
        "orderId": input.order_id,
        "status": "pending",
        "paymentUrl": format!("https://pay.mock/checkout/{}", input.order_id),
    }))
    .into_response()
}

async fn charge_recurring(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(input): Json<RecurringCharge>,
) -> Response {
    if !state.is_authorized(&headers).await {
        return error(StatusCode::UNAUTHORIZED, "JWT Token not found");
    }
    let mut orders = state.orders.write().await;
    let Some(parent) = orders.get(&input.recurring_id).cloned() else {
        return error(StatusCode::NOT_FOUND, "Recurring order not found");
    };
    let order = Order {
        order_id: input.order_id.clone(),
        status: "paid".to_string(),
        amount: input.amount,
        currency: input.currency,
        payment_method: parent.payment_method,
        customer_email: parent.customer_email,
        refunded_amount: None,
    };
    orders.insert(order.order_id.clone(), order);
    Json(json!({ "orderId": input.order_id, "status": "paid" })).into_response()
}

async fn get_order(State(state): State<GatewayState>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    if !state.is_authorized(&headers).await {
        return error(StatusCode::UNAUTHORIZED, "JWT Token not found");
    }
    match state.orders.read().await.get(&id) {
        Some(order) => Json(order.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn refund(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<RefundBody>,
) -> Response {
    if !state.is_authorized(&headers).await {
        return error(StatusCode::UNAUTHORIZED, "JWT Token not found");
    }
    let mut orders = state.orders.write().await;
    let Some(order) = orders.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, "Order not found");
    };
    order.refunded_amount = Some(input.amount.unwrap_or_else(|| order.amount.clone()));
    order.status = "refunded".to_string();
    Json(order.clone()).into_response()
}

use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_gateway::{app, app_with_state, GatewayState, Order, AUTH_HEADER, MOCK_DATE};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json; charset=utf-8");
    if let Some(token) = token {
        builder = builder.header(AUTH_HEADER, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

fn get_request(uri: &str, token: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(AUTH_HEADER, format!("Bearer {token}"))
        .body(String::new())
        .unwrap()
}

async fn login(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/login_check",
            None,
            r#"{"username":"merchant","password":"secret"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    body["token"].as_str().unwrap().to_string()
}

async fn create_order(app: &Router, token: &str, order_id: &str) {
    let body = format!(r#"{{"orderId":"{order_id}","amount":"100.00","currency":"RUB","paymentMethod":"card"}}"#);
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/v1/payment", Some(token), &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- login ---

#[tokio::test]
async fn login_returns_token_and_date() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/v1/login_check",
            None,
            r#"{"username":"merchant","password":"secret"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::DATE], MOCK_DATE);
    let body: serde_json::Value = body_json(resp).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/v1/login_check",
            None,
            r#"{"username":"merchant","password":"nope"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["code"], 401);
}

// --- payments ---

#[tokio::test]
async fn create_payment_requires_token() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/v1/payment",
            Some("forged"),
            r#"{"orderId":"ORD-1","amount":"1.00","currency":"RUB"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_payment_returns_payment_url() {
    let app = app();
    let token = login(&app).await;
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/payment",
            Some(&token),
            r#"{"orderId":"ORD-1","amount":"1.00","currency":"RUB"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["orderId"], "ORD-1");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["paymentUrl"], "https://pay.mock/checkout/ORD-1");
}

#[tokio::test]
async fn create_payment_rejects_duplicate_order() {
    let app = app();
    let token = login(&app).await;
    create_order(&app, &token, "ORD-1").await;
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/payment",
            Some(&token),
            r#"{"orderId":"ORD-1","amount":"1.00","currency":"RUB"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recurring_charge_inherits_payment_method() {
    let app = app();
    let token = login(&app).await;
    create_order(&app, &token, "ORD-1").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/payment/recurring",
            Some(&token),
            r#"{"orderId":"ORD-2","recurringId":"ORD-1","amount":"50.00","currency":"RUB"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot(get_request("/v1/order/ORD-2", &token)).await.unwrap();
    let order: Order = body_json(resp).await;
    assert_eq!(order.status, "paid");
    assert_eq!(order.payment_method.as_deref(), Some("card"));
}

#[tokio::test]
async fn recurring_charge_unknown_parent_is_404() {
    let app = app();
    let token = login(&app).await;
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/payment/recurring",
            Some(&token),
            r#"{"orderId":"ORD-2","recurringId":"missing","amount":"50.00","currency":"RUB"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- orders ---

#[tokio::test]
async fn get_unknown_order_is_json_404() {
    let app = app();
    let token = login(&app).await;
    let resp = app.clone().oneshot(get_request("/v1/order/nope", &token)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "Order not found");
}

#[tokio::test]
async fn refund_defaults_to_full_amount() {
    let app = app();
    let token = login(&app).await;
    create_order(&app, &token, "ORD-1").await;

    let resp = app
        .clone()
        .oneshot(json_request("POST", "/v1/order/ORD-1/refund", Some(&token), r#"{"orderId":"ORD-1"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Order = body_json(resp).await;
    assert_eq!(order.status, "refunded");
    assert_eq!(order.refunded_amount.as_deref(), Some("100.00"));
}

#[tokio::test]
async fn refund_partial_amount() {
    let app = app();
    let token = login(&app).await;
    create_order(&app, &token, "ORD-1").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/order/ORD-1/refund",
            Some(&token),
            r#"{"orderId":"ORD-1","amount":"25.00"}"#,
        ))
        .await
        .unwrap();
    let order: Order = body_json(resp).await;
    assert_eq!(order.refunded_amount.as_deref(), Some("25.00"));
}

// --- faults ---

#[tokio::test]
async fn injected_fault_replaces_next_response_only() {
    let state = GatewayState::default();
    let app = app_with_state(state.clone());
    state.inject("/v1/login_check", 500, "internal error");

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/login_check",
            None,
            r#"{"username":"merchant","password":"secret"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers()[http::header::DATE], MOCK_DATE);
    assert_eq!(body_bytes(resp).await, "internal error");

    login(&app).await;
}

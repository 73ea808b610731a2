//! The single request routine every gateway operation goes through.
//!
//! # Design
//! `dispatch` resolves the URL, sends the request on a fresh `ureq::Agent`
//! configured from `GatewayConfig`, reads the full body and hands the result
//! to `interpret`. `interpret` is pure: it turns a received `HttpResponse`
//! into either a decoded `GatewayResponse` or a `DispatchError`, so the
//! classification rules are testable without a network. The agent ignores
//! proxy settings from the environment and connects to the gateway directly.
//!
//! Only a 500 skips JSON decoding. Every other status, 4xx included, is
//! decoded into the target type and returned with its status.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};
use url::Url;

use crate::config::GatewayConfig;
use crate::error::DispatchError;
use crate::http::{GatewayRequest, GatewayResponse, HttpMethod, HttpResponse};

pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const ACCEPT: &str = "application/json";
pub const AUTH_HEADER: &str = "AuthorizationJWT";

const SERVER_ERROR_STATUS: u16 = 500;
/// Idle age used when the configured limit is disabled; far enough out to
/// never trigger, small enough not to overflow `Instant` arithmetic.
const UNLIMITED_IDLE_AGE: Duration = Duration::from_secs(u32::MAX as u64);

/// Execute `request` against the gateway named in `config` and decode the
/// JSON body into `T`.
pub fn dispatch<T: DeserializeOwned>(
    config: &GatewayConfig,
    request: &GatewayRequest,
) -> Result<GatewayResponse<T>, DispatchError> {
    let url = resolve_url(&config.base_uri, &request.path, &request.query)?;
    debug!(
        method = request.method.as_str(),
        url = %url,
        authenticated = request.bearer.is_some(),
        "sending gateway request"
    );

    let agent: Agent = Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(config.request_timeout())
        .max_idle_age(config.idle_conn_timeout().unwrap_or(UNLIMITED_IDLE_AGE))
        .proxy(None)
        .build()
        .new_agent();

    let mut response = send(&agent, url.as_str(), request).map_err(DispatchError::Transport)?;

    let status = response.status().as_u16();
    let date = response
        .headers()
        .get("date")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = response
        .body_mut()
        .read_to_vec()
        .map_err(|source| DispatchError::ReadBody { status, source })?;
    debug!(status, bytes = body.len(), "gateway responded");

    interpret(HttpResponse { status, date, body })
}

/// Classify a received response and decode its body.
pub fn interpret<T: DeserializeOwned>(response: HttpResponse) -> Result<GatewayResponse<T>, DispatchError> {
    let HttpResponse { status, date, body } = response;

    if status == SERVER_ERROR_STATUS {
        let body = String::from_utf8_lossy(&body).into_owned();
        warn!(status, body = %body, "gateway reported a server error");
        return Err(DispatchError::Server { status, body });
    }

    match serde_json::from_slice::<T>(&body) {
        Ok(data) => Ok(GatewayResponse {
            status,
            date,
            body,
            data,
        }),
        Err(source) => Err(DispatchError::Decode {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
            source,
        }),
    }
}

/// Build the final URL from the configured base, a relative path and query
/// parameters.
///
/// The base path and `path` are joined with exactly one `/`. Query keys in
/// `query` replace any existing values for the same key, later entries win,
/// and the resulting query string is sorted by key.
pub fn resolve_url(base_uri: &str, path: &str, query: &[(String, String)]) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_uri)?;

    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    for (key, value) in query {
        pairs.retain(|(existing, _)| existing != key);
        pairs.push((key.clone(), value.clone()));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    Ok(url)
}

fn send(agent: &Agent, url: &str, request: &GatewayRequest) -> Result<Response<Body>, ureq::Error> {
    match request.method {
        HttpMethod::Get => with_headers(agent.get(url), request).call(),
        HttpMethod::Post => {
            let builder = with_headers(agent.post(url), request);
            match &request.body {
                Some(body) => builder.send(body.as_slice()),
                None => builder.send_empty(),
            }
        }
    }
}

fn with_headers<B>(builder: RequestBuilder<B>, request: &GatewayRequest) -> RequestBuilder<B> {
    let builder = builder.header("Content-Type", CONTENT_TYPE).header("Accept", ACCEPT);
    match request.authorization() {
        Some(value) => builder.header(AUTH_HEADER, value),
        None => builder,
    }
}

//! Error types for the payment gateway client.
//!
//! # Design
//! `DispatchError` covers everything that can go wrong between resolving the
//! URL and decoding the response. It keeps the HTTP status whenever one was
//! received, because the refund operation decides whether to surface an
//! error based on it. `GatewayError` is what public operations return; its
//! `Dispatch` variant prefixes the message with `gateway dispatch:` so
//! dispatcher failures stand apart from caller-local ones.

use thiserror::Error;

/// Failures produced by the request dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The configured base URI could not be parsed.
    #[error("can't parse URI from config: {0}")]
    InvalidBaseUri(#[from] url::ParseError),

    /// DNS, connect, TLS, timeout or any other failure before a response
    /// status was received.
    #[error("can't do request: {0}")]
    Transport(#[source] ureq::Error),

    /// A status was received but the body could not be read.
    #[error("can't read response body (HTTP {status}): {source}")]
    ReadBody {
        status: u16,
        #[source]
        source: ureq::Error,
    },

    /// The gateway answered 500; the body is its error text, verbatim.
    #[error("error: {body}")]
    Server { status: u16, body: String },

    /// The body is not valid JSON for the expected shape.
    #[error("can't unmarshal response: '{body}': {source}")]
    Decode {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DispatchError {
    /// HTTP status captured before the failure, if the gateway answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::InvalidBaseUri(_) | DispatchError::Transport(_) => None,
            DispatchError::ReadBody { status, .. }
            | DispatchError::Server { status, .. }
            | DispatchError::Decode { status, .. } => Some(*status),
        }
    }
}

/// Errors returned by `GatewayClient` operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request payload could not be serialized to JSON.
    #[error("can't encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("gateway dispatch: {0}")]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GatewayError {
    /// HTTP status attached to a dispatch failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Dispatch(err) => err.status(),
            _ => None,
        }
    }
}

/// Problems loading `GatewayConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration variable {0}")]
    Missing(&'static str),

    #[error("{key} must be a whole number of seconds, got {value:?}: {source}")]
    InvalidNumber {
        key: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

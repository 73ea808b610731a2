//! Connection settings for the payment gateway.
//!
//! # Design
//! `GatewayConfig` is plain data: the base URI, the integrator's login
//! credentials and the two transport timeouts. It is built once and never
//! mutated, so a single `GatewayClient` can be shared across threads.
//! Loading it from a file is left to the integrator (the type derives
//! `Deserialize`); `from_env` covers the common environment-variable case.
//!
//! A timeout of `0` seconds means no limit, for both the request deadline
//! and the idle-connection age.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_IDLE_CONN_TIMEOUT_SEC: u64 = 90;
const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 30;

/// Immutable settings shared by every call a `GatewayClient` makes.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    pub base_uri: String,
    pub login: String,
    pub password: String,
    /// How long an idle pooled connection may be reused. `0` disables the limit.
    #[serde(default = "default_idle_conn_timeout_sec")]
    pub idle_conn_timeout_sec: u64,
    /// Deadline for a whole request, connect through body read. `0` disables it.
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,
}

fn default_idle_conn_timeout_sec() -> u64 {
    DEFAULT_IDLE_CONN_TIMEOUT_SEC
}

fn default_request_timeout_sec() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SEC
}

impl GatewayConfig {
    pub fn new(base_uri: &str, login: &str, password: &str) -> Self {
        Self {
            base_uri: base_uri.to_string(),
            login: login.to_string(),
            password: password.to_string(),
            idle_conn_timeout_sec: DEFAULT_IDLE_CONN_TIMEOUT_SEC,
            request_timeout_sec: DEFAULT_REQUEST_TIMEOUT_SEC,
        }
    }

    pub fn with_timeouts(mut self, idle_conn_timeout_sec: u64, request_timeout_sec: u64) -> Self {
        self.idle_conn_timeout_sec = idle_conn_timeout_sec;
        self.request_timeout_sec = request_timeout_sec;
        self
    }

    /// Read settings from `GATEWAY_*` environment variables.
    ///
    /// `GATEWAY_URI`, `GATEWAY_LOGIN` and `GATEWAY_PASSWORD` are required;
    /// `GATEWAY_IDLE_CONN_TIMEOUT_SEC` and `GATEWAY_REQUEST_TIMEOUT_SEC`
    /// fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with the variable lookup supplied by the caller.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));
        let seconds = |key: &'static str, default: u64| match lookup(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|source| ConfigError::InvalidNumber { key, value: raw, source }),
        };

        Ok(Self {
            base_uri: required("GATEWAY_URI")?,
            login: required("GATEWAY_LOGIN")?,
            password: required("GATEWAY_PASSWORD")?,
            idle_conn_timeout_sec: seconds("GATEWAY_IDLE_CONN_TIMEOUT_SEC", DEFAULT_IDLE_CONN_TIMEOUT_SEC)?,
            request_timeout_sec: seconds("GATEWAY_REQUEST_TIMEOUT_SEC", DEFAULT_REQUEST_TIMEOUT_SEC)?,
        })
    }

    /// `None` when idle connections may be kept indefinitely.
    pub fn idle_conn_timeout(&self) -> Option<Duration> {
        seconds_limit(self.idle_conn_timeout_sec)
    }

    /// `None` when requests have no deadline.
    pub fn request_timeout(&self) -> Option<Duration> {
        seconds_limit(self.request_timeout_sec)
    }
}

fn seconds_limit(seconds: u64) -> Option<Duration> {
    match seconds {
        0 => None,
        n => Some(Duration::from_secs(n)),
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_uri", &self.base_uri)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("idle_conn_timeout_sec", &self.idle_conn_timeout_sec)
            .field("request_timeout_sec", &self.request_timeout_sec)
            .finish()
    }
}

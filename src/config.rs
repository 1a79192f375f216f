//! Gateway configuration
//!
//! Assembled once in `main` from the environment and passed in explicitly.
//! A missing backend URL is a recoverable per-request error, not a startup
//! failure; the daemon still serves and answers uploads with a
//! configuration error.

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use url::Url;

/// Default listen address for the HTTP surface
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Default origin the offline store resolves relative assets against
const DEFAULT_PAGE_ORIGIN: &str = "http://localhost:3000";

/// Runtime configuration for the gateway daemon.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Origin of the hidden solver backend. Absent when `BACKEND_URL` is
    /// unset; uploads are then rejected per-request.
    pub backend_url: Option<Url>,
    /// Address the HTTP surface listens on.
    pub listen_addr: SocketAddr,
    /// Origin the offline store resolves relative assets against.
    pub page_origin: Url,
}

impl GatewayConfig {
    /// Build the configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let backend_url = match env::var("BACKEND_URL") {
            Ok(raw) => Some(Url::parse(&raw).context("BACKEND_URL is not a valid URL")?),
            Err(_) => None,
        };

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("LISTEN_ADDR is not a valid socket address")?;

        let page_origin = env::var("PAGE_ORIGIN")
            .unwrap_or_else(|_| DEFAULT_PAGE_ORIGIN.to_string());
        let page_origin = Url::parse(&page_origin).context("PAGE_ORIGIN is not a valid URL")?;

        Ok(Self {
            backend_url,
            listen_addr,
            page_origin,
        })
    }
}

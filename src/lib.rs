//! # proxyresolve
//!
//! Chromium-style proxy resolution for Rust.
//!
//! `proxyresolve` answers "which proxy should this URL use?" for any number
//! of independent callers while keeping the underlying lookup service to a
//! single lookup at a time. Answers come back in request order as PAC-style
//! strings such as `"PROXY 1.2.3.4:8080"` or `"DIRECT"`.
//!
//! ## Features
//!
//! - **Serialized lookups**: one lookup in flight, strict FIFO delivery
//! - **Pluggable services**: any [`ProxyLookup`](proxy_resolution::ProxyLookup)
//!   or async [`ProxyResolver`](proxy_resolution::ProxyResolver)
//! - **Manual configuration**: per-scheme proxies, NO_PROXY bypass rules,
//!   environment variables
//! - **PAC strings**: parsing and formatting of PAC result lists
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use proxyresolve::proxy_resolution::{
//!     ProxyConfigBuilder, ProxyConfigService, ResolveProxyHelper,
//! };
//! use url::Url;
//!
//! let config = ProxyConfigBuilder::new()
//!     .http("proxy.example.com:8080")
//!     .no_proxy("localhost, .internal")
//!     .build()?;
//! let helper = ResolveProxyHelper::new(ProxyConfigService::new(config));
//!
//! helper.resolve_proxy(Url::parse("http://example.com/")?, |proxy| {
//!     println!("Proxy: {}", proxy); // "PROXY proxy.example.com:8080"
//! });
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error codes and load states
//! - [`proxy_resolution`] - Proxy decisions, configuration, lookup services
//!   and the serializing helper
//!
//! ## Threading
//!
//! The helper and lookup clients are single-threaded (`!Send`). Async
//! services run on a tokio `LocalSet`.

pub mod base;
pub mod proxy_resolution;

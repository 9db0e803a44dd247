//! Proxy resolution.
//!
//! Mirrors Chromium's `net/proxy_resolution/` plus the browser-side helper
//! that serializes lookups:
//! - [`helper`]: [`ResolveProxyHelper`], one lookup in flight, FIFO answers
//! - [`lookup`]: the [`ProxyLookup`] service seam and its one-shot client
//! - [`service`]: config-backed and async-resolver-backed services
//! - [`config`], [`bypass`]: manual proxy rules and NO_PROXY handling
//! - [`proxy_info`], [`proxy_server`]: proxy decisions and PAC strings

pub mod bypass;
pub mod config;
pub mod helper;
pub mod lookup;
pub mod proxy_info;
pub mod proxy_server;
pub mod service;

pub use bypass::ProxyBypassRules;
pub use config::{ProxyConfig, ProxyConfigBuilder, ProxyRules};
pub use helper::{ResolveProxyCallback, ResolveProxyHelper};
pub use lookup::{ProxyLookup, ProxyLookupClient};
pub use proxy_info::ProxyInfo;
pub use proxy_server::{ProxyScheme, ProxyServer};
pub use service::{ProxyConfigService, ProxyResolver, ProxyResolving, SpawnedLookupService};

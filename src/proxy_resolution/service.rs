//! Proxy lookup service implementations.
//!
//! - [`ProxyConfigService`]: answers from a fixed [`ProxyConfig`], synchronously.
//! - [`SpawnedLookupService`]: drives any async [`ProxyResolver`] on the
//!   current tokio `LocalSet`, with an optional timeout.

use super::config::ProxyConfig;
use super::lookup::{ProxyLookup, ProxyLookupClient};
use super::proxy_info::ProxyInfo;
use crate::base::neterror::NetError;
use futures::future::LocalBoxFuture;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use url::Url;

/// Alias for the `Future` type returned by a proxy resolver.
pub type ProxyResolving = LocalBoxFuture<'static, Result<ProxyInfo, NetError>>;

/// Trait for asynchronous proxy resolution.
///
/// This is the async counterpart of [`ProxyLookup`], closer to Chromium's
/// `ProxyResolver`: one future per URL, no client handle.
///
/// # Design Notes
///
/// - Futures are `!Send`; resolvers live on the helper's thread.
/// - The returned future must not borrow `self` or `url`.
pub trait ProxyResolver {
    fn resolve(&self, url: &Url) -> ProxyResolving;
}

/// Blanket implementation for Rc-wrapped resolvers.
impl<R: ProxyResolver + ?Sized> ProxyResolver for Rc<R> {
    fn resolve(&self, url: &Url) -> ProxyResolving {
        (**self).resolve(url)
    }
}

/// Lookup service backed by a fixed [`ProxyConfig`].
///
/// Every lookup succeeds: bypassed or unconfigured destinations get
/// `DIRECT`.
#[derive(Debug, Clone, Default)]
pub struct ProxyConfigService {
    config: ProxyConfig,
}

impl ProxyConfigService {
    pub fn new(config: ProxyConfig) -> Self {
        Self { config }
    }

    /// Service configured from `HTTP_PROXY`, `HTTPS_PROXY`, `ALL_PROXY` and
    /// `NO_PROXY`.
    pub fn from_env() -> Self {
        Self::new(ProxyConfig::from_env())
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

impl ProxyLookup for ProxyConfigService {
    fn look_up_proxy_for_url(&self, url: &Url, client: ProxyLookupClient) {
        let info = self.config.proxy_info_for(url);
        tracing::trace!(url = %url, proxy = %info.to_pac_string(), "evaluated proxy config");
        client.complete(Ok(info));
    }
}

impl ProxyResolver for ProxyConfigService {
    fn resolve(&self, url: &Url) -> ProxyResolving {
        Box::pin(std::future::ready(Ok(self.config.proxy_info_for(url))))
    }
}

/// Lookup service running an async [`ProxyResolver`] per lookup.
///
/// Each lookup is spawned with `tokio::task::spawn_local`, so the helper
/// using this service must run inside a `tokio::task::LocalSet`. A lookup
/// that outlives the timeout is answered with
/// [`NetError::ConnectionTimedOut`]. Answers for a requester that has gone
/// away are discarded.
///
/// # Panics
///
/// Starting a lookup outside a `LocalSet` panics inside
/// [`ResolveProxyHelper::resolve_proxy`](super::ResolveProxyHelper::resolve_proxy),
/// after the request has already been marked in flight.
pub struct SpawnedLookupService<R> {
    resolver: R,
    timeout: Option<Duration>,
}

impl<R: ProxyResolver> SpawnedLookupService<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver, timeout: None }
    }

    /// Bound every lookup by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl<R: ProxyResolver> ProxyLookup for SpawnedLookupService<R> {
    fn look_up_proxy_for_url(&self, url: &Url, client: ProxyLookupClient) {
        let resolving = self.resolver.resolve(url);
        let timeout = self.timeout;
        let lookup_id = client.lookup_id();

        tokio::task::spawn_local(async move {
            let result = match timeout {
                Some(limit) => tokio::time::timeout(limit, resolving).await.unwrap_or_else(|_| {
                    tracing::warn!(lookup_id, ?limit, "proxy lookup timed out");
                    Err(NetError::ConnectionTimedOut)
                }),
                None => resolving.await,
            };

            if !client.is_connected() {
                tracing::trace!(lookup_id, "requester gone before proxy lookup finished");
            }
            client.complete(result);
        });
    }
}

impl<R> fmt::Debug for SpawnedLookupService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnedLookupService")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

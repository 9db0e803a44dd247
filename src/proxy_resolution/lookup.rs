//! The proxy lookup service seam.
//!
//! A lookup service answers one proxy question per [`ProxyLookupClient`].
//! The client is a one-shot binding back to whoever asked: answering
//! consumes it, and dropping it unanswered reports an abort.

use super::proxy_info::ProxyInfo;
use crate::base::neterror::{NetError, OK};
use std::fmt;
use std::rc::{Rc, Weak};
use url::Url;

/// Receiving end of a lookup binding.
pub(crate) trait LookupSink {
    /// Whether `lookup_id` is still the lookup this sink waits for.
    fn is_bound(&self, lookup_id: u64) -> bool;

    fn on_lookup_complete(self: Rc<Self>, lookup_id: u64, net_error: i32, info: Option<ProxyInfo>);
}

/// Service that decides which proxy to use for a URL.
///
/// Equivalent to the `LookUpProxyForURL` half of Chromium's network
/// context. An implementation must eventually do exactly one of:
/// - call [`ProxyLookupClient::on_proxy_lookup_complete`] (or
///   [`ProxyLookupClient::complete`]),
/// - drop the client, which the caller treats as an aborted lookup.
///
/// Answering synchronously from inside `look_up_proxy_for_url` is allowed.
/// Services are single-threaded: clients are `!Send`.
pub trait ProxyLookup {
    fn look_up_proxy_for_url(&self, url: &Url, client: ProxyLookupClient);
}

impl<L: ProxyLookup + ?Sized> ProxyLookup for Rc<L> {
    fn look_up_proxy_for_url(&self, url: &Url, client: ProxyLookupClient) {
        (**self).look_up_proxy_for_url(url, client)
    }
}

impl<L: ProxyLookup + ?Sized> ProxyLookup for Box<L> {
    fn look_up_proxy_for_url(&self, url: &Url, client: ProxyLookupClient) {
        (**self).look_up_proxy_for_url(url, client)
    }
}

/// One-shot handle used by a [`ProxyLookup`] to report its answer.
pub struct ProxyLookupClient {
    sink: Weak<dyn LookupSink>,
    lookup_id: u64,
    answered: bool,
}

impl ProxyLookupClient {
    pub(crate) fn new(sink: Weak<dyn LookupSink>, lookup_id: u64) -> Self {
        Self { sink, lookup_id, answered: false }
    }

    /// Identifier of the lookup this client answers.
    pub fn lookup_id(&self) -> u64 {
        self.lookup_id
    }

    /// False once the requester has gone away.
    ///
    /// Answers sent to a disconnected client are discarded.
    pub fn is_connected(&self) -> bool {
        self.sink.upgrade().is_some_and(|sink| sink.is_bound(self.lookup_id))
    }

    /// Report the lookup outcome: a net error code ([`OK`] on success) and
    /// the proxy decision, if any.
    pub fn on_proxy_lookup_complete(mut self, net_error: i32, proxy_info: Option<ProxyInfo>) {
        self.answer(net_error, proxy_info);
    }

    /// Report the lookup outcome as a `Result`.
    pub fn complete(self, result: Result<ProxyInfo, NetError>) {
        match result {
            Ok(info) => self.on_proxy_lookup_complete(OK, Some(info)),
            Err(e) => self.on_proxy_lookup_complete(e.as_i32(), None),
        }
    }

    fn answer(&mut self, net_error: i32, proxy_info: Option<ProxyInfo>) {
        if std::mem::replace(&mut self.answered, true) {
            return;
        }
        match self.sink.upgrade() {
            Some(sink) => sink.on_lookup_complete(self.lookup_id, net_error, proxy_info),
            None => {
                tracing::trace!(lookup_id = self.lookup_id, "requester gone, answer dropped");
            }
        }
    }
}

impl Drop for ProxyLookupClient {
    fn drop(&mut self) {
        if self.answered || std::thread::panicking() {
            return;
        }
        tracing::debug!(lookup_id = self.lookup_id, "proxy lookup client dropped without answer");
        self.answer(NetError::Aborted.as_i32(), None);
    }
}

impl fmt::Debug for ProxyLookupClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyLookupClient")
            .field("lookup_id", &self.lookup_id)
            .field("answered", &self.answered)
            .finish_non_exhaustive()
    }
}

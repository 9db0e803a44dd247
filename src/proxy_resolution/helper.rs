//! Serialized proxy resolution.
//!
//! [`ResolveProxyHelper`] accepts proxy questions from any number of callers
//! and feeds them to a [`ProxyLookup`] strictly one at a time, in arrival
//! order. Each answer is handed back to its caller as a PAC-style string.
//!
//! # Teardown
//!
//! Dropping the helper releases the in-flight lookup and **discards every
//! queued callback without running it**. Callers that need to observe
//! teardown should use [`ResolveProxyHelper::resolve_proxy_future`], whose
//! future resolves to `Err(NetError::Aborted)` in that case.

use super::lookup::{LookupSink, ProxyLookup, ProxyLookupClient};
use super::proxy_info::ProxyInfo;
use crate::base::loadstate::LoadState;
use crate::base::neterror::{net_error_to_result, NetError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};
use tokio::sync::oneshot;
use url::Url;

/// Continuation receiving the PAC-style answer; `""` means direct or unknown.
pub type ResolveProxyCallback = Box<dyn FnOnce(String)>;

struct PendingRequest {
    url: Url,
    callback: Option<ResolveProxyCallback>,
}

/// The head request and its lookup travel together, so a lookup can only be
/// in flight for the request at the front of the queue.
enum State {
    Idle,
    LookingUp { current: PendingRequest, lookup_id: u64 },
}

struct Inner {
    state: State,
    /// Requests behind the one being looked up.
    waiting: VecDeque<PendingRequest>,
    next_lookup_id: u64,
    /// Set while a frame further up the stack is starting lookups.
    dispatching: bool,
    torn_down: bool,
}

struct Shared {
    lookup: Box<dyn ProxyLookup>,
    inner: RefCell<Inner>,
}

/// Funnels proxy resolution requests into a single-flight FIFO of lookups.
///
/// Single-threaded: all calls, lookups and callbacks happen on the thread
/// that owns the helper. No internal borrow is held while the lookup service
/// or a callback runs, so services may answer synchronously and callbacks
/// may issue new requests. Lookups are started from a loop rather than from
/// inside the previous answer, so long chains of synchronous answers run in
/// constant stack depth.
pub struct ResolveProxyHelper {
    shared: Rc<Shared>,
}

impl ResolveProxyHelper {
    pub fn new<L: ProxyLookup + 'static>(lookup: L) -> Self {
        Self {
            shared: Rc::new(Shared {
                lookup: Box::new(lookup),
                inner: RefCell::new(Inner {
                    state: State::Idle,
                    waiting: VecDeque::new(),
                    next_lookup_id: 1,
                    dispatching: false,
                    torn_down: false,
                }),
            }),
        }
    }

    /// Queue a proxy lookup for `url`; `callback` receives the answer.
    ///
    /// When nothing is in flight the lookup starts before this returns.
    /// Otherwise it waits for every earlier request to finish. Errors and
    /// aborted lookups are reported as `""`.
    pub fn resolve_proxy<F>(&self, url: Url, callback: F)
    where
        F: FnOnce(String) + 'static,
    {
        self.enqueue(url, Some(Box::new(callback)));
    }

    /// Queue a lookup whose answer nobody needs.
    ///
    /// It still takes its turn in the queue.
    pub fn resolve_proxy_detached(&self, url: Url) {
        self.enqueue(url, None);
    }

    /// Queue a proxy lookup and return a future of its answer.
    ///
    /// The request is queued immediately, not on first poll. The future
    /// yields `Err(NetError::Aborted)` if the helper is dropped first.
    pub fn resolve_proxy_future(
        &self,
        url: Url,
    ) -> impl Future<Output = Result<String, NetError>> + 'static {
        let (tx, rx) = oneshot::channel();
        self.resolve_proxy(url, move |proxy| {
            let _ = tx.send(proxy);
        });
        async move { rx.await.map_err(|_| NetError::Aborted) }
    }

    /// Requests accepted but not yet answered, including the one in flight.
    pub fn pending_count(&self) -> usize {
        let inner = self.shared.inner.borrow();
        let in_flight = usize::from(matches!(inner.state, State::LookingUp { .. }));
        inner.waiting.len() + in_flight
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.shared.inner.borrow().state, State::Idle)
    }

    pub fn load_state(&self) -> LoadState {
        match self.shared.inner.borrow().state {
            State::Idle => LoadState::Idle,
            State::LookingUp { .. } => LoadState::ResolvingProxyForUrl,
        }
    }

    fn enqueue(&self, url: Url, callback: Option<ResolveProxyCallback>) {
        {
            let mut inner = self.shared.inner.borrow_mut();
            tracing::trace!(url = %url, queued = inner.waiting.len() + 1, "queueing proxy request");
            inner.waiting.push_back(PendingRequest { url, callback });
        }
        Shared::dispatch(&self.shared);
    }
}

impl Shared {
    /// Start queued lookups until one stays in flight or the queue is empty.
    ///
    /// Reentrant calls return immediately and leave the work to the
    /// outermost frame.
    fn dispatch(this: &Rc<Self>) {
        {
            let mut inner = this.inner.borrow_mut();
            if inner.dispatching {
                return;
            }
            inner.dispatching = true;
        }

        loop {
            let ready = {
                let inner = this.inner.borrow();
                !inner.torn_down && matches!(inner.state, State::Idle) && !inner.waiting.is_empty()
            };
            if !ready {
                break;
            }
            Self::start_pending_request(this);
        }

        this.inner.borrow_mut().dispatching = false;
    }

    fn start_pending_request(this: &Rc<Self>) {
        let (url, client) = {
            let mut inner = this.inner.borrow_mut();
            assert!(!inner.torn_down, "proxy lookup started after teardown");
            assert!(matches!(inner.state, State::Idle), "proxy lookup already in flight");
            let current = inner.waiting.pop_front().expect("no pending proxy request to start");

            let lookup_id = inner.next_lookup_id;
            inner.next_lookup_id += 1;

            let url = current.url.clone();
            inner.state = State::LookingUp { current, lookup_id };

            let sink: Weak<Self> = Rc::downgrade(this);
            (url, ProxyLookupClient::new(sink, lookup_id))
        };

        tracing::debug!(lookup_id = client.lookup_id(), url = %url, "starting proxy lookup");
        this.lookup.look_up_proxy_for_url(&url, client);
    }
}

impl LookupSink for Shared {
    fn is_bound(&self, lookup_id: u64) -> bool {
        let inner = self.inner.borrow();
        match inner.state {
            State::LookingUp { lookup_id: active, .. } => !inner.torn_down && active == lookup_id,
            State::Idle => false,
        }
    }

    fn on_lookup_complete(
        self: Rc<Self>,
        lookup_id: u64,
        net_error: i32,
        info: Option<ProxyInfo>,
    ) {
        let completed = {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down {
                tracing::trace!(lookup_id, "proxy lookup answered after teardown");
                return;
            }
            // Unbind before acting on the answer.
            let State::LookingUp { current, lookup_id: active } =
                std::mem::replace(&mut inner.state, State::Idle)
            else {
                panic!("proxy lookup {lookup_id} completed while idle");
            };
            assert_eq!(active, lookup_id, "proxy lookup answered for the wrong request");
            current
        };

        let proxy = info.map(|info| info.to_pac_string()).unwrap_or_default();
        let url = &completed.url;
        match net_error_to_result(net_error) {
            Ok(()) => {
                tracing::debug!(lookup_id, url = %url, proxy = %proxy, "proxy lookup complete")
            }
            Err(e) => tracing::debug!(lookup_id, url = %url, error = %e, "proxy lookup failed"),
        }

        if let Some(callback) = completed.callback {
            callback(proxy);
        }

        Self::dispatch(&self);
    }
}

impl Drop for ResolveProxyHelper {
    fn drop(&mut self) {
        let (active, waiting) = {
            let mut inner = self.shared.inner.borrow_mut();
            inner.torn_down = true;
            (std::mem::replace(&mut inner.state, State::Idle), std::mem::take(&mut inner.waiting))
        };

        let in_flight = matches!(active, State::LookingUp { .. });
        let discarded = waiting.len() + usize::from(in_flight);
        if discarded > 0 {
            tracing::debug!(discarded, in_flight, "dropping unanswered proxy requests");
        }
        // Callbacks are dropped, never run.
        drop(active);
        drop(waiting);
    }
}

impl fmt::Debug for ResolveProxyHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveProxyHelper")
            .field("load_state", &self.load_state())
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

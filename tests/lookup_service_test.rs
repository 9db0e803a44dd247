//! Lookup Service Tests
//!
//! Covers:
//! - `SpawnedLookupService` driving an async `ProxyResolver` on a `LocalSet`
//! - Timeouts and resolver errors
//! - Teardown while a spawned lookup is still running
//! - `ProxyConfigService` behind the helper

use proxyresolve::base::neterror::NetError;
use proxyresolve::proxy_resolution::{
    ProxyConfigBuilder, ProxyConfigService, ProxyInfo, ProxyResolver, ProxyResolving,
    ResolveProxyHelper, SpawnedLookupService,
};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;
use url::Url;

/// Resolver that answers after a delay and tracks overlapping lookups.
struct DelayedResolver {
    delay: Duration,
    answer: Result<&'static str, NetError>,
    active: Rc<Cell<usize>>,
    max_active: Rc<Cell<usize>>,
}

impl DelayedResolver {
    fn new(delay: Duration, answer: Result<&'static str, NetError>) -> Self {
        Self {
            delay,
            answer,
            active: Rc::new(Cell::new(0)),
            max_active: Rc::new(Cell::new(0)),
        }
    }
}

impl ProxyResolver for DelayedResolver {
    fn resolve(&self, _url: &Url) -> ProxyResolving {
        let delay = self.delay;
        let answer = self.answer;
        let active = self.active.clone();
        let max_active = self.max_active.clone();

        Box::pin(async move {
            active.set(active.get() + 1);
            max_active.set(max_active.get().max(active.get()));
            tokio::time::sleep(delay).await;
            active.set(active.get() - 1);
            answer.and_then(ProxyInfo::from_pac_string)
        })
    }
}

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_spawned_lookups_run_one_at_a_time() {
    LocalSet::new()
        .run_until(async {
            let resolver =
                Rc::new(DelayedResolver::new(Duration::from_millis(50), Ok("PROXY p:8080")));
            let helper = ResolveProxyHelper::new(SpawnedLookupService::new(resolver.clone()));

            let futures: Vec<_> = (0..4)
                .map(|i| helper.resolve_proxy_future(url(&format!("http://h{}.test/", i))))
                .collect();
            assert_eq!(helper.pending_count(), 4);

            let start = tokio::time::Instant::now();
            for fut in futures {
                assert_eq!(fut.await, Ok("PROXY p:8080".to_string()));
            }

            assert_eq!(resolver.max_active.get(), 1);
            assert!(start.elapsed() >= Duration::from_millis(200));
            assert!(helper.is_idle());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_timeout_collapses_and_queue_continues() {
    LocalSet::new()
        .run_until(async {
            let resolver = DelayedResolver::new(Duration::from_secs(30), Ok("PROXY slow:1"));
            let service = SpawnedLookupService::new(resolver).with_timeout(Duration::from_secs(1));
            let helper = ResolveProxyHelper::new(service);

            let first = helper.resolve_proxy_future(url("http://a.test/"));
            let second = helper.resolve_proxy_future(url("http://b.test/"));

            let start = tokio::time::Instant::now();
            assert_eq!(first.await, Ok(String::new()));
            assert_eq!(second.await, Ok(String::new()));
            assert!(start.elapsed() < Duration::from_secs(30));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_resolver_error_collapses() {
    LocalSet::new()
        .run_until(async {
            let resolver = DelayedResolver::new(Duration::ZERO, Err(NetError::PacScriptFailed));
            let helper = ResolveProxyHelper::new(SpawnedLookupService::new(resolver));

            let answer = helper.resolve_proxy_future(url("http://a.test/")).await;
            assert_eq!(answer, Ok(String::new()));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_teardown_while_spawned_lookup_runs() {
    LocalSet::new()
        .run_until(async {
            let resolver =
                Rc::new(DelayedResolver::new(Duration::from_secs(1), Ok("PROXY late:1")));
            let helper = ResolveProxyHelper::new(SpawnedLookupService::new(resolver.clone()));

            let pending = helper.resolve_proxy_future(url("http://a.test/"));
            let queued = helper.resolve_proxy_future(url("http://b.test/"));
            tokio::task::yield_now().await;
            drop(helper);

            assert_eq!(pending.await, Err(NetError::Aborted));
            assert_eq!(queued.await, Err(NetError::Aborted));

            // Let the orphaned lookup finish into the void
            tokio::time::sleep(Duration::from_secs(2)).await;
            assert_eq!(resolver.active.get(), 0);
        })
        .await;
}

#[test]
fn test_config_service_behind_helper() {
    let config = ProxyConfigBuilder::new()
        .http("plain:8080")
        .https("https://secure:8443")
        .no_proxy("localhost")
        .build()
        .unwrap();
    let helper = ResolveProxyHelper::new(ProxyConfigService::new(config));

    let answers = Rc::new(std::cell::RefCell::new(Vec::new()));
    for target in ["http://a.test/", "https://a.test/", "http://localhost:3000/"] {
        let answers = answers.clone();
        helper.resolve_proxy(url(target), move |proxy| answers.borrow_mut().push(proxy));
    }

    assert_eq!(*answers.borrow(), vec!["PROXY plain:8080", "HTTPS secure:8443", "DIRECT"]);
    assert!(helper.is_idle());
}

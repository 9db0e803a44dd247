/// The current state of a proxy resolution request queue.
/// This roughly matches the proxy-related subset of net/base/load_states.h
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No lookup is in flight.
    #[default]
    Idle,

    /// Resolving the proxy.
    ResolvingProxyForUrl,
}

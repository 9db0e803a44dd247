//! The answer to a proxy lookup.
//!
//! Equivalent to Chromium's `net::ProxyInfo`: an ordered list of proxies to
//! try for one URL, with `DIRECT` as a regular list element.

use super::proxy_server::ProxyServer;
use crate::base::neterror::NetError;

/// Ordered proxy decision for a single URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyInfo {
    proxy_list: Vec<ProxyServer>,
}

impl ProxyInfo {
    /// A decision to connect directly.
    pub fn direct() -> Self {
        let mut info = Self::default();
        info.use_direct();
        info
    }

    /// A decision to use exactly `server`.
    pub fn from_server(server: ProxyServer) -> Self {
        let mut info = Self::default();
        info.use_named_proxy(server);
        info
    }

    /// Replace the list with `DIRECT`.
    pub fn use_direct(&mut self) {
        self.proxy_list = vec![ProxyServer::direct()];
    }

    /// Replace the list with a single proxy.
    pub fn use_named_proxy(&mut self, server: ProxyServer) {
        self.proxy_list = vec![server];
    }

    /// Replace the list with an ordered list of proxies.
    pub fn use_proxy_list(&mut self, servers: Vec<ProxyServer>) {
        self.proxy_list = servers;
    }

    /// Replace the list with the elements of a PAC result string.
    ///
    /// Accepts `;`-separated elements such as `"PROXY a:8080; SOCKS5 b:1080; DIRECT"`.
    /// Elements with an unsupported keyword are skipped, as a PAC consumer
    /// would do; if nothing usable remains the call fails with
    /// [`NetError::NoSupportedProxies`].
    pub fn use_pac_string(&mut self, pac: &str) -> Result<(), NetError> {
        let mut servers = Vec::new();
        for element in pac.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            match ProxyServer::from_pac_string(element) {
                Ok(server) => servers.push(server),
                Err(NetError::NoSupportedProxies) => {
                    tracing::debug!(element = %element, "skipping unsupported PAC element");
                }
                Err(e) => return Err(e),
            }
        }
        if servers.is_empty() {
            return Err(NetError::NoSupportedProxies);
        }
        self.proxy_list = servers;
        Ok(())
    }

    /// Parse a PAC result string into a new `ProxyInfo`.
    pub fn from_pac_string(pac: &str) -> Result<Self, NetError> {
        let mut info = Self::default();
        info.use_pac_string(pac)?;
        Ok(info)
    }

    /// True when the first choice is `DIRECT`.
    pub fn is_direct(&self) -> bool {
        self.proxy_list.first().is_some_and(ProxyServer::is_direct)
    }

    pub fn is_empty(&self) -> bool {
        self.proxy_list.is_empty()
    }

    /// First proxy to try.
    pub fn proxy_server(&self) -> Option<&ProxyServer> {
        self.proxy_list.first()
    }

    pub fn proxy_list(&self) -> &[ProxyServer] {
        &self.proxy_list
    }

    /// Canonical PAC-style form, e.g. `"PROXY 1.2.3.4:8080;DIRECT"`.
    ///
    /// An empty list formats as the empty string.
    pub fn to_pac_string(&self) -> String {
        self.proxy_list.iter().map(ProxyServer::to_pac_string).collect::<Vec<_>>().join(";")
    }
}

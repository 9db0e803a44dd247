//! Manual proxy configuration.
//!
//! A reduced form of Chromium's `net::ProxyConfig`: fixed proxy rules plus a
//! bypass list, evaluated per URL into a [`ProxyInfo`].

use super::bypass::ProxyBypassRules;
use super::proxy_info::ProxyInfo;
use super::proxy_server::{ProxyScheme, ProxyServer};
use crate::base::neterror::NetError;
use url::Url;

/// Which proxies to use, before bypass rules are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProxyRules {
    /// Always connect directly.
    #[default]
    Direct,
    /// The same proxy list for every URL scheme.
    Single(Vec<ProxyServer>),
    /// Proxy lists keyed by the destination's scheme.
    ///
    /// `fallback` applies to schemes without a dedicated list; an empty list
    /// means direct.
    PerScheme { http: Vec<ProxyServer>, https: Vec<ProxyServer>, fallback: Vec<ProxyServer> },
}

impl ProxyRules {
    fn servers_for(&self, url: &Url) -> &[ProxyServer] {
        match self {
            ProxyRules::Direct => &[],
            ProxyRules::Single(servers) => servers,
            ProxyRules::PerScheme { http, https, fallback } => {
                let dedicated = match url.scheme() {
                    "http" | "ws" => http,
                    "https" | "wss" => https,
                    _ => fallback,
                };
                if dedicated.is_empty() {
                    fallback
                } else {
                    dedicated
                }
            }
        }
    }
}

/// Proxy configuration with bypass rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    rules: ProxyRules,
    bypass: ProxyBypassRules,
}

impl ProxyConfig {
    /// A configuration that never uses a proxy.
    pub fn direct() -> Self {
        Self::default()
    }

    /// Create a configuration from its parts.
    pub fn new(rules: ProxyRules, bypass: ProxyBypassRules) -> Self {
        Self { rules, bypass }
    }

    /// Create a configuration from environment variables.
    ///
    /// Checks `HTTP_PROXY`/`http_proxy`, `HTTPS_PROXY`/`https_proxy`,
    /// `ALL_PROXY`/`all_proxy` and `NO_PROXY`/`no_proxy`. Unparseable values
    /// are ignored with a warning; with nothing set the result is direct.
    pub fn from_env() -> Self {
        let mut builder = ProxyConfigBuilder::new();
        if let Some(v) = env_var("HTTP_PROXY") {
            builder = builder.http(&v);
        }
        if let Some(v) = env_var("HTTPS_PROXY") {
            builder = builder.https(&v);
        }
        if let Some(v) = env_var("ALL_PROXY") {
            builder = builder.fallback(&v);
        }

        match builder.build() {
            Ok(config) => Self { bypass: ProxyBypassRules::from_env(), ..config },
            Err(e) => {
                tracing::warn!(error = %e, "ignoring invalid proxy environment");
                Self::direct()
            }
        }
    }

    pub fn rules(&self) -> &ProxyRules {
        &self.rules
    }

    pub fn bypass(&self) -> &ProxyBypassRules {
        &self.bypass
    }

    /// Evaluate the configuration for `url`.
    ///
    /// Bypassed destinations and empty rule lists resolve to `DIRECT`.
    pub fn proxy_info_for(&self, url: &Url) -> ProxyInfo {
        if self.bypass.matches(url) {
            return ProxyInfo::direct();
        }
        match self.rules.servers_for(url) {
            [] => ProxyInfo::direct(),
            servers => {
                let mut info = ProxyInfo::default();
                info.use_proxy_list(servers.to_vec());
                info
            }
        }
    }
}

fn env_var(upper: &str) -> Option<String> {
    std::env::var(upper)
        .or_else(|_| std::env::var(upper.to_ascii_lowercase()))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Builder for ProxyConfig.
///
/// Proxy URIs are validated in [`build`](Self::build); the first invalid
/// one fails the whole configuration.
#[derive(Debug, Default)]
pub struct ProxyConfigBuilder {
    http: Vec<String>,
    https: Vec<String>,
    fallback: Vec<String>,
    no_proxy: String,
}

impl ProxyConfigBuilder {
    /// Create new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a proxy for `http://` and `ws://` destinations.
    pub fn http(mut self, uri: &str) -> Self {
        self.http.push(uri.to_string());
        self
    }

    /// Add a proxy for `https://` and `wss://` destinations.
    pub fn https(mut self, uri: &str) -> Self {
        self.https.push(uri.to_string());
        self
    }

    /// Add a proxy for every other destination, and for schemes above
    /// that have no dedicated proxy.
    pub fn fallback(mut self, uri: &str) -> Self {
        self.fallback.push(uri.to_string());
        self
    }

    /// Add a SOCKS5 fallback proxy.
    pub fn socks5(self, host_port: &str) -> Self {
        let uri = format!("socks5://{}", host_port.trim_start_matches("socks5://"));
        self.fallback(&uri)
    }

    /// Set NO_PROXY bypass rules.
    pub fn no_proxy(mut self, rules: &str) -> Self {
        self.no_proxy = rules.to_string();
        self
    }

    /// Build ProxyConfig.
    pub fn build(self) -> Result<ProxyConfig, NetError> {
        let parse_all = |uris: Vec<String>| -> Result<Vec<ProxyServer>, NetError> {
            uris.iter().map(|uri| ProxyServer::from_uri(uri, ProxyScheme::Http)).collect()
        };

        let http = parse_all(self.http)?;
        let https = parse_all(self.https)?;
        let fallback = parse_all(self.fallback)?;

        let rules = if http.is_empty() && https.is_empty() && fallback.is_empty() {
            ProxyRules::Direct
        } else if http.is_empty() && https.is_empty() {
            ProxyRules::Single(fallback)
        } else {
            ProxyRules::PerScheme { http, https, fallback }
        };

        Ok(ProxyConfig { rules, bypass: ProxyBypassRules::parse(&self.no_proxy) })
    }
}

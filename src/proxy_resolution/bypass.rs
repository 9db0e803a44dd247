//! Proxy bypass rules with NO_PROXY support.
//!
//! Decides which destinations skip the configured proxies and connect
//! directly.

use std::net::IpAddr;
use url::Url;

/// A single parsed bypass entry.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BypassRule {
    /// `*`
    All,
    /// `<local>`: hostnames without a dot.
    SimpleHostnames,
    /// `example.com`, `.example.com` or `*.example.com`.
    Domain(String),
    Address(IpAddr),
    Cidr(IpAddr, u8),
}

/// Proxy bypass list.
///
/// Based on curl's NO_PROXY behavior, plus Chromium's `<local>` token:
/// - Entries are comma-separated (semicolons are accepted too)
/// - IP addresses and CIDR ranges supported
/// - Domain matching with optional leading `.` or `*.`
/// - Wildcard `*` matches all hosts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyBypassRules {
    rules: Vec<BypassRule>,
}

impl ProxyBypassRules {
    /// Create from environment variables.
    ///
    /// Checks `NO_PROXY` then `no_proxy`.
    pub fn from_env() -> Self {
        let raw = std::env::var("NO_PROXY")
            .or_else(|_| std::env::var("no_proxy"))
            .unwrap_or_default();
        Self::parse(&raw)
    }

    /// Parse a bypass list such as `"localhost, .internal, 10.0.0.0/8"`.
    pub fn parse(list: &str) -> Self {
        let rules = list
            .split([',', ';'])
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(parse_rule)
            .collect();
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check if a host should bypass the proxy.
    pub fn matches_host(&self, host: &str) -> bool {
        // Strip brackets from IPv6
        let host = host.trim_start_matches('[').trim_end_matches(']');
        let ip = host.parse::<IpAddr>().ok();
        let host_lower = host.to_ascii_lowercase();

        self.rules.iter().any(|rule| match rule {
            BypassRule::All => true,
            BypassRule::SimpleHostnames => ip.is_none() && !host.contains('.'),
            BypassRule::Domain(domain) => ip.is_none() && domain_matches(domain, &host_lower),
            BypassRule::Address(addr) => ip == Some(*addr),
            BypassRule::Cidr(network, prefix) => {
                ip.is_some_and(|ip| cidr_contains(*network, *prefix, ip))
            }
        })
    }

    /// Check if a URL should bypass the proxy.
    pub fn matches(&self, url: &Url) -> bool {
        url.host_str().is_some_and(|h| self.matches_host(h))
    }
}

fn parse_rule(entry: &str) -> BypassRule {
    if entry == "*" {
        return BypassRule::All;
    }
    if entry.eq_ignore_ascii_case("<local>") {
        return BypassRule::SimpleHostnames;
    }

    if let Some((ip_str, prefix_str)) = entry.split_once('/') {
        if let (Ok(ip), Ok(prefix)) = (ip_str.parse::<IpAddr>(), prefix_str.parse::<u8>()) {
            return BypassRule::Cidr(ip, prefix);
        }
    }

    let bare = entry.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return BypassRule::Address(ip);
    }

    let domain = entry.strip_prefix("*.").or_else(|| entry.strip_prefix('.')).unwrap_or(entry);
    BypassRule::Domain(domain.to_ascii_lowercase())
}

/// `example.com` matches itself and any subdomain, never `notexample.com`.
fn domain_matches(domain: &str, host: &str) -> bool {
    host == domain || host.strip_suffix(domain).is_some_and(|prefix| prefix.ends_with('.'))
}

/// Check if IP is within CIDR range.
fn cidr_contains(network: IpAddr, prefix: u8, addr: IpAddr) -> bool {
    match (network, addr) {
        (IpAddr::V4(net), IpAddr::V4(ip)) => {
            if prefix > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
            (u32::from(net) & mask) == (u32::from(ip) & mask)
        }
        (IpAddr::V6(net), IpAddr::V6(ip)) => {
            if prefix > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
            (u128::from(net) & mask) == (u128::from(ip) & mask)
        }
        _ => false,
    }
}

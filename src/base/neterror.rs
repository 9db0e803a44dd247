use thiserror::Error;

/// Success code reported by a proxy lookup (`net::OK`).
pub const OK: i32 = 0;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum NetError {
    // Generic Errors
    #[error("Operation pending")]
    IoPending,
    #[error("Operation failed")]
    Failed,
    #[error("Operation aborted")]
    Aborted,
    #[error("Invalid argument")]
    InvalidArgument,
    #[error("Operation timed out")]
    TimedOut,
    #[error("Not implemented")]
    NotImplemented,

    // Connection Errors
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Internet disconnected")]
    InternetDisconnected,
    #[error("Address invalid")]
    AddressInvalid,
    #[error("Tunnel connection failed")]
    TunnelConnectionFailed,
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("SOCKS connection failed")]
    SocksConnectionFailed,
    #[error("Proxy connection failed")]
    ProxyConnectionFailed,
    #[error("Mandatory proxy configuration failed")]
    MandatoryProxyConfigurationFailed,
    #[error("Proxy certificate invalid")]
    ProxyCertificateInvalid,
    #[error("Name resolution failed")]
    NameResolutionFailed,
    #[error("Network access denied")]
    NetworkAccessDenied,

    // URL / Proxy Resolution Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Unknown URL scheme")]
    UnknownUrlScheme,
    #[error("PAC script failed")]
    PacScriptFailed,
    #[error("No supported proxies")]
    NoSupportedProxies,
    #[error("PAC not in DHCP")]
    PacNotInDhcp,
    #[error("PAC script terminated")]
    PacScriptTerminated,
    #[error("Proxy required")]
    ProxyRequired,

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::IoPending => -1,
            NetError::Failed => -2,
            NetError::Aborted => -3,
            NetError::InvalidArgument => -4,
            NetError::TimedOut => -7,
            NetError::NotImplemented => -11,

            NetError::ConnectionRefused => -102,
            NetError::ConnectionFailed => -104,
            NetError::NameNotResolved => -105,
            NetError::InternetDisconnected => -106,
            NetError::AddressInvalid => -108,
            NetError::TunnelConnectionFailed => -111,
            NetError::ConnectionTimedOut => -118,
            NetError::SocksConnectionFailed => -120,
            NetError::ProxyConnectionFailed => -130,
            NetError::MandatoryProxyConfigurationFailed => -131,
            NetError::ProxyCertificateInvalid => -136,
            NetError::NameResolutionFailed => -137,
            NetError::NetworkAccessDenied => -138,

            NetError::InvalidUrl => -300,
            NetError::UnknownUrlScheme => -302,
            NetError::PacScriptFailed => -327,
            NetError::NoSupportedProxies => -336,
            NetError::PacNotInDhcp => -348,
            NetError::PacScriptTerminated => -367,
            NetError::ProxyRequired => -368,
            NetError::Unknown(code) => *code,
        }
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -1 => NetError::IoPending,
            -2 => NetError::Failed,
            -3 => NetError::Aborted,
            -4 => NetError::InvalidArgument,
            -7 => NetError::TimedOut,
            -11 => NetError::NotImplemented,

            -102 => NetError::ConnectionRefused,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -106 => NetError::InternetDisconnected,
            -108 => NetError::AddressInvalid,
            -111 => NetError::TunnelConnectionFailed,
            -118 => NetError::ConnectionTimedOut,
            -120 => NetError::SocksConnectionFailed,
            -130 => NetError::ProxyConnectionFailed,
            -131 => NetError::MandatoryProxyConfigurationFailed,
            -136 => NetError::ProxyCertificateInvalid,
            -137 => NetError::NameResolutionFailed,
            -138 => NetError::NetworkAccessDenied,

            -300 => NetError::InvalidUrl,
            -302 => NetError::UnknownUrlScheme,
            -327 => NetError::PacScriptFailed,
            -336 => NetError::NoSupportedProxies,
            -348 => NetError::PacNotInDhcp,
            -367 => NetError::PacScriptTerminated,
            -368 => NetError::ProxyRequired,
            _ => NetError::Unknown(code),
        }
    }
}

/// Interpret a raw net error code, treating [`OK`] as success.
pub fn net_error_to_result(code: i32) -> Result<(), NetError> {
    if code == OK {
        Ok(())
    } else {
        Err(NetError::from(code))
    }
}

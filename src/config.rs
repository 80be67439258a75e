use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// HTTP/WebSocket edge configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub bind: SocketAddr,
    /// Origins allowed to open viewer connections and call the API. Empty
    /// means any origin (local development).
    pub allowed_origins: Vec<String>,
}

impl HttpConfig {
    pub fn from_env() -> Self {
        let host = env::var("BIND_ADDR")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = env::var("PORT").ok().and_then(|value| value.parse::<u16>().ok()).unwrap_or(5001);

        Self { bind: SocketAddr::new(host, port), allowed_origins: parse_list("ALLOWED_ORIGINS") }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_list(key: &str) -> Vec<String> {
    env::var(key)
        .map(|value| {
            value
                .split(',')
                .map(|entry| entry.trim().to_string())
                .filter(|entry| !entry.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

//! Client configuration and base URL resolution.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::{ClientError, ClientResult};

/// Per-request timeout unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Path prefix of the versioned API behind the same-origin reverse proxy.
pub const API_PREFIX: &str = "/api/v1";

/// Path the local development server proxies to the backend.
pub const DEV_PROXY_PATH: &str = "/api/v1";

/// Ports served by the local development server.
pub const DEV_SERVER_PORTS: &[u16] = &[3000];

pub const DEFAULT_ORIGIN: &str = "http://localhost";

/// Which rule picked the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiBase {
    /// An explicitly configured API URL, used verbatim.
    Explicit(String),
    /// Relative path forwarded by the local development proxy.
    DevProxy(&'static str),
    /// `{origin}/api/v1` behind the production reverse proxy.
    SameOrigin(String),
}

impl ApiBase {
    /// Absolute base URL (no trailing slash) for requests.
    ///
    /// The dev-proxy path is relative, so it is joined onto the origin the
    /// development server is served from.
    pub fn url(&self, origin: &str) -> String {
        match self {
            ApiBase::Explicit(url) => url.clone(),
            ApiBase::DevProxy(path) => format!("{}{}", origin.trim_end_matches('/'), path),
            ApiBase::SameOrigin(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Explicit API URL (`QMS_API_URL`); wins over every other rule when
    /// non-empty.
    pub api_url: Option<String>,
    /// Origin the embedding application is served from (`QMS_ORIGIN`).
    pub origin: String,
    /// Force development-server resolution (`QMS_DEV_MODE`).
    pub dev_mode: bool,
    pub timeout: Duration,
    /// Where the persistent token store lives (`QMS_TOKEN_FILE`). In-memory
    /// when unset.
    pub token_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            origin: DEFAULT_ORIGIN.to_string(),
            dev_mode: false,
            timeout: DEFAULT_TIMEOUT,
            token_file: None,
        }
    }
}

impl ClientConfig {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let mut config = Self::default();

        config.api_url = lookup("QMS_API_URL");
        if let Some(origin) = lookup("QMS_ORIGIN").filter(|o| !o.trim().is_empty()) {
            config.origin = origin.trim().to_string();
        }
        if let Some(raw) = lookup("QMS_DEV_MODE") {
            config.dev_mode = parse_flag(&raw)
                .ok_or_else(|| ClientError::Config(format!("QMS_DEV_MODE: `{raw}` is not a boolean")))?;
        }
        if let Some(raw) = lookup("QMS_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ClientError::Config(format!("QMS_TIMEOUT_SECS: {e}")))?;
            if secs == 0 {
                return Err(ClientError::Config("QMS_TIMEOUT_SECS must be positive".to_string()));
            }
            config.timeout = Duration::from_secs(secs);
        }
        config.token_file = lookup("QMS_TOKEN_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    /// Pick the API base; first matching rule wins.
    pub fn resolve_base(&self) -> ApiBase {
        if let Some(url) = self.api_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            return ApiBase::Explicit(url.trim_end_matches('/').to_string());
        }
        if self.is_dev_server() {
            return ApiBase::DevProxy(DEV_PROXY_PATH);
        }
        ApiBase::SameOrigin(format!("{}{}", self.origin.trim_end_matches('/'), API_PREFIX))
    }

    pub fn base_url(&self) -> String {
        self.resolve_base().url(&self.origin)
    }

    fn is_dev_server(&self) -> bool {
        if self.dev_mode {
            return true;
        }
        Url::parse(&self.origin)
            .ok()
            .and_then(|url| url.port())
            .is_some_and(|port| DEV_SERVER_PORTS.contains(&port))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn explicit_url_wins_in_every_mode() {
        for (origin, dev) in [("https://qms.example.com", false), ("http://localhost:3000", true)] {
            let config = ClientConfig::new(origin)
                .with_dev_mode(dev)
                .with_api_url("https://api.example.com/v2/");
            assert_eq!(
                config.resolve_base(),
                ApiBase::Explicit("https://api.example.com/v2".to_string())
            );
            assert_eq!(config.base_url(), "https://api.example.com/v2");
        }
    }

    #[test]
    fn blank_explicit_url_is_ignored() {
        let config = ClientConfig::new("https://qms.example.com").with_api_url("   ");
        assert_eq!(
            config.resolve_base(),
            ApiBase::SameOrigin("https://qms.example.com/api/v1".to_string())
        );
    }

    #[test]
    fn dev_server_port_selects_proxy_path() {
        let config = ClientConfig::new("http://localhost:3000");
        assert_eq!(config.resolve_base(), ApiBase::DevProxy("/api/v1"));
        assert_eq!(config.base_url(), "http://localhost:3000/api/v1");
    }

    #[test]
    fn dev_mode_flag_selects_proxy_path() {
        let config = ClientConfig::new("http://127.0.0.1:8081").with_dev_mode(true);
        assert_eq!(config.resolve_base(), ApiBase::DevProxy(DEV_PROXY_PATH));
    }

    #[test]
    fn production_uses_same_origin() {
        let config = ClientConfig::new("https://qms.example.com/");
        assert_eq!(
            config.resolve_base(),
            ApiBase::SameOrigin("https://qms.example.com/api/v1".to_string())
        );
    }

    #[test]
    fn from_lookup_reads_every_key() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("QMS_API_URL", "https://api.example.com"),
            ("QMS_ORIGIN", "https://qms.example.com"),
            ("QMS_DEV_MODE", "true"),
            ("QMS_TIMEOUT_SECS", "30"),
            ("QMS_TOKEN_FILE", "/tmp/qms/tokens.json"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.origin, "https://qms.example.com");
        assert!(config.dev_mode);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.token_file, Some(PathBuf::from("/tmp/qms/tokens.json")));
    }

    #[test]
    fn from_lookup_defaults() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let err = ClientConfig::from_lookup(lookup(&[("QMS_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));

        let err = ClientConfig::from_lookup(lookup(&[("QMS_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));

        let err = ClientConfig::from_lookup(lookup(&[("QMS_DEV_MODE", "maybe")])).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}

use std::{
    fs,
    net::SocketAddr,
    path::Path,
    time::Duration,
};
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "conf.json";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";


/// Relay configuration, read once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// `<owner>/<name>` of the target repository
    pub repo: String,
    pub branch: String,
    pub token: String,
    #[serde(deserialize_with = "port_from_json")]
    pub port: u16,
    /// Route the relay is mounted on
    pub url: String,
    /// Multipart field carrying the uploaded file
    pub param_name: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Timeout for the outbound call; the transport default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u16),
    Text(String),
}

// MWeb-era configs write the port as a string.
fn port_from_json<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    match PortValue::deserialize(deserializer)? {
        PortValue::Number(port) => Ok(port),
        PortValue::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port `{}`", text))),
    }
}


impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        Self::parse(&raw, path)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Self::parse(raw, Path::new("<inline>"))
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(raw)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

        if !config.url.starts_with('/') {
            return Err(ConfigError::InvalidRoute(config.url))
        }

        if config.timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout)
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Catch-all pattern for routes ending in `/`. It matches the route itself
    /// and every path below it.
    pub fn subtree_route(&self) -> Option<String> {
        self.url
            .ends_with('/')
            .then(|| format!("{}*rest", self.url))
    }

    /// Endpoint that creates `path` in the configured repository.
    pub fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base.trim_end_matches('/'),
            self.repo,
            path,
        )
    }
}

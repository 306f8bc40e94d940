use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub const ENV_BIND: &str = "IMGSNIFF_BIND";
pub const ENV_MAX_REQUEST_BYTES: &str = "IMGSNIFF_MAX_REQUEST_BYTES";
pub const ENV_MAX_IMAGE_BYTES: &str = "IMGSNIFF_MAX_IMAGE_BYTES";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "IMGSNIFF_FETCH_TIMEOUT_SECS";

pub const CONFIG_ENV_KEYS: [&str; 4] = [
    ENV_BIND,
    ENV_MAX_REQUEST_BYTES,
    ENV_MAX_IMAGE_BYTES,
    ENV_FETCH_TIMEOUT_SECS,
];

const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 8787);
const DEFAULT_MAX_REQUEST_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address for the RPC endpoint
    pub bind: SocketAddr,
    /// Upper bound on an RPC request body
    pub max_request_bytes: usize,
    /// Upper bound on a fetched image body
    pub max_image_bytes: usize,
    /// Whole-request timeout for image fetches
    pub fetch_timeout: Duration,
    /// Names of the environment variables that were applied, sorted
    pub bindings: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(DEFAULT_BIND),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            bindings: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for the known keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut bindings = Vec::new();
        let mut read = |key: &str| {
            let value = lookup(key)?;
            bindings.push(key.to_string());
            Some(value)
        };

        if let Some(value) = read(ENV_BIND) {
            config.bind = parse_value(ENV_BIND, &value)?;
        }
        if let Some(value) = read(ENV_MAX_REQUEST_BYTES) {
            config.max_request_bytes = parse_value(ENV_MAX_REQUEST_BYTES, &value)?;
        }
        if let Some(value) = read(ENV_MAX_IMAGE_BYTES) {
            config.max_image_bytes = parse_value(ENV_MAX_IMAGE_BYTES, &value)?;
        }
        if let Some(value) = read(ENV_FETCH_TIMEOUT_SECS) {
            config.fetch_timeout = Duration::from_secs(parse_value(ENV_FETCH_TIMEOUT_SECS, &value)?);
        }

        config.bindings = bindings;
        config.bindings.sort();
        Ok(config)
    }

    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_max_request_bytes(mut self, bytes: usize) -> Self {
        self.max_request_bytes = bytes;
        self
    }

    pub fn with_max_image_bytes(mut self, bytes: usize) -> Self {
        self.max_image_bytes = bytes;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::Config {
        key: key.to_string(),
        value: value.to_string(),
    })
}

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::provider::DEFAULT_MAX_ATTEMPTS;
use crate::types::Tier;

const DEFAULT_WORD_SOURCE_URL: &str = "https://random-word.ryanrk.com/api/en";
const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2";
const DEFAULT_LOCAL_SERVICE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_LOOKAHEAD: usize = 1;
const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Remote,
    Local,
    Static,
}

impl ProviderKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Some(Self::Remote),
            "local" => Some(Self::Local),
            "static" | "sample" => Some(Self::Static),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Directory for rolling log files; `None` keeps logging on stdout only.
    pub log_dir: Option<PathBuf>,
    pub provider: ProviderKind,
    pub word_source_url: String,
    pub dictionary_url: String,
    pub local_service_url: String,
    pub max_attempts: usize,
    pub fetch_timeout: Duration,
    pub lookahead: usize,
    pub default_difficulty: Tier,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
            log_level: "info".to_string(),
            log_dir: None,
            provider: ProviderKind::Remote,
            word_source_url: DEFAULT_WORD_SOURCE_URL.to_string(),
            dictionary_url: DEFAULT_DICTIONARY_URL.to_string(),
            local_service_url: DEFAULT_LOCAL_SERVICE_URL.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            lookahead: DEFAULT_LOOKAHEAD,
            default_difficulty: Tier::Beginner,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Missing or unparsable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = get("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let host = get("HOST")
            .and_then(|value| value.trim().parse::<IpAddr>().ok())
            .unwrap_or(defaults.host);

        let log_level = get("RUST_LOG").unwrap_or(defaults.log_level);

        let log_dir = get("ENABLE_FILE_LOGS")
            .filter(|v| v == "true" || v == "1")
            .map(|_| PathBuf::from(get("LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())));

        let provider = get("WORD_PROVIDER")
            .and_then(|value| ProviderKind::from_str(&value))
            .unwrap_or(defaults.provider);

        let max_attempts = get("WORD_FETCH_MAX_ATTEMPTS")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(defaults.max_attempts)
            .max(1);

        let fetch_timeout = get("WORD_FETCH_TIMEOUT")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.fetch_timeout);

        let lookahead = get("WORD_LOOKAHEAD")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(defaults.lookahead);

        let default_difficulty = get("DEFAULT_DIFFICULTY")
            .and_then(|value| Tier::from_str(&value))
            .unwrap_or(defaults.default_difficulty);

        Self {
            host,
            port,
            log_level,
            log_dir,
            provider,
            word_source_url: get("WORD_SOURCE_URL").unwrap_or(defaults.word_source_url),
            dictionary_url: get("DICTIONARY_URL").unwrap_or(defaults.dictionary_url),
            local_service_url: get("LOCAL_WORD_SERVICE_URL")
                .unwrap_or(defaults.local_service_url),
            max_attempts,
            fetch_timeout,
            lookahead,
            default_difficulty,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

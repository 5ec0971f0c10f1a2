//! Word providers.
//!
//! A provider turns a difficulty tier into a validated [`WordEntry`]. Three
//! backends share the [`WordProvider`] trait:
//!
//! - [`RemoteDictionaryProvider`]: random word source plus dictionary lookup,
//!   retrying until a word with a usable definition turns up.
//! - [`LocalWordProvider`]: a single local word service, placeholder text only.
//! - [`SampleProvider`]: a fixed in-memory list filtered by tier.

mod local;
mod remote;
mod sample;

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;
use tracing::warn;

use crate::config::{Config, ProviderKind};
use crate::types::{Tier, WordEntry};

pub use local::LocalWordProvider;
pub use remote::{RemoteDictionaryProvider, DEFAULT_MAX_ATTEMPTS};
pub use sample::{sample_entries, SampleProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status}")]
    HttpStatus { status: reqwest::StatusCode },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("no definition found for {0}")]
    NoDefinitionFound(String),
    #[error("gave up after {attempts} attempts")]
    ExhaustedRetries { attempts: usize },
    #[error("no words available for tier {0}")]
    NoWordsForTier(Tier),
}

pub trait WordProvider: Send + Sync {
    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;

    fn fetch_word(&self, tier: Tier) -> BoxFuture<'_, Result<WordEntry, ProviderError>>;

    /// Words for a fresh queue: the first becomes current, the rest upcoming.
    ///
    /// Only the first word is required. Lookahead words that fail to load
    /// shorten the result instead of failing the call.
    fn fetch_initial(
        &self,
        tier: Tier,
        lookahead: usize,
    ) -> BoxFuture<'_, Result<Vec<WordEntry>, ProviderError>> {
        Box::pin(async move {
            let first = self.fetch_word(tier).await?;
            let mut words = vec![first];
            for _ in 0..lookahead {
                match self.fetch_word(tier).await {
                    Ok(word) => words.push(word),
                    Err(err) => {
                        warn!(provider = self.name(), %tier, error = %err, "lookahead fetch failed");
                        break;
                    }
                }
            }
            Ok(words)
        })
    }
}

pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

pub fn from_config(config: &Config) -> Arc<dyn WordProvider> {
    let client = http_client(config.fetch_timeout);
    match config.provider {
        ProviderKind::Remote => Arc::new(RemoteDictionaryProvider::new(
            client,
            &config.word_source_url,
            &config.dictionary_url,
            config.max_attempts,
        )),
        ProviderKind::Local => Arc::new(LocalWordProvider::new(client, &config.local_service_url)),
        ProviderKind::Static => Arc::new(SampleProvider::default()),
    }
}

fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

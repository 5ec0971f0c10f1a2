use futures::future::BoxFuture;
use tracing::debug;

use super::remote::first_word;
use super::{normalize_base, ProviderError, WordProvider};
use crate::types::{Tier, WordEntry};

/// Single local word service. No dictionary enrichment: definition and
/// example are always placeholders, and the tier is only recorded.
#[derive(Clone)]
pub struct LocalWordProvider {
    client: reqwest::Client,
    base_url: String,
}

impl LocalWordProvider {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base(base_url),
        }
    }

    async fn fetch(&self, tier: Tier) -> Result<WordEntry, ProviderError> {
        let url = format!("{}/word/english", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus { status });
        }
        let body = resp.text().await?;
        let word = first_word(&body)?;
        debug!(%word, %tier, "fetched local word");
        Ok(WordEntry::keyed_by_word(word, None, None, tier))
    }
}

impl WordProvider for LocalWordProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    fn fetch_word(&self, tier: Tier) -> BoxFuture<'_, Result<WordEntry, ProviderError>> {
        Box::pin(self.fetch(tier))
    }
}

use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{normalize_base, ProviderError, WordProvider};
use crate::types::{Tier, WordEntry};

pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Two-stage lookup: a random word of the tier's length, then its dictionary
/// entry. Words without a usable definition are discarded and another word is
/// drawn, at most `max_attempts` times.
#[derive(Clone)]
pub struct RemoteDictionaryProvider {
    client: reqwest::Client,
    word_source_url: String,
    dictionary_url: String,
    max_attempts: usize,
}

#[derive(Debug, Deserialize)]
struct DictionaryEntry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    #[serde(default)]
    definition: Option<String>,
    #[serde(default)]
    example: Option<String>,
}

impl RemoteDictionaryProvider {
    pub fn new(
        client: reqwest::Client,
        word_source_url: &str,
        dictionary_url: &str,
        max_attempts: usize,
    ) -> Self {
        Self {
            client,
            word_source_url: normalize_base(word_source_url),
            dictionary_url: normalize_base(dictionary_url),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    async fn random_word(&self, tier: Tier) -> Result<String, ProviderError> {
        let (min, max) = tier.length_range();
        let url = format!(
            "{}/word/random/?minlength={min}&maxlength={max}",
            self.word_source_url
        );
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus { status });
        }
        let body = resp.text().await?;
        first_word(&body)
    }

    async fn lookup(&self, word: &str) -> Result<(String, Option<String>), ProviderError> {
        let url = format!(
            "{}/entries/en/{}",
            self.dictionary_url,
            urlencoding::encode(word)
        );
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(ProviderError::NoDefinitionFound(word.to_string()));
        }
        let body = resp.text().await?;
        first_definition(&body).ok_or_else(|| ProviderError::NoDefinitionFound(word.to_string()))
    }

    async fn fetch_validated(&self, tier: Tier) -> Result<WordEntry, ProviderError> {
        for attempt in 1..=self.max_attempts {
            let word = self.random_word(tier).await?;
            debug!(%word, %tier, attempt, "fetched random word");

            match self.lookup(&word).await {
                Ok((definition, example)) => {
                    return Ok(WordEntry::keyed_by_word(word, Some(definition), example, tier));
                }
                Err(ProviderError::NoDefinitionFound(word)) => {
                    warn!(%word, attempt, "no definition found, drawing another word");
                }
                Err(err) => return Err(err),
            }
        }
        Err(ProviderError::ExhaustedRetries {
            attempts: self.max_attempts,
        })
    }
}

impl WordProvider for RemoteDictionaryProvider {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn fetch_word(&self, tier: Tier) -> BoxFuture<'_, Result<WordEntry, ProviderError>> {
        Box::pin(self.fetch_validated(tier))
    }
}

pub(super) fn first_word(body: &str) -> Result<String, ProviderError> {
    let candidates: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("word list: {e}")))?;
    candidates
        .first()
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .ok_or_else(|| ProviderError::MalformedResponse("word list has no word".to_string()))
}

/// `[0].meanings[0].definitions[0]` of a dictionary response, if it carries a
/// non-blank definition.
fn first_definition(body: &str) -> Option<(String, Option<String>)> {
    let entries: Vec<DictionaryEntry> = serde_json::from_str(body).ok()?;
    let first = entries
        .into_iter()
        .next()?
        .meanings
        .into_iter()
        .next()?
        .definitions
        .into_iter()
        .next()?;
    let definition = first.definition.filter(|d| !d.trim().is_empty())?;
    Some((definition, first.example))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_word_takes_head() {
        assert_eq!(first_word(r#"["maple","oak"]"#).unwrap(), "maple");
    }

    #[test]
    fn test_first_word_rejects_empty_and_garbage() {
        assert!(matches!(first_word("[]"), Err(ProviderError::MalformedResponse(_))));
        assert!(matches!(first_word("[42]"), Err(ProviderError::MalformedResponse(_))));
        assert!(matches!(first_word("{\"a\":1}"), Err(ProviderError::MalformedResponse(_))));
    }

    #[test]
    fn test_first_definition_path() {
        let body = r#"[{"word":"cat","meanings":[{"partOfSpeech":"noun","definitions":[
            {"definition":"A small domesticated feline.","example":"The cat sat."},
            {"definition":"ignored"}]}]}]"#;
        let (definition, example) = first_definition(body).unwrap();
        assert_eq!(definition, "A small domesticated feline.");
        assert_eq!(example.as_deref(), Some("The cat sat."));
    }

    #[test]
    fn test_first_definition_missing_path() {
        assert!(first_definition("[]").is_none());
        assert!(first_definition(r#"[{"meanings":[]}]"#).is_none());
        assert!(first_definition(r#"[{"meanings":[{"definitions":[{"definition":" "}]}]}]"#).is_none());
        assert!(first_definition(r#"{"title":"No Definitions Found"}"#).is_none());
    }

    #[test]
    fn test_attempts_never_zero() {
        let provider = RemoteDictionaryProvider::new(reqwest::Client::new(), "http://a", "http://b", 0);
        assert_eq!(provider.max_attempts(), 1);
    }
}

use std::collections::HashMap;

use futures::future::BoxFuture;
use parking_lot::Mutex;

use super::{ProviderError, WordProvider};
use crate::types::{Tier, WordEntry};

const SAMPLE_WORDS: [(&str, &str, &str, &str, Tier); 5] = [
    (
        "1",
        "hello",
        "Used as a greeting or to begin a phone conversation.",
        "Hello, how are you today?",
        Tier::Beginner,
    ),
    (
        "2",
        "world",
        "The earth, together with all of its countries and peoples.",
        "She wants to travel around the world.",
        Tier::Beginner,
    ),
    (
        "3",
        "algorithm",
        "A process or set of rules to be followed in calculations or other problem-solving operations.",
        "The search engine uses a complex algorithm to rank pages.",
        Tier::Advanced,
    ),
    (
        "4",
        "learn",
        "To gain knowledge or skill by studying, practicing, or being taught.",
        "Children learn quickly when they play.",
        Tier::Beginner,
    ),
    (
        "5",
        "coffee",
        "A hot drink made from the roasted and ground seeds of a tropical shrub.",
        "He drinks a cup of coffee every morning.",
        Tier::Beginner,
    ),
];

pub fn sample_entries() -> Vec<WordEntry> {
    SAMPLE_WORDS
        .iter()
        .map(|&(id, word, definition, example, difficulty)| WordEntry {
            id: id.to_string(),
            word: word.to_string(),
            definition: definition.to_string(),
            example: example.to_string(),
            difficulty,
        })
        .collect()
}

/// Fixed in-memory word list. Lookups never touch the network.
///
/// `fetch_word` walks the entries of a tier in list order and wraps around at
/// the end; `fetch_initial` hands out the whole tier and rewinds its cursor.
#[derive(Debug)]
pub struct SampleProvider {
    entries: Vec<WordEntry>,
    cursors: Mutex<HashMap<Tier, usize>>,
}

impl Default for SampleProvider {
    fn default() -> Self {
        Self::new(sample_entries())
    }
}

impl SampleProvider {
    pub fn new(entries: Vec<WordEntry>) -> Self {
        Self {
            entries,
            cursors: Mutex::new(HashMap::new()),
        }
    }

    /// Entries of `tier` in list order.
    pub fn matching(&self, tier: Tier) -> Vec<WordEntry> {
        self.entries
            .iter()
            .filter(|e| e.difficulty == tier)
            .cloned()
            .collect()
    }
}

impl WordProvider for SampleProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch_word(&self, tier: Tier) -> BoxFuture<'_, Result<WordEntry, ProviderError>> {
        let words = self.matching(tier);
        let result = if words.is_empty() {
            Err(ProviderError::NoWordsForTier(tier))
        } else {
            let mut cursors = self.cursors.lock();
            let cursor = cursors.entry(tier).or_insert(0);
            let word = words[*cursor % words.len()].clone();
            *cursor = (*cursor + 1) % words.len();
            Ok(word)
        };
        Box::pin(async move { result })
    }

    fn fetch_initial(
        &self,
        tier: Tier,
        _lookahead: usize,
    ) -> BoxFuture<'_, Result<Vec<WordEntry>, ProviderError>> {
        let words = self.matching(tier);
        self.cursors.lock().insert(tier, 0);
        Box::pin(async move {
            if words.is_empty() {
                Err(ProviderError::NoWordsForTier(tier))
            } else {
                Ok(words)
            }
        })
    }
}

//! Word supply controller.
//!
//! Owns the player-facing queue: the current word, the words already played,
//! and a small lookahead buffer. At most one fetch per difficulty generation
//! runs at a time; a fetch that started before the latest `set_difficulty`
//! is discarded when it lands.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::provider::WordProvider;
use crate::types::{Tier, WordEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueState {
    pub current: Option<WordEntry>,
    pub previous: Vec<WordEntry>,
    pub upcoming: VecDeque<WordEntry>,
    pub difficulty: Tier,
    pub fetch_in_flight: bool,
    pub generation: u64,
}

impl QueueState {
    fn new(difficulty: Tier) -> Self {
        Self {
            current: None,
            previous: Vec::new(),
            upcoming: VecDeque::new(),
            difficulty,
            fetch_in_flight: false,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SupplyOutcome {
    /// The queue changed.
    Updated,
    /// Another fetch was in flight; nothing was touched.
    Busy,
    /// The provider produced nothing; the queue is as it was.
    NoWord,
    /// The difficulty changed while fetching; the result was dropped.
    Stale,
}

/// Result of [`WordSupply::submit_guess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessResult {
    pub correct: bool,
    /// Set when a correct guess tried to move on.
    pub outcome: Option<SupplyOutcome>,
}

/// Holds the in-flight flag for one generation and releases it on drop, so
/// every exit path of a fetch (including cancellation) clears it.
struct FetchClaim<'a> {
    state: &'a Mutex<QueueState>,
    generation: u64,
    tier: Tier,
}

impl Drop for FetchClaim<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.generation == self.generation {
            state.fetch_in_flight = false;
        }
    }
}

enum AdvanceStep<'a> {
    Busy,
    Reload,
    Promoted(FetchClaim<'a>),
    Resync(FetchClaim<'a>),
}

pub struct WordSupply {
    provider: Arc<dyn WordProvider>,
    lookahead: usize,
    state: Mutex<QueueState>,
}

impl WordSupply {
    pub fn new(provider: Arc<dyn WordProvider>, difficulty: Tier, lookahead: usize) -> Self {
        Self {
            provider,
            lookahead,
            state: Mutex::new(QueueState::new(difficulty)),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn snapshot(&self) -> QueueState {
        self.state.lock().clone()
    }

    pub fn current_word(&self) -> Option<WordEntry> {
        self.state.lock().current.clone()
    }

    pub fn difficulty(&self) -> Tier {
        self.state.lock().difficulty
    }

    pub fn is_fetching(&self) -> bool {
        self.state.lock().fetch_in_flight
    }

    pub fn history(&self) -> Vec<WordEntry> {
        self.state.lock().previous.clone()
    }

    /// Case-insensitive comparison against the current word, `None` when no
    /// word is loaded.
    pub fn check_guess(&self, guess: &str) -> Option<bool> {
        self.state
            .lock()
            .current
            .as_ref()
            .map(|entry| entry.matches_guess(guess))
    }

    /// Checks `guess` against the current word and, when it matches, advances
    /// from that same word. Returns `None` when no word is loaded.
    pub async fn submit_guess(&self, guess: &str) -> Option<GuessResult> {
        let step = {
            let mut state = self.state.lock();
            let correct = state.current.as_ref()?.matches_guess(guess);
            if !correct {
                return Some(GuessResult {
                    correct,
                    outcome: None,
                });
            }
            self.claim_advance(&mut state)
        };

        let outcome = self.run_advance(step).await;
        debug!(?outcome, "correct guess");
        Some(GuessResult {
            correct: true,
            outcome: Some(outcome),
        })
    }

    pub async fn set_difficulty(&self, tier: Tier) -> SupplyOutcome {
        {
            let mut state = self.state.lock();
            state.difficulty = tier;
            state.generation += 1;
            // Any fetch still running belongs to the old generation and will
            // be discarded, so it must not block the reload.
            state.fetch_in_flight = false;
            info!(%tier, generation = state.generation, "difficulty changed");
        }
        self.load_initial().await
    }

    /// Replaces the queue with fresh words for the current difficulty and
    /// clears the history.
    pub async fn load_initial(&self) -> SupplyOutcome {
        let Some(claim) = self.try_claim() else {
            debug!("load skipped, fetch already in flight");
            return SupplyOutcome::Busy;
        };

        match self.provider.fetch_initial(claim.tier, self.lookahead).await {
            Ok(words) if !words.is_empty() => {
                let count = words.len();
                let outcome = self.apply(&claim, move |state| {
                    let mut words = VecDeque::from(words);
                    state.current = words.pop_front();
                    state.upcoming = words;
                    state.previous.clear();
                });
                debug!(tier = %claim.tier, count, ?outcome, "initial words loaded");
                outcome
            }
            Ok(_) => {
                warn!(provider = self.provider.name(), tier = %claim.tier, "provider returned no words");
                SupplyOutcome::NoWord
            }
            Err(err) => {
                warn!(provider = self.provider.name(), tier = %claim.tier, error = %err, "initial fetch failed");
                SupplyOutcome::NoWord
            }
        }
    }

    /// Moves to the next word.
    ///
    /// With a buffered word the switch is immediate and the buffer is refilled
    /// afterwards. With an empty buffer a replacement word is fetched first,
    /// and the current word only moves into history once it arrives.
    pub async fn advance(&self) -> SupplyOutcome {
        let step = {
            let mut state = self.state.lock();
            self.claim_advance(&mut state)
        };
        self.run_advance(step).await
    }

    async fn run_advance(&self, step: AdvanceStep<'_>) -> SupplyOutcome {
        match step {
            AdvanceStep::Busy => {
                debug!("advance skipped, fetch already in flight");
                SupplyOutcome::Busy
            }
            AdvanceStep::Reload => self.load_initial().await,
            AdvanceStep::Promoted(claim) => {
                self.refill(&claim).await;
                SupplyOutcome::Updated
            }
            AdvanceStep::Resync(claim) => {
                let outcome = match self.provider.fetch_word(claim.tier).await {
                    Ok(word) => self.apply(&claim, move |state| {
                        if let Some(old) = state.current.replace(word) {
                            state.previous.push(old);
                        }
                    }),
                    Err(err) => {
                        warn!(provider = self.provider.name(), tier = %claim.tier, error = %err, "replacement fetch failed");
                        SupplyOutcome::NoWord
                    }
                };
                if outcome == SupplyOutcome::Updated {
                    self.refill(&claim).await;
                }
                outcome
            }
        }
    }

    fn try_claim(&self) -> Option<FetchClaim<'_>> {
        let mut state = self.state.lock();
        if state.fetch_in_flight {
            return None;
        }
        state.fetch_in_flight = true;
        Some(FetchClaim {
            state: &self.state,
            generation: state.generation,
            tier: state.difficulty,
        })
    }

    fn claim_advance(&self, state: &mut MutexGuard<'_, QueueState>) -> AdvanceStep<'_> {
        if state.fetch_in_flight {
            return AdvanceStep::Busy;
        }
        if state.current.is_none() && state.upcoming.is_empty() {
            return AdvanceStep::Reload;
        }

        state.fetch_in_flight = true;
        let claim = FetchClaim {
            state: &self.state,
            generation: state.generation,
            tier: state.difficulty,
        };

        match state.upcoming.pop_front() {
            Some(next) => {
                if let Some(old) = state.current.replace(next) {
                    state.previous.push(old);
                }
                AdvanceStep::Promoted(claim)
            }
            None => AdvanceStep::Resync(claim),
        }
    }

    /// Tops the lookahead buffer back up. A failed fetch leaves it short;
    /// the next `advance` then fetches directly.
    async fn refill(&self, claim: &FetchClaim<'_>) {
        loop {
            let missing = {
                let state = self.state.lock();
                if state.generation != claim.generation {
                    return;
                }
                self.lookahead.saturating_sub(state.upcoming.len())
            };
            if missing == 0 {
                return;
            }

            match self.provider.fetch_word(claim.tier).await {
                Ok(word) => {
                    if self.apply(claim, move |state| state.upcoming.push_back(word))
                        != SupplyOutcome::Updated
                    {
                        return;
                    }
                }
                Err(err) => {
                    warn!(provider = self.provider.name(), tier = %claim.tier, error = %err, "lookahead refill failed");
                    return;
                }
            }
        }
    }

    fn apply(&self, claim: &FetchClaim<'_>, update: impl FnOnce(&mut QueueState)) -> SupplyOutcome {
        let mut state = self.state.lock();
        if state.generation != claim.generation {
            debug!(
                fetched_for = claim.generation,
                current = state.generation,
                "discarding stale fetch"
            );
            return SupplyOutcome::Stale;
        }
        update(&mut state);
        SupplyOutcome::Updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SampleProvider;

    fn sample_supply() -> WordSupply {
        WordSupply::new(Arc::new(SampleProvider::default()), Tier::Beginner, 1)
    }

    fn words(entries: &[WordEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.word.as_str()).collect()
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let supply = sample_supply();
        let state = supply.snapshot();
        assert!(state.current.is_none());
        assert!(state.previous.is_empty());
        assert!(state.upcoming.is_empty());
        assert!(!state.fetch_in_flight);
        assert_eq!(supply.check_guess("hello"), None);
    }

    #[tokio::test]
    async fn test_claim_released_on_drop() {
        let supply = sample_supply();
        let claim = supply.try_claim().unwrap();
        assert!(supply.is_fetching());
        assert!(supply.try_claim().is_none());
        drop(claim);
        assert!(!supply.is_fetching());
    }

    #[tokio::test]
    async fn test_stale_claim_does_not_release_newer_flag() {
        let supply = sample_supply();
        let old = supply.try_claim().unwrap();
        {
            let mut state = supply.state.lock();
            state.generation += 1;
            state.fetch_in_flight = false;
        }
        let _new = supply.try_claim().unwrap();
        drop(old);
        assert!(supply.is_fetching());
    }

    #[tokio::test]
    async fn test_advance_walks_sample_list() {
        let supply = sample_supply();
        assert_eq!(supply.load_initial().await, SupplyOutcome::Updated);
        assert_eq!(supply.advance().await, SupplyOutcome::Updated);
        assert_eq!(supply.advance().await, SupplyOutcome::Updated);

        let state = supply.snapshot();
        assert_eq!(state.current.as_ref().unwrap().word, "learn");
        assert_eq!(words(&state.previous), ["hello", "world"]);
        assert_eq!(state.upcoming.len(), 1);
    }

    #[tokio::test]
    async fn test_advance_before_load_falls_back_to_initial() {
        let supply = sample_supply();
        assert_eq!(supply.advance().await, SupplyOutcome::Updated);
        assert_eq!(supply.current_word().unwrap().word, "hello");
        assert!(supply.history().is_empty());
    }

    #[tokio::test]
    async fn test_guess_is_case_insensitive() {
        let supply = sample_supply();
        supply.load_initial().await;
        assert_eq!(supply.check_guess("HeLLo"), Some(true));
        assert_eq!(supply.check_guess("hullo"), Some(false));
    }
}

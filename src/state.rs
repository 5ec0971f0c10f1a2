use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::provider::{self, WordProvider};
use crate::supply::WordSupply;

#[derive(Clone)]
pub struct AppState {
    supply: Arc<WordSupply>,
    started_at: Instant,
}

impl AppState {
    pub fn new(supply: Arc<WordSupply>) -> Self {
        Self {
            supply,
            started_at: Instant::now(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_provider(provider::from_config(config), config)
    }

    pub fn with_provider(provider: Arc<dyn WordProvider>, config: &Config) -> Self {
        Self::new(Arc::new(WordSupply::new(
            provider,
            config.default_difficulty,
            config.lookahead,
        )))
    }

    pub fn supply(&self) -> &Arc<WordSupply> {
        &self.supply
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

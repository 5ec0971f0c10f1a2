use std::fmt;

use serde::{Deserialize, Serialize};

pub const NO_EXAMPLE: &str = "No example available.";
pub const NO_DEFINITION: &str = "No definition available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Beginner, Tier::Intermediate, Tier::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    /// Inclusive word-length bounds requested from the random word source.
    pub fn length_range(&self) -> (u32, u32) {
        match self {
            Self::Beginner => (3, 5),
            Self::Intermediate => (6, 8),
            Self::Advanced => (9, 12),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    pub id: String,
    pub word: String,
    pub definition: String,
    pub example: String,
    pub difficulty: Tier,
}

impl WordEntry {
    /// Entry keyed by its own spelling, as produced by the network providers.
    pub fn keyed_by_word(
        word: impl Into<String>,
        definition: Option<String>,
        example: Option<String>,
        difficulty: Tier,
    ) -> Self {
        let word = word.into();
        Self {
            id: word.clone(),
            word,
            definition: non_blank(definition).unwrap_or_else(|| NO_DEFINITION.to_string()),
            example: non_blank(example).unwrap_or_else(|| NO_EXAMPLE.to_string()),
            difficulty,
        }
    }

    pub fn matches_guess(&self, guess: &str) -> bool {
        let guess = guess.trim();
        !guess.is_empty() && guess.to_lowercase() == self.word.to_lowercase()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

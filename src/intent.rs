//! Intent classification against the keyword-phrase intent corpus.

use crate::corpus::Corpus;
use crate::error::Result;
use crate::matcher::{best_match, ResultFields};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

/// Reply used when the intent has no configured responses.
pub const OUT_OF_SCOPE: &str =
    "Apologies, I won't be able to answer this as it is out of my scope";

/// The purpose of a user utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    General,
    AnnounceName,
    ChangeName,
    GameSearch,
    PlatformRecommendation,
    GenreExploration,
    GameFact,
    GameGenreFact,
    GamePlatformFact,
    Goodbye,
    /// Any other label; answered from the intent response table.
    Other(String),
}

impl Intent {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "general" => Intent::General,
            "announce_name" => Intent::AnnounceName,
            "change_name" => Intent::ChangeName,
            "game_search" => Intent::GameSearch,
            "platform_recommendation" => Intent::PlatformRecommendation,
            "genre_exploration" => Intent::GenreExploration,
            "game_fact" => Intent::GameFact,
            "game_genre_fact" => Intent::GameGenreFact,
            "game_platform_fact" => Intent::GamePlatformFact,
            "goodbye" => Intent::Goodbye,
            other => Intent::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Intent::General => "general",
            Intent::AnnounceName => "announce_name",
            Intent::ChangeName => "change_name",
            Intent::GameSearch => "game_search",
            Intent::PlatformRecommendation => "platform_recommendation",
            Intent::GenreExploration => "genre_exploration",
            Intent::GameFact => "game_fact",
            Intent::GameGenreFact => "game_genre_fact",
            Intent::GamePlatformFact => "game_platform_fact",
            Intent::Goodbye => "goodbye",
            Intent::Other(label) => label,
        }
    }

    pub fn is_game_search(&self) -> bool {
        matches!(
            self,
            Intent::GameSearch | Intent::PlatformRecommendation | Intent::GenreExploration
        )
    }

    pub fn is_game_fact(&self) -> bool {
        matches!(
            self,
            Intent::GameFact | Intent::GameGenreFact | Intent::GamePlatformFact
        )
    }
}

/// Label `tokens` with one intent; below threshold yields the fallback row's intent.
pub fn classify<S: AsRef<str>>(tokens: &[S], corpus: &Corpus, threshold: f64) -> Result<Intent> {
    let result = best_match(
        tokens,
        corpus,
        "value",
        ResultFields::Single("intent"),
        threshold,
    )?;
    let intent = Intent::from_label(result.value());
    info!(
        "Classified intent: {} (score: {:.3})",
        intent.label(),
        result.score
    );
    Ok(intent)
}

/// A random configured response for `intent`.
pub fn intent_response<R: Rng + ?Sized>(
    intent: &Intent,
    responses: &Corpus,
    rng: &mut R,
) -> Result<String> {
    let intent_col = responses.column("intent")?;
    let response_col = responses.column("response")?;
    let candidates: Vec<&str> = responses
        .rows()
        .iter()
        .filter(|row| row[intent_col] == intent.label())
        .map(|row| row[response_col].as_str())
        .collect();

    Ok(candidates
        .choose(rng)
        .map(|s| s.to_string())
        .unwrap_or_else(|| OUT_OF_SCOPE.to_string()))
}

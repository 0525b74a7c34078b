//! Dialogue repair: reusable loops for resolving an entity from noisy input.
//!
//! - [`reprompt_until_valid`]: read, try, reprompt until the attempt succeeds.
//! - [`ConfidenceTiers`] + [`resolve_tiered`]: reject / confirm / accept a guess
//!   by similarity score.
//! - [`entity_in_input`]: decides the wording of a "not found" message.
//!
//! None of the loops has a turn limit; they end on valid input or when the
//! console closes.

use crate::console::Console;
use crate::error::Result;
use crate::normalize::{is_stopword, tokenize};
use lazy_static::lazy_static;
use std::collections::HashSet;
use tracing::debug;

lazy_static! {
    /// Request vocabulary that never names a game, platform or genre.
    static ref REQUEST_WORDS: HashSet<&'static str> = [
        "i", "information", "game", "opinion", "review", "interest", "read", "type",
        "provide", "description", "detail", "insight", "fact", "tell", "give", "how",
        "more", "info", "about", "learn", "understand", "explain", "platform",
        "genre", "available", "compatible", "play", "show", "platforms", "support", "run",
        "?", ".", "!",
    ]
    .into_iter()
    .collect();
}

/// Score boundaries for the three-way confidence decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceTiers {
    /// Score >= this (but < high) asks for confirmation
    pub low: f64,
    /// Score >= this is accepted outright
    pub high: f64,
}

impl Default for ConfidenceTiers {
    fn default() -> Self {
        Self {
            low: 0.45,
            high: 0.80,
        }
    }
}

/// Outcome band of a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// `[0, low)`: no usable guess
    Unresolved,
    /// `[low, high)`: ask the user
    Confirm,
    /// `[high, 1]`: commit without asking
    Accept,
}

impl ConfidenceTiers {
    pub fn tier(&self, score: f64) -> Tier {
        if score < self.low {
            Tier::Unresolved
        } else if score < self.high {
            Tier::Confirm
        } else {
            Tier::Accept
        }
    }
}

/// How a tiered guess was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Score was high enough to commit directly.
    Accepted(String),
    /// The user confirmed a medium-confidence guess.
    Confirmed(String),
}

impl Resolution {
    pub fn value(&self) -> &str {
        match self {
            Resolution::Accepted(v) | Resolution::Confirmed(v) => v,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            Resolution::Accepted(v) | Resolution::Confirmed(v) => v,
        }
    }
}

/// Messages used by [`resolve_tiered`].
#[derive(Debug, Clone, Copy)]
pub struct TieredPrompts<'a> {
    /// Low score, but the input seems to name something.
    pub not_in_catalog: &'a str,
    /// Low score and nothing entity-like in the input.
    pub not_understood: &'a str,
    /// The user rejected the guess.
    pub rejected: &'a str,
}

/// Read lines until `attempt` accepts one, saying `reprompt` after each miss.
pub fn reprompt_until_valid<T, F>(console: &mut dyn Console, reprompt: &str, mut attempt: F) -> Result<T>
where
    F: FnMut(&str) -> Result<Option<T>>,
{
    loop {
        let line = console.read_line()?;
        if let Some(value) = attempt(&line)? {
            return Ok(value);
        }
        debug!("Reprompting after invalid input: {:?}", line);
        console.say(reprompt)?;
    }
}

/// Ask a yes/no question about `guess` until the answer is yes or no.
pub fn confirm_guess(console: &mut dyn Console, guess: &str) -> Result<bool> {
    loop {
        console.say(&format!("Did you mean '{}'? (yes/no)", guess))?;
        let answer = console.read_line()?;
        match answer.trim().to_lowercase().as_str() {
            "yes" => return Ok(true),
            "no" => return Ok(false),
            _ => console.say("I'm sorry, I didn't understand that.")?,
        }
    }
}

/// Resolve an entity from fresh console input using confidence tiers.
///
/// `score_input` maps the raw tokens of one line to `(score, best_guess)`.
pub fn resolve_tiered<F>(
    console: &mut dyn Console,
    tiers: ConfidenceTiers,
    prompts: TieredPrompts<'_>,
    mut score_input: F,
) -> Result<Resolution>
where
    F: FnMut(&[String]) -> Result<(f64, String)>,
{
    loop {
        let line = console.read_line()?;
        let tokens = tokenize(&line);
        let (score, guess) = score_input(&tokens)?;
        let tier = tiers.tier(score);
        debug!("Tier {:?} for guess {:?} (score: {:.3})", tier, guess, score);

        match tier {
            Tier::Unresolved => {
                let message = if entity_in_input(&tokens) {
                    prompts.not_in_catalog
                } else {
                    prompts.not_understood
                };
                console.say(message)?;
            }
            Tier::Confirm => {
                if confirm_guess(console, &guess)? {
                    return Ok(Resolution::Confirmed(guess));
                }
                console.say(prompts.rejected)?;
            }
            Tier::Accept => return Ok(Resolution::Accepted(guess)),
        }
    }
}

/// True iff some token survives both stopword filters.
pub fn entity_in_input<S: AsRef<str>>(tokens: &[S]) -> bool {
    tokens.iter().any(|t| {
        let lower = t.as_ref().to_lowercase();
        !is_stopword(&lower) && !REQUEST_WORDS.contains(lower.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    const PROMPTS: TieredPrompts<'static> = TieredPrompts {
        not_in_catalog: "not in catalog",
        not_understood: "did not understand",
        rejected: "ok, again",
    };

    #[test]
    fn test_tiers_are_half_open() {
        let tiers = ConfidenceTiers::default();
        assert_eq!(tiers.tier(0.0), Tier::Unresolved);
        assert_eq!(tiers.tier(0.4499), Tier::Unresolved);
        assert_eq!(tiers.tier(0.45), Tier::Confirm);
        assert_eq!(tiers.tier(0.7999), Tier::Confirm);
        assert_eq!(tiers.tier(0.80), Tier::Accept);
        assert_eq!(tiers.tier(1.0), Tier::Accept);
    }

    #[test]
    fn test_tier_is_total_over_unit_interval() {
        let tiers = ConfidenceTiers::default();
        for i in 0..=1000 {
            let score = i as f64 / 1000.0;
            let expected = if score < 0.45 {
                Tier::Unresolved
            } else if score < 0.80 {
                Tier::Confirm
            } else {
                Tier::Accept
            };
            assert_eq!(tiers.tier(score), expected, "score {}", score);
        }
    }

    #[test]
    fn test_confirm_guess_repeats_on_other_answers() {
        let mut console = ScriptedConsole::new(&["maybe", "  YES "]);
        assert!(confirm_guess(&mut console, "Tetris").unwrap());
        assert_eq!(
            console.said,
            vec![
                "Did you mean 'Tetris'? (yes/no)",
                "I'm sorry, I didn't understand that.",
                "Did you mean 'Tetris'? (yes/no)",
            ]
        );

        let mut console = ScriptedConsole::new(&["no"]);
        assert!(!confirm_guess(&mut console, "Tetris").unwrap());
    }

    #[test]
    fn test_reprompt_until_valid() {
        let mut console = ScriptedConsole::new(&["nope", "also nope", "42"]);
        let value = reprompt_until_valid(&mut console, "try again", |line| {
            Ok(line.parse::<u32>().ok())
        })
        .unwrap();
        assert_eq!(value, 42);
        assert_eq!(console.said, vec!["try again", "try again"]);
    }

    #[test]
    fn test_reprompt_ends_when_input_closes() {
        let mut console = ScriptedConsole::new(&["x"]);
        let result: Result<u32> = reprompt_until_valid(&mut console, "again", |_| Ok(None));
        assert!(matches!(result, Err(crate::error::ChatbotError::InputClosed)));
    }

    #[test]
    fn test_resolve_tiered_rejected_guess_reprompts() {
        let mut console = ScriptedConsole::new(&["tetrs", "no", "tetris"]);
        let mut scores = vec![(0.95, "Tetris".to_string()), (0.6, "Tetris".to_string())];
        let resolution = resolve_tiered(&mut console, ConfidenceTiers::default(), PROMPTS, |_| {
            Ok(scores.pop().unwrap())
        })
        .unwrap();

        assert_eq!(resolution, Resolution::Accepted("Tetris".to_string()));
        assert_eq!(
            console.said,
            vec!["Did you mean 'Tetris'? (yes/no)", "ok, again"]
        );
    }

    #[test]
    fn test_resolve_tiered_low_score_messages() {
        let mut console = ScriptedConsole::new(&["Zelda", "tell me about the game", "yes?", "yes"]);
        let mut scores = vec![
            (0.5, "Portal".to_string()),
            (0.1, "Tetris".to_string()),
            (0.2, "Tetris".to_string()),
        ];
        let resolution = resolve_tiered(&mut console, ConfidenceTiers::default(), PROMPTS, |_| {
            Ok(scores.pop().unwrap())
        })
        .unwrap();

        assert_eq!(resolution, Resolution::Confirmed("Portal".to_string()));
        assert_eq!(console.said[0], "not in catalog");
        assert_eq!(console.said[1], "did not understand");
    }

    #[test]
    fn test_entity_in_input() {
        assert!(entity_in_input(&tokenize("Tell me about Zelda")));
        assert!(!entity_in_input(&tokenize("Tell me about the game?")));
        assert!(!entity_in_input(&tokenize("What platforms does it support?")));
        assert!(!entity_in_input::<String>(&[]));
    }
}

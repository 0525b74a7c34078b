//! Username capture.

use super::HandlerContext;
use crate::console::Console;
use crate::error::Result;
use crate::normalize::{is_stopword, tokenize};
use crate::preferences::USERNAME;
use crate::repair::reprompt_until_valid;
use lazy_static::lazy_static;
use std::collections::HashSet;
use tracing::info;

const NAME_REPROMPT: &str = "Sorry, I couldn't understand. Could you please provide me with your name?";

/// Phrases after which the next word is taken as the name.
const CUES: &[&[&str]] = &[
    &["my", "name", "is"],
    &["name", "is"],
    &["i", "am"],
    &["i", "'m"],
    &["call", "me"],
    &["this", "is"],
    &["it", "'s"],
];

lazy_static! {
    /// Words that look like names by position or case but never are.
    static ref NOT_NAMES: HashSet<&'static str> = [
        "hi", "hello", "hey", "thanks", "thank", "ok", "okay", "yes", "yeah", "sure",
        "please", "fine", "good", "great", "here", "back", "looking", "interested",
        "new", "name", "call", "welcome", "gamebox",
    ]
    .into_iter()
    .collect();
}

/// Extract a personal name from free text.
///
/// A cue phrase ("my name is", "call me", ...) wins; otherwise the last
/// capitalised word that is not a stopword or greeting. A lone word is
/// accepted whatever its case.
pub fn capture_user_name(input: &str) -> Option<String> {
    let tokens = tokenize(input);
    let lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

    for cue in CUES {
        if let Some(pos) = lower
            .windows(cue.len())
            .position(|w| w.iter().zip(cue.iter()).all(|(a, b)| a == b))
        {
            if let Some(candidate) = tokens.get(pos + cue.len()).filter(|t| is_name_like(t)) {
                return Some(capitalize(candidate));
            }
        }
    }

    let words: Vec<&String> = tokens.iter().filter(|t| is_name_like(t)).collect();
    if tokens.len() == 1 && words.len() == 1 {
        return Some(capitalize(words[0]));
    }
    words
        .into_iter()
        .filter(|t| t.chars().next().is_some_and(char::is_uppercase))
        .last()
        .map(|t| t.to_string())
}

/// Ask until a name is captured, store it, and greet the user.
pub fn handle_capture_username(ctx: HandlerContext<'_>, console: &mut dyn Console) -> Result<String> {
    let name = reprompt_until_valid(console, NAME_REPROMPT, |line| Ok(capture_user_name(line)))?;
    ctx.prefs.set(USERNAME, &name)?;
    info!("Captured username: {}", name);
    console.say(&format!(
        "Great! Thanks {}. How may I assist you today?",
        name
    ))?;
    Ok(name)
}

fn is_name_like(token: &str) -> bool {
    let lower = token.to_lowercase();
    token.chars().all(char::is_alphabetic)
        && lower != "i"
        && !is_stopword(&lower)
        && !NOT_NAMES.contains(lower.as_str())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

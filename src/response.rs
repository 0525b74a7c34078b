//! The chatbot's reply to one turn.

use crate::intent::Intent;
use std::fmt;

/// Work to run after the message is shown, exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum FollowUp {
    /// Ask for the user's name until one is captured.
    CaptureName,
    /// Resolve any missing genre/platform, then list games.
    GameSearch {
        genre: Option<String>,
        platform: Option<String>,
    },
    /// Resolve the game from the question's raw tokens and answer it.
    GameFact { tokens: Vec<String>, intent: Intent },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatbotResponse {
    pub message: String,
    pub intent: Option<Intent>,
    pub follow_up: Option<FollowUp>,
}

impl ChatbotResponse {
    pub fn new(message: impl Into<String>, intent: Intent) -> Self {
        Self {
            message: message.into(),
            intent: Some(intent),
            follow_up: None,
        }
    }

    /// A reply for a turn that could not be handled.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            intent: None,
            follow_up: None,
        }
    }

    pub fn with_follow_up(mut self, follow_up: FollowUp) -> Self {
        self.follow_up = Some(follow_up);
        self
    }

    pub fn is_goodbye(&self) -> bool {
        self.intent == Some(Intent::Goodbye)
    }
}

impl fmt::Display for ChatbotResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

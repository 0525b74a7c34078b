//! Gamebox store chatbot.
//!
//! Free text is normalised, matched against CSV corpora with TF-IDF cosine
//! similarity, and routed to intent handlers. Uncertain matches go through
//! confirmation and re-prompt dialogues before anything is committed to the
//! preference store.

pub mod chatbot;
pub mod config;
pub mod console;
pub mod corpus;
pub mod error;
pub mod handlers;
pub mod intent;
pub mod matcher;
pub mod normalize;
pub mod preferences;
pub mod repair;
pub mod response;

#[cfg(test)]
mod testing;

pub use chatbot::Chatbot;
pub use config::{ChatbotConfig, Cli};
pub use error::{ChatbotError, Result};

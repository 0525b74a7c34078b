//! Intent handlers: per-intent orchestration over matcher, repair loops and
//! preferences.

pub mod faq;
pub mod game_fact;
pub mod game_search;
pub mod identity;

use crate::config::ChatbotConfig;
use crate::corpus::CorpusLibrary;
use crate::preferences::PreferenceStore;

/// Shared collaborators handed to every handler.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    pub config: &'a ChatbotConfig,
    pub corpora: &'a CorpusLibrary,
    pub prefs: &'a PreferenceStore,
}

//! Turn handling and the interactive session loop.

use crate::config::ChatbotConfig;
use crate::console::Console;
use crate::corpus::{CorpusKind, CorpusLibrary};
use crate::error::{ChatbotError, Result};
use crate::handlers::{faq, game_fact, game_search, identity, HandlerContext};
use crate::intent::{classify, intent_response, Intent, OUT_OF_SCOPE};
use crate::normalize::{normalize, tokenize};
use crate::preferences::{PreferenceStore, USERNAME};
use crate::response::{ChatbotResponse, FollowUp};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Shown when a turn fails unexpectedly; the session keeps running.
pub const FAILURE_MESSAGE: &str = "Something went wrong! Could you please restart the program?";

const ASK_NAME_AGAIN: &str = "Can you please provide your name again?";

pub struct Chatbot {
    config: ChatbotConfig,
    corpora: CorpusLibrary,
    prefs: PreferenceStore,
    rng: StdRng,
}

impl Chatbot {
    pub fn new(config: ChatbotConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: ChatbotConfig, rng: StdRng) -> Self {
        let corpora = CorpusLibrary::new(&config.data_dir);
        let prefs = PreferenceStore::new(&config.preferences_path);
        Self {
            config,
            corpora,
            prefs,
            rng,
        }
    }

    pub fn config(&self) -> &ChatbotConfig {
        &self.config
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.prefs
    }

    /// Load every corpus once so missing files fail at startup.
    pub fn verify(&self) -> Result<()> {
        self.corpora.verify()
    }

    /// Classify one line of input and build the reply.
    ///
    /// Never fails: any error becomes [`FAILURE_MESSAGE`].
    pub fn respond(&mut self, input: &str) -> ChatbotResponse {
        match self.try_respond(input) {
            Ok(response) if response.message.trim().is_empty() => {
                ChatbotResponse { message: OUT_OF_SCOPE.to_string(), ..response }
            }
            Ok(response) => response,
            Err(e) => {
                warn!("Turn failed for input {:?}: {}", input, e);
                ChatbotResponse::failure(FAILURE_MESSAGE)
            }
        }
    }

    fn try_respond(&mut self, input: &str) -> Result<ChatbotResponse> {
        let tokens = normalize(input);
        debug!("Normalized tokens: {:?}", tokens);

        let intents = self.corpora.get(CorpusKind::Intent)?;
        let intent = classify(&tokens, &intents, self.config.similarity_threshold)?;

        let response = match intent {
            Intent::ChangeName => {
                ChatbotResponse::new(ASK_NAME_AGAIN, intent).with_follow_up(FollowUp::CaptureName)
            }
            Intent::AnnounceName | Intent::General => {
                ChatbotResponse::new(faq::answer(self.context(), &tokens)?, intent)
            }
            _ if intent.is_game_search() => {
                self.prefs.clear_all_except(USERNAME)?;
                let (genre, platform) = game_search::extract_genre_platform(&tokens);
                let message = game_search::search_message(genre.as_deref(), platform.as_deref());
                ChatbotResponse::new(message, intent)
                    .with_follow_up(FollowUp::GameSearch { genre, platform })
            }
            _ if intent.is_game_fact() => {
                // Titles are matched on the unlemmatized words
                let follow_up = FollowUp::GameFact {
                    tokens: tokenize(input),
                    intent: intent.clone(),
                };
                ChatbotResponse::new(game_search::PLEASE_WAIT, intent).with_follow_up(follow_up)
            }
            _ => {
                let responses = self.corpora.get(CorpusKind::IntentResponse)?;
                let reply = intent_response(&intent, &responses, &mut self.rng)?;
                ChatbotResponse::new(self.prefs.substitute(&reply)?, intent)
            }
        };
        Ok(response)
    }

    /// Run a deferred follow-up after its message has been shown.
    pub fn run_follow_up(&mut self, console: &mut dyn Console, follow_up: FollowUp) -> Result<()> {
        debug!("Running follow-up: {:?}", follow_up);
        let ctx = HandlerContext {
            config: &self.config,
            corpora: &self.corpora,
            prefs: &self.prefs,
        };
        match follow_up {
            FollowUp::CaptureName => identity::handle_capture_username(ctx, console).map(|_| ()),
            FollowUp::GameSearch { genre, platform } => {
                game_search::handle_game_search(ctx, console, &mut self.rng, genre, platform)
            }
            FollowUp::GameFact { tokens, intent } => {
                game_fact::handle_game_fact(ctx, console, &tokens, &intent)
            }
        }
    }

    /// Clear preferences, greet, and capture the user's name.
    pub fn greet(&mut self, console: &mut dyn Console) -> Result<()> {
        self.prefs.clear_all()?;
        console.say(&format!(
            "Welcome to {}! My name is {}",
            self.config.store_name, self.config.bot_name
        ))?;
        console.say("May I know your name?")?;
        identity::handle_capture_username(self.context(), console)?;
        Ok(())
    }

    /// Full session: greeting, then turns until goodbye or end of input.
    pub fn run(&mut self, console: &mut dyn Console) -> Result<()> {
        match self.session(console) {
            Err(ChatbotError::InputClosed) => {
                info!("Console input closed, ending session");
                Ok(())
            }
            other => other,
        }
    }

    fn session(&mut self, console: &mut dyn Console) -> Result<()> {
        self.greet(console)?;
        loop {
            let input = console.read_line()?;
            let response = self.respond(&input);
            console.say(&response.message)?;

            if response.is_goodbye() {
                info!("Goodbye received, ending session");
                return Ok(());
            }

            if let Some(follow_up) = response.follow_up {
                match self.run_follow_up(console, follow_up) {
                    Ok(()) => {}
                    Err(ChatbotError::InputClosed) => return Err(ChatbotError::InputClosed),
                    Err(e) => {
                        warn!("Follow-up failed: {}", e);
                        console.say(FAILURE_MESSAGE)?;
                    }
                }
            }
        }
    }

    fn context(&self) -> HandlerContext<'_> {
        HandlerContext {
            config: &self.config,
            corpora: &self.corpora,
            prefs: &self.prefs,
        }
    }
}

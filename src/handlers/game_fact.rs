//! Game facts: resolve a game name, then answer description / genre /
//! platform questions from the catalog.

use super::HandlerContext;
use crate::console::Console;
use crate::corpus::{Corpus, CorpusKind};
use crate::error::Result;
use crate::intent::Intent;
use crate::matcher::{best_match_unthresholded, ResultFields};
use crate::normalize::{is_stopword, tokenize};
use crate::preferences::GAME_IN_CONTEXT;
use crate::repair::{confirm_guess, entity_in_input, resolve_tiered, Resolution, Tier, TieredPrompts};
use tracing::info;

pub const LOOKUP_MISS: &str = "Sorry, I Couldn't find the data which you were looking for";

const UNKNOWN_FACT: &str = "I am sorry, but I am not able to recognize the intent of the statement. Please try rephrasing your request?";
const ASK_GAME: &str = "Could you please tell me the name of the game you are looking for?";
const ASK_GAME_AGAIN: &str = "Ok, could you please tell me the name of the game again?";
const NOT_STOCKED: &str = "I am sorry! We currently don't have the game you're looking for. Could you please specify another game?";
const CONFIRMED: &str = "Thanks for the confirmation. Here are the details you requested for.";

const GAME_PROMPTS: TieredPrompts<'static> = TieredPrompts {
    not_in_catalog: "I'm sorry, we don't have the game which you are looking for? Can you please provide a different game name?",
    not_understood: "I'm sorry, I didn't get that. Could you please provide me the name of the game again?",
    rejected: ASK_GAME_AGAIN,
};

/// Value of `column` for the first game whose name contains `game_name`.
pub fn game_data(catalog: &Corpus, game_name: &str, column: &str) -> String {
    let needle = game_name.to_lowercase();
    catalog
        .column_values("name")
        .ok()
        .and_then(|names| names.iter().position(|n| n.to_lowercase().contains(&needle)))
        .and_then(|row| catalog.cell(row, column))
        .map(str::to_string)
        .unwrap_or_else(|| LOOKUP_MISS.to_string())
}

/// Render the answer for a fact intent.
pub fn render_fact(catalog: &Corpus, game_name: &str, intent: &Intent) -> String {
    match intent {
        Intent::GameFact => format!("({}) {}", game_name, game_data(catalog, game_name, "description")),
        Intent::GameGenreFact => format!(
            "({}) This game belongs to {} genre.",
            game_name,
            game_data(catalog, game_name, "genre")
        ),
        Intent::GamePlatformFact => format!(
            "({}) The game is available on {}.",
            game_name,
            game_data(catalog, game_name, "platform")
        ),
        _ => UNKNOWN_FACT.to_string(),
    }
}

/// Best catalog name for `tokens` and its similarity score, without threshold.
///
/// Stopwords are dropped from both the query and the catalog names, so
/// "The Witness" is keyed on "witness" alone.
pub fn extract_game<S: AsRef<str>>(tokens: &[S], catalog: &Corpus) -> Result<(f64, String)> {
    let query = content_words(tokens.iter().map(AsRef::as_ref));
    let names = catalog.column_values("name")?;
    let keyed = Corpus::new(
        catalog.name(),
        vec!["key".to_string(), "name".to_string()],
        names
            .iter()
            .map(|name| vec![content_words(tokenize(name).iter().map(String::as_str)), name.to_string()])
            .collect(),
    );
    let result = best_match_unthresholded(
        std::slice::from_ref(&query),
        &keyed,
        "key",
        ResultFields::Single("name"),
    )?;
    Ok((result.score, result.value().to_string()))
}

fn content_words<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens
        .filter(|t| !is_stopword(t))
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve the game referred to by `tokens` and answer the fact question.
///
/// A low-confidence match falls back to the game in context; without one,
/// the user is asked for the game name.
pub fn handle_game_fact(
    ctx: HandlerContext<'_>,
    console: &mut dyn Console,
    tokens: &[String],
    intent: &Intent,
) -> Result<()> {
    let catalog = ctx.corpora.get(CorpusKind::Games)?;
    let mut tokens = tokens.to_vec();

    loop {
        let (score, game) = extract_game(&tokens, &catalog)?;
        match ctx.config.tiers.tier(score) {
            Tier::Unresolved => {
                let in_context = ctx.prefs.get(GAME_IN_CONTEXT)?;
                if in_context.is_empty() {
                    return ask_for_game(ctx, console, &catalog, intent);
                }
                if entity_in_input(&tokens) {
                    console.say(NOT_STOCKED)?;
                } else {
                    info!("Answering about game in context: {}", in_context);
                    console.say(&render_fact(&catalog, &in_context, intent))?;
                }
                return Ok(());
            }
            Tier::Confirm => {
                if confirm_guess(console, &game)? {
                    return commit(ctx, console, &catalog, Resolution::Confirmed(game), intent);
                }
                console.say(ASK_GAME_AGAIN)?;
                tokens = tokenize(&console.read_line()?);
            }
            Tier::Accept => {
                return commit(ctx, console, &catalog, Resolution::Accepted(game), intent);
            }
        }
    }
}

fn ask_for_game(
    ctx: HandlerContext<'_>,
    console: &mut dyn Console,
    catalog: &Corpus,
    intent: &Intent,
) -> Result<()> {
    console.say(ASK_GAME)?;
    let resolution = resolve_tiered(console, ctx.config.tiers, GAME_PROMPTS, |tokens| {
        extract_game(tokens, catalog)
    })?;
    commit(ctx, console, catalog, resolution, intent)
}

fn commit(
    ctx: HandlerContext<'_>,
    console: &mut dyn Console,
    catalog: &Corpus,
    resolution: Resolution,
    intent: &Intent,
) -> Result<()> {
    ctx.prefs.set(GAME_IN_CONTEXT, resolution.value())?;
    if matches!(resolution, Resolution::Confirmed(_)) {
        console.say(CONFIRMED)?;
    }
    console.say(&render_fact(catalog, resolution.value(), intent))
}

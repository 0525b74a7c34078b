//! Game search: resolve a genre and a platform, then list matching games.

use super::HandlerContext;
use crate::console::Console;
use crate::corpus::{Corpus, CorpusKind};
use crate::error::Result;
use crate::matcher::{best_match, ResultFields};
use crate::normalize::{is_stopword, tokenize};
use crate::repair::reprompt_until_valid;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

pub const GENRE_MESSAGE: &str = "Certainly! Could you please tell me what genre are you looking for? Currently, we only have Action, Adventure, Puzzle games.";
pub const GENRE_REPROMPT: &str = "Sorry, I couldn't understand. Could you please provide me with the genre? Genre can be either Action, Adventure, Puzzle.";
pub const PLATFORM_MESSAGE: &str = "Could you please tell me what platform are you currently using? Currently, we only have PC, Xbox and PlayStation games.";
pub const PLATFORM_REPROMPT: &str = "Sorry, I couldn't understand. Could you please provide me with the platform? Platform can be either PC, Xbox, PlayStation.";
pub const PLEASE_WAIT: &str = "Please wait...";
pub const NO_RESULTS: &str = "Hmmm, looks like we don't have any games matching your criteria.";

/// Keyword value that disables a filter.
const ANY: &str = "na";
const NOT_FOUND: &str = "not_found";

const AVAILABLE_GENRES: &[&str] = &["adventure", "action", "puzzle"];
const AVAILABLE_PLATFORMS: &[&str] = &["pc", "xbox", "playstation"];
const PLAYSTATION_ALIASES: &[&str] = &["ps", "ps1", "ps2", "ps3", "ps4", "ps5"];

/// Which category a keyword resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Genre,
    Platform,
}

impl Category {
    fn tag(&self) -> &'static str {
        match self {
            Category::Genre => "genre",
            Category::Platform => "platform",
        }
    }
}

/// A resolved row of the keyword corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatch {
    pub value: String,
    pub response: String,
}

/// Opening message given what the user already said.
pub fn search_message(genre: Option<&str>, platform: Option<&str>) -> &'static str {
    match (genre, platform) {
        (Some(_), Some(_)) => PLEASE_WAIT,
        (Some(_), None) => PLATFORM_MESSAGE,
        _ => GENRE_MESSAGE,
    }
}

/// Genres and platforms named directly in the input, comma-joined.
pub fn extract_genre_platform<S: AsRef<str>>(tokens: &[S]) -> (Option<String>, Option<String>) {
    let mut genres: Vec<&str> = Vec::new();
    let mut platforms: Vec<&str> = Vec::new();

    for token in tokens {
        let lower = token.as_ref().to_lowercase();
        if is_stopword(&lower) {
            continue;
        }
        if let Some(genre) = AVAILABLE_GENRES.iter().find(|g| **g == lower) {
            genres.push(*genre);
        }
        if let Some(platform) = AVAILABLE_PLATFORMS.iter().find(|p| **p == lower) {
            platforms.push(*platform);
        } else if PLAYSTATION_ALIASES.contains(&lower.as_str()) {
            platforms.push("playstation");
        }
    }

    let join = |v: Vec<&str>| (!v.is_empty()).then(|| v.join(","));
    (join(genres), join(platforms))
}

/// Match one line of input against the keyword corpus for `category`.
pub fn resolve_keyword(
    line: &str,
    corpus: &Corpus,
    category: Category,
    threshold: f64,
) -> Result<Option<KeywordMatch>> {
    let tokens = tokenize(line);
    let result = best_match(
        &tokens,
        corpus,
        "keyword",
        ResultFields::Many(&["value", "response", "type"]),
        threshold,
    )?;
    let (value, response, kind) = (result.field(0), result.field(1), result.field(2));
    if value == NOT_FOUND || !kind.contains(category.tag()) {
        debug!("No {} in {:?} (got {:?})", category.tag(), line, value);
        return Ok(None);
    }
    Ok(Some(KeywordMatch {
        value: value.to_string(),
        response: response.to_string(),
    }))
}

/// Games whose genre and platform contain every requested keyword.
///
/// More than `limit` matches are sampled uniformly down to `limit`.
pub fn search_games<R: Rng + ?Sized>(
    catalog: &Corpus,
    genre: &str,
    platform: &str,
    limit: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    let name = catalog.column("name")?;
    let short = catalog.column("short_description")?;
    let genre_col = catalog.column("genre")?;
    let platform_col = catalog.column("platform")?;

    let genre_keywords = keywords(genre);
    let platform_keywords = keywords(platform);

    let matching: Vec<&Vec<String>> = catalog
        .rows()
        .iter()
        .filter(|row| row[name] != NOT_FOUND)
        .filter(|row| contains_all(&row[genre_col], &genre_keywords))
        .filter(|row| contains_all(&row[platform_col], &platform_keywords))
        .collect();
    info!(
        "Search genre={} platform={}: {} matches",
        genre,
        platform,
        matching.len()
    );

    let selected: Vec<&Vec<String>> = if matching.len() > limit {
        matching.choose_multiple(rng, limit).copied().collect()
    } else {
        matching
    };

    Ok(selected
        .into_iter()
        .map(|row| format!("({}) {}", row[name], row[short]))
        .collect())
}

/// Resolve whatever is missing, then list the games.
pub fn handle_game_search<R: Rng + ?Sized>(
    ctx: HandlerContext<'_>,
    console: &mut dyn Console,
    rng: &mut R,
    genre: Option<String>,
    platform: Option<String>,
) -> Result<()> {
    let keyword_corpus = ctx.corpora.get(CorpusKind::GameSearch)?;
    let threshold = ctx.config.keyword_threshold;

    let genre = match genre {
        Some(genre) => genre,
        None => {
            let found = reprompt_until_valid(console, GENRE_REPROMPT, |line| {
                resolve_keyword(line, &keyword_corpus, Category::Genre, threshold)
            })?;
            let next = if platform.is_none() { PLATFORM_MESSAGE } else { "" };
            console.say(format!("{}. {}", found.response, next).trim_end())?;
            found.value
        }
    };

    let (platform, platform_response) = match platform {
        Some(platform) => (platform, None),
        None => {
            let found = reprompt_until_valid(console, PLATFORM_REPROMPT, |line| {
                resolve_keyword(line, &keyword_corpus, Category::Platform, threshold)
            })?;
            let response = (found.value != ANY).then_some(found.response);
            (found.value, response)
        }
    };

    let catalog = ctx.corpora.get(CorpusKind::Games)?;
    let games = search_games(
        &catalog,
        &genre,
        &platform,
        ctx.config.max_search_results,
        rng,
    )?;
    list_games(console, &games, platform_response.as_deref())
}

fn list_games(console: &mut dyn Console, games: &[String], platform_response: Option<&str>) -> Result<()> {
    if games.is_empty() {
        return console.say(NO_RESULTS);
    }
    let suffix = platform_response
        .map(|r| format!(" {}", r))
        .unwrap_or_default();
    console.say(&format!("Alright! Here is a list of games{}:", suffix))?;
    for (idx, game) in games.iter().enumerate() {
        console.say(&format!("{}. {}", idx + 1, game))?;
    }
    Ok(())
}

fn keywords(value: &str) -> Vec<String> {
    if value == ANY {
        return Vec::new();
    }
    value
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

fn contains_all(field: &str, keywords: &[String]) -> bool {
    let lower = field.to_lowercase();
    keywords.iter().all(|k| lower.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::normalize::normalize;
    use crate::testing::Fixture;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const ACTION_PC: [&str; 7] = [
        "Street Fighter",
        "Doom Eternal",
        "Halo Infinite",
        "Hades",
        "Hollow Knight",
        "Cuphead",
        "Dead Cells",
    ];

    fn catalog() -> Corpus {
        let fx = Fixture::new();
        let corpus = fx.corpora.get(CorpusKind::Games).unwrap();
        (*corpus).clone()
    }

    fn game_name(entry: &str) -> &str {
        entry
            .strip_prefix('(')
            .and_then(|rest| rest.split_once(')'))
            .map(|(name, _)| name)
            .unwrap()
    }

    #[test]
    fn test_search_samples_five_of_seven() {
        let catalog = catalog();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let results = search_games(&catalog, "action", "pc", 5, &mut rng).unwrap();
            assert_eq!(results.len(), 5);
            let names: HashSet<&str> = results.iter().map(|r| game_name(r)).collect();
            assert_eq!(names.len(), 5);
            assert!(names.iter().all(|n| ACTION_PC.contains(n)));
        }
    }

    #[test]
    fn test_search_returns_all_when_few() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let results = search_games(&catalog, "puzzle", "pc", 5, &mut rng).unwrap();
        assert_eq!(
            results,
            vec![
                "(Tetris) Stack the blocks",
                "(Portal 2) Think with portals",
                "(Monument Valley) Impossible geometry",
            ]
        );
    }

    #[test]
    fn test_search_multi_keyword_and_any() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let both = search_games(&catalog, "action,adventure", "na", 5, &mut rng).unwrap();
        assert_eq!(both, vec!["(Hades) Escape the underworld", "(Hollow Knight) Explore Hallownest"]);

        let none = search_games(&catalog, "puzzle", "xbox,playstation,pc", 5, &mut rng).unwrap();
        assert_eq!(none.len(), 2);
    }

    #[test]
    fn test_extract_genre_platform() {
        assert_eq!(
            extract_genre_platform(&normalize("recommend me some action games for PC")),
            (Some("action".to_string()), Some("pc".to_string()))
        );
        assert_eq!(
            extract_genre_platform(&normalize("any puzzles on ps5?")),
            (Some("puzzle".to_string()), Some("playstation".to_string()))
        );
        assert_eq!(extract_genre_platform(&normalize("recommend a game")), (None, None));
    }

    #[test]
    fn test_search_message() {
        assert_eq!(search_message(Some("action"), Some("pc")), PLEASE_WAIT);
        assert_eq!(search_message(Some("action"), None), PLATFORM_MESSAGE);
        assert_eq!(search_message(None, Some("pc")), GENRE_MESSAGE);
        assert_eq!(search_message(None, None), GENRE_MESSAGE);
    }

    #[test]
    fn test_resolve_keyword_checks_category() {
        let fx = Fixture::new();
        let corpus = fx.corpora.get(CorpusKind::GameSearch).unwrap();
        let genre = resolve_keyword("I like puzzle games", &corpus, Category::Genre, 0.6).unwrap();
        assert_eq!(genre.unwrap().value, "puzzle");
        assert!(resolve_keyword("xbox", &corpus, Category::Genre, 0.6).unwrap().is_none());
        assert!(resolve_keyword("banana", &corpus, Category::Platform, 0.6).unwrap().is_none());
    }

    #[test]
    fn test_dialogue_resolves_genre_then_platform() {
        let fx = Fixture::new();
        let mut console = ScriptedConsole::new(&["dunno", "adventure", "xbox please"]);
        let mut rng = StdRng::seed_from_u64(3);
        handle_game_search(fx.ctx(), &mut console, &mut rng, None, None).unwrap();

        assert_eq!(console.said[0], GENRE_REPROMPT);
        assert_eq!(console.said[1], format!("Adventure it is. {}", PLATFORM_MESSAGE));
        assert_eq!(console.said[2], "Alright! Here is a list of games for Xbox:");
        assert_eq!(
            &console.said[3..],
            &[
                "1. (Portal 2) Think with portals",
                "2. (Hades) Escape the underworld",
                "3. (Hollow Knight) Explore Hallownest",
            ]
        );
    }

    #[test]
    fn test_dialogue_with_preparsed_genre() {
        let fx = Fixture::new();
        let mut console = ScriptedConsole::new(&["any platform"]);
        let mut rng = StdRng::seed_from_u64(3);
        handle_game_search(fx.ctx(), &mut console, &mut rng, Some("puzzle".into()), None).unwrap();

        assert_eq!(console.said[0], "Alright! Here is a list of games:");
        assert_eq!(console.said.len(), 4);
    }

    #[test]
    fn test_dialogue_no_results() {
        let fx = Fixture::new();
        let mut console = ScriptedConsole::new(&[]);
        let mut rng = StdRng::seed_from_u64(3);
        handle_game_search(
            fx.ctx(),
            &mut console,
            &mut rng,
            Some("puzzle".into()),
            Some("ps,xbox".into()),
        )
        .unwrap();
        assert_eq!(console.said, vec![NO_RESULTS]);
    }

    #[test]
    fn test_any_genre_any_platform_on_shipped_data() {
        let fx = Fixture::shipped();
        let mut console = ScriptedConsole::new(&["any", "any"]);
        let mut rng = StdRng::seed_from_u64(5);
        handle_game_search(fx.ctx(), &mut console, &mut rng, None, None).unwrap();

        assert_eq!(console.said[0], format!("Any it is. {}", PLATFORM_MESSAGE));
        assert_eq!(console.said[1], "Alright! Here is a list of games:");
        assert_eq!(console.said.len(), 7);
        assert!(!console.transcript().contains(NOT_FOUND));
    }

    #[test]
    fn test_search_skips_sentinel_row() {
        let catalog = Corpus::new(
            "games.csv",
            ["name", "genre", "platform", "short_description"]
                .map(String::from)
                .to_vec(),
            vec![
                ["not_found", "not_found", "not_found", "not_found"].map(String::from).to_vec(),
                ["Tetris", "Puzzle", "PC", "Stack the blocks"].map(String::from).to_vec(),
            ],
        );
        let mut rng = StdRng::seed_from_u64(1);
        let results = search_games(&catalog, ANY, ANY, 5, &mut rng).unwrap();
        assert_eq!(results, vec!["(Tetris) Stack the blocks"]);
    }
}

//! Text normalization: word tokenization and rule-based lemmatization.
//!
//! Pipeline: raw input -> word tokens (punctuation and clitics split off)
//! -> lemmas. Stopwords are NOT removed here; callers filter them in
//! context with [`is_stopword`].

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};

lazy_static! {
    /// A word (optionally hyphenated, optionally carrying one clitic) or a
    /// single punctuation character.
    static ref RE_TOKEN: Regex = Regex::new(r"\w+(?:-\w+)*(?:['\u{2019}]\w+)?|[^\w\s]").unwrap();

    static ref ENGLISH_STOPWORDS: HashSet<&'static str> = [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
        "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
        "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
        "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
        "who", "whom", "this", "that", "that'll", "these", "those", "am", "is", "are",
        "was", "were", "be", "been", "being", "have", "has", "had", "having", "do",
        "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because",
        "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
        "between", "into", "through", "during", "before", "after", "above", "below",
        "to", "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
        "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
        "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t",
        "can", "will", "just", "don", "don't", "should", "should've", "now", "d", "ll",
        "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't",
        "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't",
        "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't", "mustn",
        "mustn't", "needn", "needn't", "shan", "shan't", "shouldn", "shouldn't",
        "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
    ]
    .into_iter()
    .collect();

    static ref IRREGULAR_LEMMAS: HashMap<&'static str, &'static str> = [
        ("am", "be"), ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"),
        ("been", "be"), ("being", "be"), ("'m", "be"), ("'re", "be"),
        ("has", "have"), ("had", "have"), ("having", "have"), ("'ve", "have"),
        ("does", "do"), ("did", "do"), ("done", "do"), ("doing", "do"),
        ("went", "go"), ("gone", "go"), ("goes", "go"),
        ("got", "get"), ("gotten", "get"),
        ("bought", "buy"), ("found", "find"), ("told", "tell"), ("gave", "give"),
        ("given", "give"), ("made", "make"), ("knew", "know"), ("known", "know"),
        ("thought", "think"), ("said", "say"), ("saw", "see"), ("seen", "see"),
        ("ran", "run"), ("played", "play"),
        ("children", "child"), ("people", "person"), ("men", "man"), ("women", "woman"),
        ("better", "good"), ("best", "good"),
    ]
    .into_iter()
    .collect();

    /// Verbs whose -ing / -ed forms are reduced to the base form.
    static ref KNOWN_VERBS: HashSet<&'static str> = [
        "play", "recommend", "search", "look", "want", "suggest", "like", "love", "need",
        "call", "change", "find", "run", "support", "explain", "describe", "make",
        "give", "tell", "provide", "compare", "explore", "name", "use", "prefer",
        "enjoy", "know", "ask", "help", "show", "list", "browse", "shop", "buy",
        "release", "develop", "publish", "rate", "review", "work", "wonder", "hope",
        "plan", "stop", "get", "shoot", "race", "fight", "build",
    ]
    .into_iter()
    .collect();

    /// Words that end in -s but are not plurals.
    static ref SINGULAR_S: HashSet<&'static str> = [
        "this", "is", "was", "has", "his", "its", "us", "yes", "gas", "bus", "plus",
        "chaos", "news", "series", "species", "always", "perhaps", "thanks", "whereas",
        "xbox", "ps", "os",
    ]
    .into_iter()
    .collect();
}

/// Split free text into word and punctuation tokens.
///
/// Clitics are separated from their host word: `what's` becomes
/// `["what", "'s"]` and `don't` becomes `["do", "n't"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for m in RE_TOKEN.find_iter(text) {
        let word = m.as_str().replace('\u{2019}', "'");
        match word.find('\'') {
            Some(pos) if pos > 0 => {
                let (host, clitic) = word.split_at(pos);
                if clitic.eq_ignore_ascii_case("'t") && host.to_lowercase().ends_with('n') {
                    let split = host.len() - 1;
                    let stem = if host.eq_ignore_ascii_case("can") { host } else { &host[..split] };
                    if !stem.is_empty() {
                        tokens.push(stem.to_string());
                    }
                    tokens.push(format!("n{}", clitic));
                } else {
                    tokens.push(host.to_string());
                    tokens.push(clitic.to_string());
                }
            }
            _ => tokens.push(word),
        }
    }
    tokens
}

/// Tokenize and lemmatize free text into the canonical token sequence.
pub fn normalize(text: &str) -> Vec<String> {
    tokenize(text).iter().map(|t| lemmatize(t)).collect()
}

/// Reduce a single token to its lemma.
///
/// Tokens that no rule applies to are returned with their original casing.
/// Capitalised tokens only go through the irregular table: proper nouns
/// such as "Hades" or "Dead Cells" keep their final "s".
pub fn lemmatize(token: &str) -> String {
    let lower = token.to_lowercase();
    if let Some(lemma) = IRREGULAR_LEMMAS.get(lower.as_str()) {
        return (*lemma).to_string();
    }
    if !lower.chars().all(|c| c.is_ascii_alphabetic())
        || token.chars().next().is_some_and(char::is_uppercase)
    {
        return token.to_string();
    }
    if let Some(verb) = strip_verb_suffix(&lower) {
        return verb;
    }
    if let Some(noun) = singularize(&lower) {
        return noun;
    }
    token.to_string()
}

/// True for words on the English stopword list (case-insensitive).
pub fn is_stopword(word: &str) -> bool {
    ENGLISH_STOPWORDS.contains(word.to_lowercase().as_str())
}

fn strip_verb_suffix(word: &str) -> Option<String> {
    for suffix in ["ing", "ed", "es", "s"] {
        let Some(stem) = word.strip_suffix(suffix) else {
            continue;
        };
        if stem.len() < 2 {
            continue;
        }
        let mut candidates = vec![stem.to_string(), format!("{}e", stem)];
        let bytes = stem.as_bytes();
        if bytes.len() >= 2 && bytes[bytes.len() - 1] == bytes[bytes.len() - 2] {
            candidates.push(stem[..stem.len() - 1].to_string());
        }
        if let Some(base) = stem.strip_suffix('i') {
            candidates.push(format!("{}y", base));
        }
        if let Some(hit) = candidates.into_iter().find(|c| KNOWN_VERBS.contains(c.as_str())) {
            return Some(hit);
        }
    }
    None
}

fn singularize(word: &str) -> Option<String> {
    if word.len() <= 3 || SINGULAR_S.contains(word) || !word.ends_with('s') {
        return None;
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return Some(format!("{}y", stem));
    }
    if word.ends_with("sses") {
        return Some(word[..word.len() - 2].to_string());
    }
    for suffix in ["ches", "shes", "xes", "zes"] {
        if word.ends_with(suffix) {
            return Some(word[..word.len() - 2].to_string());
        }
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return None;
    }
    Some(word[..word.len() - 1].to_string())
}

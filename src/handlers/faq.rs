//! FAQ answers from the question/answer corpus.

use super::HandlerContext;
use crate::corpus::CorpusKind;
use crate::error::Result;
use crate::matcher::{best_match, ResultFields};

/// Closest answer for `tokens`, with placeholders filled from preferences.
pub fn answer<S: AsRef<str>>(ctx: HandlerContext<'_>, tokens: &[S]) -> Result<String> {
    let corpus = ctx.corpora.get(CorpusKind::QuestionAnswer)?;
    let result = best_match(
        tokens,
        &corpus,
        "question",
        ResultFields::Single("answer"),
        ctx.config.similarity_threshold,
    )?;
    ctx.prefs.substitute(result.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::preferences::USERNAME;
    use crate::testing::Fixture;

    #[test]
    fn test_answer_substitutes_live_username() {
        let fx = Fixture::new();
        fx.prefs.set(USERNAME, "Ada").unwrap();
        let tokens = normalize("What is my name?");
        assert_eq!(answer(fx.ctx(), &tokens).unwrap(), "Your name is Ada.");

        fx.prefs.set(USERNAME, "Grace").unwrap();
        assert_eq!(answer(fx.ctx(), &tokens).unwrap(), "Your name is Grace.");
    }

    #[test]
    fn test_unmatched_question_gets_fallback_answer() {
        let fx = Fixture::new();
        let tokens = normalize("How tall is the Eiffel tower?");
        assert_eq!(
            answer(fx.ctx(), &tokens).unwrap(),
            "Sorry, I don't know the answer to that."
        );
    }

    #[test]
    fn test_opening_hours() {
        let fx = Fixture::new();
        let tokens = normalize("What time do you open?");
        assert_eq!(answer(fx.ctx(), &tokens).unwrap(), "We are open from 9am to 9pm.");
    }
}

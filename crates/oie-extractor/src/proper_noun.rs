//! Proper-noun sequence scanner
//!
//! Groups maximal runs of consecutive PROPN tokens. Anything else is a
//! separator and is discarded.

use oie_core::Token;

use crate::builder::join_text;

/// Lazy iterator over proper-noun runs, each yielded as space-joined text
#[derive(Debug, Clone)]
pub struct ProperNounSequences<I> {
    tokens: I,
}

impl<'a, I> Iterator for ProperNounSequences<I>
where
    I: Iterator<Item = &'a Token>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut run: Vec<&'a Token> = Vec::new();

        for token in self.tokens.by_ref() {
            if token.is_propn() {
                run.push(token);
            } else if !run.is_empty() {
                return Some(join_text(run));
            }
        }

        (!run.is_empty()).then(|| join_text(run))
    }
}

/// Scan tokens for proper-noun runs
pub fn proper_noun_sequences<'a, I>(tokens: I) -> ProperNounSequences<I::IntoIter>
where
    I: IntoIterator<Item = &'a Token>,
{
    ProperNounSequences {
        tokens: tokens.into_iter(),
    }
}

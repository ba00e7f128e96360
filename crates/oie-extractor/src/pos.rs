//! POS-pattern triplet extraction
//!
//! A sliding window over part-of-speech tags: a proper-noun run, a span
//! of other tokens, and a second proper-noun run form a candidate. The
//! candidate is emitted when the span holds a verb; the second run then
//! becomes the subject of the next candidate, so a chain of proper-noun
//! islands yields one triplet per adjacent pair.

use oie_core::{Token, TokenStream, Triplet};

use crate::builder::{build_triplet, contains_verb};
use crate::TripletExtractor;

// ============================================================================
// Scanner state machine
// ============================================================================

/// Three-slot scan state, advanced one token at a time
#[derive(Debug, Clone, Default)]
pub struct PosScanner<'a> {
    first: Vec<&'a Token>,
    intermediate: Vec<&'a Token>,
    last: Vec<&'a Token>,
}

impl<'a> PosScanner<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one token, emitting at most one triplet
    pub fn step(&mut self, token: &'a Token) -> Option<Triplet> {
        // Sentence boundary before the object run started
        if token.is_punct() && self.last.is_empty() {
            self.reset();
            return None;
        }

        if token.is_propn() {
            if self.intermediate.is_empty() {
                self.first.push(token);
            } else {
                self.last.push(token);
            }
            return None;
        }

        if !self.first.is_empty() && !self.last.is_empty() {
            let emitted = self.complete();

            if token.is_punct() {
                self.reset();
            } else {
                self.first = std::mem::take(&mut self.last);
                self.intermediate.clear();
                self.intermediate.push(token);
            }

            return emitted;
        }

        if !self.first.is_empty() {
            self.intermediate.push(token);
        }

        None
    }

    /// Flush a candidate still open at end of stream
    pub fn finish(self) -> Option<Triplet> {
        if self.first.is_empty() || self.last.is_empty() {
            return None;
        }
        self.complete()
    }

    /// Subject-side proper-noun run
    pub fn first(&self) -> &[&'a Token] {
        &self.first
    }

    /// Relation candidate span
    pub fn intermediate(&self) -> &[&'a Token] {
        &self.intermediate
    }

    /// Object-side proper-noun run
    pub fn last(&self) -> &[&'a Token] {
        &self.last
    }

    /// True when no slot holds a token
    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.intermediate.is_empty() && self.last.is_empty()
    }

    fn complete(&self) -> Option<Triplet> {
        contains_verb(&self.intermediate)
            .then(|| build_triplet(&self.first, &self.intermediate, &self.last))
    }

    fn reset(&mut self) {
        self.first.clear();
        self.intermediate.clear();
        self.last.clear();
    }
}

// ============================================================================
// Extractor
// ============================================================================

/// POS-pattern triplet extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct PosPatternExtractor;

impl PosPatternExtractor {
    /// Run the scanner over any token sequence
    pub fn extract_from<'a, I>(&self, tokens: I) -> Vec<Triplet>
    where
        I: IntoIterator<Item = &'a Token>,
    {
        let mut scanner = PosScanner::new();
        let mut triplets: Vec<Triplet> = tokens
            .into_iter()
            .filter_map(|token| scanner.step(token))
            .collect();

        triplets.extend(scanner.finish());
        triplets
    }
}

impl TripletExtractor for PosPatternExtractor {
    fn extract(&self, tokens: &TokenStream) -> Vec<Triplet> {
        self.extract_from(tokens)
    }

    fn name(&self) -> &'static str {
        "pos"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use oie_core::Pos;

    fn tagged(tokens: &[(&str, Pos)]) -> TokenStream {
        tokens
            .iter()
            .fold(TokenStream::builder(), |b, (text, pos)| b.tagged(*text, *pos))
            .build()
    }

    fn texts(tokens: &[&Token]) -> Vec<String> {
        tokens.iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn test_basic_triplet() {
        let stream = tagged(&[
            ("Brad", Pos::Propn),
            ("Pitt", Pos::Propn),
            ("married", Pos::Verb),
            ("Angelina", Pos::Propn),
            ("Jolie", Pos::Propn),
        ]);

        assert_eq!(
            PosPatternExtractor.extract(&stream),
            vec![Triplet::new("Brad Pitt", "married", "Angelina Jolie")]
        );
    }

    #[test]
    fn test_verb_gate() {
        let stream = tagged(&[
            ("Brad", Pos::Propn),
            ("Pitt", Pos::Propn),
            ("the", Pos::Det),
            ("Angelina", Pos::Propn),
            ("Jolie", Pos::Propn),
        ]);
        assert!(PosPatternExtractor.extract(&stream).is_empty());
    }

    #[test]
    fn test_adposition_alone_does_not_qualify() {
        let stream = tagged(&[
            ("Paris", Pos::Propn),
            ("in", Pos::Adp),
            ("France", Pos::Propn),
        ]);
        assert!(PosPatternExtractor.extract(&stream).is_empty());
    }

    #[test]
    fn test_chained_islands() {
        let stream = tagged(&[
            ("A", Pos::Propn),
            ("B", Pos::Propn),
            ("verb", Pos::Verb),
            ("C", Pos::Propn),
            ("D", Pos::Propn),
            ("verb2", Pos::Verb),
            ("E", Pos::Propn),
            ("F", Pos::Propn),
        ]);

        assert_eq!(
            PosPatternExtractor.extract(&stream),
            vec![
                Triplet::new("A B", "verb", "C D"),
                Triplet::new("C D", "verb2", "E F"),
            ]
        );
    }

    #[test]
    fn test_punctuation_resets_open_candidate() {
        // "Obama visited. Merkel" must not pair across the period
        let stream = tagged(&[
            ("Obama", Pos::Propn),
            ("visited", Pos::Verb),
            (".", Pos::Punct),
            ("Merkel", Pos::Propn),
            ("met", Pos::Verb),
            ("Macron", Pos::Propn),
        ]);

        assert_eq!(
            PosPatternExtractor.extract(&stream),
            vec![Triplet::new("Merkel", "met", "Macron")]
        );
    }

    #[test]
    fn test_punctuation_after_object_closes_sentence() {
        let stream = tagged(&[
            ("Trump", Pos::Propn),
            ("defeated", Pos::Verb),
            ("Clinton", Pos::Propn),
            (".", Pos::Punct),
            ("won", Pos::Verb),
            ("Ohio", Pos::Propn),
        ]);

        assert_eq!(
            PosPatternExtractor.extract(&stream),
            vec![Triplet::new("Trump", "defeated", "Clinton")]
        );
    }

    #[test]
    fn test_relation_text_filters_span() {
        let stream = tagged(&[
            ("Neil", Pos::Propn),
            ("Gorsuch", Pos::Propn),
            ("was", Pos::Aux),
            ("appointed", Pos::Verb),
            ("to", Pos::Adp),
            ("the", Pos::Det),
            ("Supreme", Pos::Propn),
            ("Court", Pos::Propn),
            (".", Pos::Punct),
        ]);

        assert_eq!(
            PosPatternExtractor.extract(&stream),
            vec![Triplet::new("Neil Gorsuch", "appointed to", "Supreme Court")]
        );
    }

    #[test]
    fn test_shift_keeps_trigger_token_in_span() {
        // The token that closes a candidate opens the next span
        let stream = tagged(&[
            ("Rowling", Pos::Propn),
            ("met", Pos::Verb),
            ("Arantes", Pos::Propn),
            ("married", Pos::Verb),
            ("Murray", Pos::Propn),
        ]);

        assert_eq!(
            PosPatternExtractor.extract(&stream),
            vec![
                Triplet::new("Rowling", "met", "Arantes"),
                Triplet::new("Arantes", "married", "Murray"),
            ]
        );
    }

    #[test]
    fn test_leading_tokens_ignored() {
        let stream = tagged(&[
            ("In", Pos::Adp),
            ("1990", Pos::Num),
            ("Rowling", Pos::Propn),
            ("moved", Pos::Verb),
            ("to", Pos::Adp),
            ("Porto", Pos::Propn),
        ]);

        assert_eq!(
            PosPatternExtractor.extract(&stream),
            vec![Triplet::new("Rowling", "moved to", "Porto")]
        );
    }

    #[test]
    fn test_scanner_transitions() {
        let stream = tagged(&[
            ("Brad", Pos::Propn),
            ("married", Pos::Verb),
            ("Angelina", Pos::Propn),
            ("in", Pos::Adp),
            (",", Pos::Punct),
        ]);
        let tokens: Vec<&Token> = stream.iter().collect();
        let mut scanner = PosScanner::new();

        assert_eq!(scanner.step(tokens[0]), None);
        assert_eq!(texts(scanner.first()), vec!["Brad"]);

        assert_eq!(scanner.step(tokens[1]), None);
        assert_eq!(texts(scanner.intermediate()), vec!["married"]);

        assert_eq!(scanner.step(tokens[2]), None);
        assert_eq!(texts(scanner.last()), vec!["Angelina"]);

        let emitted = scanner.step(tokens[3]);
        assert_eq!(emitted, Some(Triplet::new("Brad", "married", "Angelina")));
        assert_eq!(texts(scanner.first()), vec!["Angelina"]);
        assert_eq!(texts(scanner.intermediate()), vec!["in"]);
        assert!(scanner.last().is_empty());

        assert_eq!(scanner.step(tokens[4]), None);
        assert!(scanner.is_empty());
        assert_eq!(scanner.finish(), None);
    }

    #[test]
    fn test_finish_flushes_open_candidate() {
        let stream = tagged(&[
            ("Ginsburg", Pos::Propn),
            ("joined", Pos::Verb),
            ("Columbia", Pos::Propn),
        ]);
        let mut scanner = PosScanner::new();
        for token in stream.iter() {
            assert_eq!(scanner.step(token), None);
        }
        assert_eq!(
            scanner.finish(),
            Some(Triplet::new("Ginsburg", "joined", "Columbia"))
        );
    }

    #[test]
    fn test_empty_stream() {
        assert!(PosPatternExtractor.extract(&TokenStream::new()).is_empty());
    }
}

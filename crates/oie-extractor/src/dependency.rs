//! Dependency-pattern triplet extraction
//!
//! Proper-noun heads (PROPN tokens that are not compound modifiers) are
//! expanded into their noun phrase and every ordered pair of distinct
//! heads is matched against two patterns:
//!
//! - Shared verb: `nsubj` and `dobj` attached to the same head
//! - Prepositional: `nsubj` on a verb, `pobj` under a `prep` on that verb
//!
//! The pairwise scan is quadratic in the number of heads. Triplets are
//! emitted in pair order and never deduplicated.

use oie_core::{dep, Token, TokenStream, Triplet};

use crate::builder::join_text;
use crate::TripletExtractor;

/// Which dependency pattern matched a head pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyPattern {
    /// `h1 -nsubj-> V <-dobj- h2`
    SharedVerb,
    /// `h1 -nsubj-> V <-prep- P <-pobj- h2`
    Prepositional,
}

/// Tokens tagged PROPN whose label is not `compound`, in stream order
pub fn proper_noun_heads(stream: &TokenStream) -> Vec<&Token> {
    stream
        .iter()
        .filter(|t| t.is_propn() && !t.has_dep(dep::COMPOUND))
        .collect()
}

/// Compound children of a head (in child order) followed by the head.
///
/// The head always comes last, even when a compound child sits to
/// its right in the sentence.
pub fn expanded_phrase(stream: &TokenStream, head: &Token) -> String {
    let compounds = stream
        .children_of(head)
        .filter(|child| child.has_dep(dep::COMPOUND));
    join_text(compounds.chain(std::iter::once(head)))
}

/// Match an ordered head pair, returning the pattern and relation text
pub fn match_pair(
    stream: &TokenStream,
    h1: &Token,
    h2: &Token,
) -> Option<(DependencyPattern, String)> {
    if !h1.has_dep(dep::NSUBJ) {
        return None;
    }
    let verb = stream.head_of(h1)?;

    if h2.has_dep(dep::DOBJ) {
        if h2.head == Some(verb.index) {
            return Some((DependencyPattern::SharedVerb, verb.text.clone()));
        }
        return None;
    }

    if h2.has_dep(dep::POBJ) {
        let prep = stream.head_of(h2)?;
        if prep.has_dep(dep::PREP) && prep.head == Some(verb.index) {
            return Some((
                DependencyPattern::Prepositional,
                format!("{} {}", verb.text, prep.text),
            ));
        }
    }

    None
}

/// Dependency-pattern triplet extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyPatternExtractor;

impl DependencyPatternExtractor {
    /// Extract triplets together with the pattern that produced each
    pub fn extract_with_patterns(&self, stream: &TokenStream) -> Vec<(DependencyPattern, Triplet)> {
        let heads = proper_noun_heads(stream);
        let phrases: Vec<String> = heads
            .iter()
            .map(|head| expanded_phrase(stream, head))
            .collect();

        let mut triplets = Vec::new();
        for (i, h1) in heads.iter().enumerate() {
            for (j, h2) in heads.iter().enumerate() {
                if i == j {
                    continue;
                }
                if let Some((pattern, relation)) = match_pair(stream, h1, h2) {
                    triplets.push((pattern, Triplet::new(&phrases[i], relation, &phrases[j])));
                }
            }
        }

        triplets
    }
}

impl TripletExtractor for DependencyPatternExtractor {
    fn extract(&self, tokens: &TokenStream) -> Vec<Triplet> {
        self.extract_with_patterns(tokens)
            .into_iter()
            .map(|(_, triplet)| triplet)
            .collect()
    }

    fn name(&self) -> &'static str {
        "dependency"
    }
}

// ============================================================================
// Tests
// ============================================================================

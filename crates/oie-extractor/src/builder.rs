//! Triplet assembly shared by the extractors

use oie_core::{Token, Triplet};

/// Build a (Subject, Relation, Object) triplet from token groups.
///
/// Only VERB and ADP tokens of the relation group make it into the
/// relation text; everything else in that group is dropped.
pub fn build_triplet(subject: &[&Token], relation: &[&Token], object: &[&Token]) -> Triplet {
    let relation = relation.iter().copied().filter(|t| t.pos.is_relational());
    Triplet::new(
        join_text(subject.iter().copied()),
        join_text(relation),
        join_text(object.iter().copied()),
    )
}

/// True if any token is tagged VERB
pub fn contains_verb(tokens: &[&Token]) -> bool {
    tokens.iter().any(|t| t.is_verb())
}

/// Space-join token texts
pub(crate) fn join_text<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> String {
    tokens
        .into_iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

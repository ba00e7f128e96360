//! Triplet record

use serde::{Deserialize, Serialize};

/// A (Subject, Relation, Object) fact candidate, as surface strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triplet {
    pub subject: String,
    pub relation: String,
    pub object: String,
}

impl Triplet {
    /// Create a new triplet
    pub fn new(
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            relation: relation.into(),
            object: object.into(),
        }
    }

    /// Borrow as a tuple
    pub fn as_tuple(&self) -> (&str, &str, &str) {
        (&self.subject, &self.relation, &self.object)
    }
}

impl std::fmt::Display for Triplet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:?}, {:?}, {:?})",
            self.subject, self.relation, self.object
        )
    }
}

impl From<(&str, &str, &str)> for Triplet {
    fn from((subject, relation, object): (&str, &str, &str)) -> Self {
        Self::new(subject, relation, object)
    }
}

//! Annotated token stream
//!
//! Tokens are owned by a [`TokenStream`] arena and refer to each other
//! by index. Head and children links are therefore stable integers that
//! can be used directly as array keys.

use serde::{Deserialize, Serialize};

// ============================================================================
// Part-of-speech tags
// ============================================================================

/// Coarse part-of-speech tag (Universal Dependencies UPOS)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Pos {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    /// Other, unknown or missing tag
    X,
}

impl Pos {
    /// Parse a UPOS tag. Unknown or empty tags map to [`Pos::X`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "ADJ" => Self::Adj,
            "ADP" => Self::Adp,
            "ADV" => Self::Adv,
            "AUX" => Self::Aux,
            "CCONJ" | "CONJ" => Self::Cconj,
            "DET" => Self::Det,
            "INTJ" => Self::Intj,
            "NOUN" => Self::Noun,
            "NUM" => Self::Num,
            "PART" => Self::Part,
            "PRON" => Self::Pron,
            "PROPN" => Self::Propn,
            "PUNCT" => Self::Punct,
            "SCONJ" => Self::Sconj,
            "SYM" => Self::Sym,
            "VERB" => Self::Verb,
            _ => Self::X,
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adj => "ADJ",
            Self::Adp => "ADP",
            Self::Adv => "ADV",
            Self::Aux => "AUX",
            Self::Cconj => "CCONJ",
            Self::Det => "DET",
            Self::Intj => "INTJ",
            Self::Noun => "NOUN",
            Self::Num => "NUM",
            Self::Part => "PART",
            Self::Pron => "PRON",
            Self::Propn => "PROPN",
            Self::Punct => "PUNCT",
            Self::Sconj => "SCONJ",
            Self::Sym => "SYM",
            Self::Verb => "VERB",
            Self::X => "X",
        }
    }

    /// True for tags allowed in relation text (VERB or ADP)
    pub fn is_relational(&self) -> bool {
        matches!(self, Self::Verb | Self::Adp)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Pos {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

impl From<String> for Pos {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<Pos> for String {
    fn from(pos: Pos) -> Self {
        pos.as_str().to_string()
    }
}

// ============================================================================
// Dependency labels
// ============================================================================

/// Dependency labels the extractors match on (ClearNLP / spaCy English)
pub mod dep {
    pub const COMPOUND: &str = "compound";
    pub const NSUBJ: &str = "nsubj";
    pub const DOBJ: &str = "dobj";
    pub const PREP: &str = "prep";
    pub const POBJ: &str = "pobj";
    pub const ROOT: &str = "ROOT";
}

// ============================================================================
// Token
// ============================================================================

/// A single annotated token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Position in the stream
    pub index: usize,

    /// Surface text
    pub text: String,

    /// Coarse part-of-speech tag
    pub pos: Pos,

    /// Dependency label relative to the head (empty when missing)
    pub dep: String,

    /// Index of the syntactic head. Roots point at themselves,
    /// `None` marks an annotation gap.
    pub head: Option<usize>,

    /// Direct dependents, in stream order
    pub children: Vec<usize>,
}

impl Token {
    pub fn is_propn(&self) -> bool {
        self.pos == Pos::Propn
    }

    pub fn is_verb(&self) -> bool {
        self.pos == Pos::Verb
    }

    pub fn is_punct(&self) -> bool {
        self.pos == Pos::Punct
    }

    /// Check the dependency label. Tokens without a label match nothing,
    /// not even `""`.
    pub fn has_dep(&self, label: &str) -> bool {
        !self.dep.is_empty() && self.dep == label
    }

    /// True if this token is its own head
    pub fn is_root(&self) -> bool {
        self.head == Some(self.index)
    }
}

// ============================================================================
// Token Stream
// ============================================================================

/// Ordered, immutable sequence of tokens
///
/// Deserialized streams are rebuilt through [`TokenStreamBuilder`], so
/// stored `index` and `children` values are recomputed from position and
/// heads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTokenStream")]
pub struct TokenStream {
    tokens: Vec<Token>,
}

/// Wire shape of a stream before normalization
#[derive(Deserialize)]
struct RawTokenStream {
    tokens: Vec<Token>,
}

impl From<RawTokenStream> for TokenStream {
    fn from(raw: RawTokenStream) -> Self {
        let mut builder = TokenStream::builder();
        for token in raw.tokens {
            builder.push(token.text, token.pos, token.dep, token.head);
        }
        builder.build()
    }
}

impl TokenStream {
    /// Create an empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a stream
    pub fn builder() -> TokenStreamBuilder {
        TokenStreamBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Resolve the head of a token
    pub fn head_of(&self, token: &Token) -> Option<&Token> {
        token.head.and_then(|h| self.tokens.get(h))
    }

    /// Resolve the direct dependents of a token
    pub fn children_of<'a>(&'a self, token: &'a Token) -> impl Iterator<Item = &'a Token> + 'a {
        token.children.iter().filter_map(|&c| self.tokens.get(c))
    }

    /// Space-joined surface text
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Builder for [`TokenStream`]
///
/// Heads may point forward; they are resolved in [`build`](Self::build),
/// which also derives every token's children. Head indices outside the
/// stream are dropped to `None`.
#[derive(Debug, Default)]
pub struct TokenStreamBuilder {
    tokens: Vec<Token>,
}

impl TokenStreamBuilder {
    /// Append a token, returning its index
    pub fn push(
        &mut self,
        text: impl Into<String>,
        pos: Pos,
        dep: impl Into<String>,
        head: Option<usize>,
    ) -> usize {
        let index = self.tokens.len();
        self.tokens.push(Token {
            index,
            text: text.into(),
            pos,
            dep: dep.into(),
            head,
            children: Vec::new(),
        });
        index
    }

    /// Chainable form of [`push`](Self::push)
    pub fn token(
        mut self,
        text: impl Into<String>,
        pos: Pos,
        dep: impl Into<String>,
        head: Option<usize>,
    ) -> Self {
        self.push(text, pos, dep, head);
        self
    }

    /// Append a token without dependency information
    pub fn tagged(self, text: impl Into<String>, pos: Pos) -> Self {
        self.token(text, pos, "", None)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Finalize the stream
    pub fn build(mut self) -> TokenStream {
        let len = self.tokens.len();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); len];

        for token in &mut self.tokens {
            if matches!(token.head, Some(h) if h >= len) {
                token.head = None;
            }
            if let Some(h) = token.head {
                if h != token.index {
                    children[h].push(token.index);
                }
            }
        }

        for (token, kids) in self.tokens.iter_mut().zip(children) {
            token.children = kids;
        }

        TokenStream {
            tokens: self.tokens,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_from_tag() {
        assert_eq!(Pos::from_tag("PROPN"), Pos::Propn);
        assert_eq!(Pos::from_tag("verb"), Pos::Verb);
        assert_eq!(Pos::from_tag(""), Pos::X);
        assert_eq!(Pos::from_tag("NNP"), Pos::X);
        assert!(Pos::Adp.is_relational());
        assert!(!Pos::Det.is_relational());
    }

    #[test]
    fn test_pos_serde() {
        let json = serde_json::to_string(&Pos::Propn).unwrap();
        assert_eq!(json, "\"PROPN\"");
        let pos: Pos = serde_json::from_str("\"garbage\"").unwrap();
        assert_eq!(pos, Pos::X);
    }

    #[test]
    fn test_builder_derives_children() {
        // Brad Pitt married Angelina Jolie
        let stream = TokenStream::builder()
            .token("Brad", Pos::Propn, dep::COMPOUND, Some(1))
            .token("Pitt", Pos::Propn, dep::NSUBJ, Some(2))
            .token("married", Pos::Verb, dep::ROOT, Some(2))
            .token("Angelina", Pos::Propn, dep::COMPOUND, Some(4))
            .token("Jolie", Pos::Propn, dep::DOBJ, Some(2))
            .build();

        let married = stream.get(2).unwrap();
        assert!(married.is_root());
        assert_eq!(married.children, vec![1, 4]);
        assert_eq!(stream.get(1).unwrap().children, vec![0]);

        let pitt = stream.get(1).unwrap();
        assert_eq!(stream.head_of(pitt).map(|t| t.text.as_str()), Some("married"));
    }

    #[test]
    fn test_builder_drops_out_of_range_head() {
        let stream = TokenStream::builder()
            .token("Paris", Pos::Propn, dep::NSUBJ, Some(7))
            .build();
        let paris = stream.get(0).unwrap();
        assert_eq!(paris.head, None);
        assert!(stream.head_of(paris).is_none());
    }

    #[test]
    fn test_has_dep_ignores_empty_label() {
        let stream = TokenStream::builder().tagged("Paris", Pos::Propn).build();
        assert!(!stream.get(0).unwrap().has_dep(""));
    }

    #[test]
    fn test_has_dep_matches_label() {
        let stream = TokenStream::builder()
            .token("Pitt", Pos::Propn, dep::NSUBJ, Some(1))
            .token("married", Pos::Verb, dep::ROOT, Some(1))
            .build();
        let pitt = stream.get(0).unwrap();
        assert!(pitt.has_dep(dep::NSUBJ));
        assert!(!pitt.has_dep(dep::DOBJ));
        assert!(!pitt.has_dep(""));
    }

    #[test]
    fn test_deserialize_normalizes_stream() {
        let json = r#"{"tokens": [
            {"index": 3, "text": "Pitt", "pos": "PROPN", "dep": "nsubj", "head": 1, "children": [9]},
            {"index": 3, "text": "married", "pos": "VERB", "dep": "ROOT", "head": 1, "children": []},
            {"index": 7, "text": "Jolie", "pos": "PROPN", "dep": "dobj", "head": 42, "children": [0, 1]}
        ]}"#;
        let stream: TokenStream = serde_json::from_str(json).unwrap();

        let indices: Vec<usize> = stream.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(stream.get(0).unwrap().children, Vec::<usize>::new());
        assert_eq!(stream.get(1).unwrap().children, vec![0]);
        assert!(stream.get(1).unwrap().is_root());

        let jolie = stream.get(2).unwrap();
        assert_eq!(jolie.head, None);
        assert!(jolie.children.is_empty());
    }

    #[test]
    fn test_serde_keeps_built_stream() {
        let stream = TokenStream::builder()
            .token("Pitt", Pos::Propn, dep::NSUBJ, Some(1))
            .token("married", Pos::Verb, dep::ROOT, Some(1))
            .build();
        let json = serde_json::to_string(&stream).unwrap();
        let back: TokenStream = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stream);
    }
}

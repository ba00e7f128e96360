//! JSON token reader
//!
//! Accepts `{"text": ..., "tokens": [...]}` where each token carries
//! `pos`, `dep` and an absolute `head` index. Token text is taken from
//! `text` when present, otherwise sliced from the document text using
//! `start`/`end` byte offsets (the spaCy `Doc.to_json()` layout).

use serde::Deserialize;

use oie_core::{Pos, TokenStream};

use crate::{AnnotationParser, FileType, ParserError, Result};

/// JSON parser
pub struct JsonParser;

#[derive(Debug, Deserialize)]
struct JsonDocument {
    #[serde(default)]
    text: Option<String>,
    tokens: Vec<JsonToken>,
}

#[derive(Debug, Deserialize)]
struct JsonToken {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    start: Option<usize>,
    #[serde(default)]
    end: Option<usize>,
    #[serde(default)]
    pos: String,
    #[serde(default)]
    dep: String,
    #[serde(default)]
    head: Option<usize>,
}

impl JsonParser {
    /// Parse an already-decoded JSON value
    pub fn parse_value(&self, value: serde_json::Value) -> Result<TokenStream> {
        let doc: JsonDocument =
            serde_json::from_value(value).map_err(|e| ParserError::Json(e.to_string()))?;
        build_stream(doc)
    }
}

impl AnnotationParser for JsonParser {
    fn parse_str(&self, content: &str) -> Result<TokenStream> {
        let doc: JsonDocument =
            serde_json::from_str(content).map_err(|e| ParserError::Json(e.to_string()))?;
        build_stream(doc)
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::Json]
    }
}

fn build_stream(doc: JsonDocument) -> Result<TokenStream> {
    let mut builder = TokenStream::builder();

    for (i, token) in doc.tokens.into_iter().enumerate() {
        let text = match token.text {
            Some(text) => text,
            None => token_slice(doc.text.as_deref(), token.start, token.end).ok_or_else(|| {
                ParserError::Json(format!("token {i} has neither text nor a valid span"))
            })?,
        };
        builder.push(text, Pos::from_tag(&token.pos), token.dep, token.head);
    }

    Ok(builder.build())
}

fn token_slice(text: Option<&str>, start: Option<usize>, end: Option<usize>) -> Option<String> {
    let (text, start, end) = (text?, start?, end?);
    text.get(start..end).map(str::to_string)
}

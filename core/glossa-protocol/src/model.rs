use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::ProtocolError;
use crate::ids::{EntityRef, Lang, TermRef, TranslationRef};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Half-open character offset range `[start, end)` into the analyzed text.
///
/// Serialized as a two-element array, the shape the browser consumer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(from = "[usize; 2]", into = "[usize; 2]"))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl From<[usize; 2]> for Span {
    fn from([start, end]: [usize; 2]) -> Self {
        Self { start, end }
    }
}

impl From<Span> for [usize; 2] {
    fn from(span: Span) -> Self {
        [span.start, span.end]
    }
}

/// One token of analyzed text, as produced by the tokenizer/lemmatizer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct TextToken {
    pub lemma: String,
    #[cfg_attr(feature = "serde", serde(rename = "pos"))]
    pub span: Span,
}

impl TextToken {
    pub fn new(lemma: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            lemma: lemma.into(),
            span: Span::new(start, end),
        }
    }
}

/// A glossary entity projected for matching: its reference, language and
/// every accepted lemma sequence (e.g. singular and plural renderings).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct IndexedEntry<R> {
    #[cfg_attr(feature = "serde", serde(rename = "ref"))]
    pub reference: R,
    pub lang: Lang,
    pub lemmas: Vec<Vec<String>>,
}

pub type TermIndex = IndexedEntry<TermRef>;
pub type TranslationIndex = IndexedEntry<TranslationRef>;

impl<R: EntityRef> IndexedEntry<R> {
    pub fn new(reference: R, lang: Lang, lemmas: Vec<Vec<String>>) -> Self {
        Self { reference, lang, lemmas }
    }

    /// Checks the published-entry invariants: at least one variant, and no
    /// variant of length zero.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.lemmas.is_empty() {
            return Err(ProtocolError::NoVariants {
                entry: self.reference.to_string(),
            });
        }
        if let Some(variant) = self.lemmas.iter().position(|v| v.is_empty()) {
            return Err(ProtocolError::EmptyVariant {
                entry: self.reference.to_string(),
                variant,
            });
        }
        Ok(())
    }
}

/// One lemma-sequence variant aligned against the text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Match<R> {
    pub pos: Span,
    #[cfg_attr(feature = "serde", serde(rename = "ref"))]
    pub reference: R,
}

impl<R> Match<R> {
    pub fn new(pos: Span, reference: R) -> Self {
        Self { pos, reference }
    }
}

/// The unit of display: overlapping term and translation matches collapsed
/// into one highlighted span.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MatchGroup {
    pub pos: Span,
    pub term_matches: Vec<Match<TermRef>>,
    pub translation_matches: Vec<Match<TranslationRef>>,
}

impl MatchGroup {
    pub fn match_count(&self) -> usize {
        self.term_matches.len() + self.translation_matches.len()
    }
}

/// Checks that a token stream is well formed: non-empty spans, left to right,
/// no overlaps. Gaps are allowed.
pub fn validate_tokens(tokens: &[TextToken]) -> Result<(), ProtocolError> {
    let mut prev_end = 0;
    for (index, token) in tokens.iter().enumerate() {
        if token.span.is_empty() {
            return Err(ProtocolError::InvalidSpan { index, span: token.span });
        }
        if index > 0 && token.span.start < prev_end {
            return Err(ProtocolError::UnorderedTokens { index });
        }
        prev_end = token.span.end;
    }
    Ok(())
}

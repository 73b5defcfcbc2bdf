pub mod lemma_table;
pub mod parser;

use glossa_protocol::{Lang, TextToken};
use thiserror::Error;

use crate::parser::{parse_with_spans, RawToken};

pub use lemma_table::LemmaTable;

#[derive(Debug, Error)]
pub enum LexError {
    #[error("invalid lemma table: {0}")]
    InvalidLemmaTable(#[from] serde_json::Error),

    #[error("failed to read lemma table: {0}")]
    Io(#[from] std::io::Error),
}

/// The tokenizer/lemmatizer seam.
///
/// Implementations must tokenize exactly the text they are given. Tokens may
/// be omitted (punctuation, stop words) but offsets always refer to the
/// original text.
pub trait Analyzer {
    fn analyze(&self, text: &str, lang: &Lang) -> Result<Vec<TextToken>, LexError>;
}

/// Surface-form analyzer: lemma = lemma-table entry for the lowercased word,
/// or the lowercased word itself. Punctuation is dropped.
#[derive(Debug, Clone, Default)]
pub struct SurfaceAnalyzer {
    table: LemmaTable,
}

impl SurfaceAnalyzer {
    pub fn new(table: LemmaTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &LemmaTable {
        &self.table
    }

    fn lemma_for(&self, lang: &Lang, surface: &str) -> String {
        let lowered = surface.to_lowercase();
        match self.table.lookup(lang, &lowered) {
            Some(lemma) => lemma.to_string(),
            None => lowered,
        }
    }
}

impl Analyzer for SurfaceAnalyzer {
    fn analyze(&self, text: &str, lang: &Lang) -> Result<Vec<TextToken>, LexError> {
        let tokens: Vec<TextToken> = parse_with_spans(text)
            .into_iter()
            .filter_map(|(span, raw)| match raw {
                RawToken::Word(surface) => Some(TextToken {
                    lemma: self.lemma_for(lang, surface),
                    span,
                }),
                RawToken::Punct(_) => None,
            })
            .collect();

        tracing::trace!(lang = %lang, tokens = tokens.len(), "analyzed text");
        Ok(tokens)
    }
}

/// Derives one lemma-sequence variant for a glossary entry's surface text.
pub fn lemmatize_phrase<A: Analyzer + ?Sized>(
    analyzer: &A,
    text: &str,
    lang: &Lang,
) -> Result<Vec<String>, LexError> {
    Ok(analyzer
        .analyze(text, lang)?
        .into_iter()
        .map(|token| token.lemma)
        .collect())
}

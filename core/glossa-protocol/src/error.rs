use alloc::string::String;
use core::fmt;

use crate::model::Span;

/// Data-quality violations detected in upstream input.
///
/// The match engine itself never produces these; they are raised by tooling
/// that checks glossary exports and token streams before they reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A published entry without any lemma-sequence variant.
    NoVariants { entry: String },
    /// A lemma-sequence variant of length zero.
    EmptyVariant { entry: String, variant: usize },
    /// A token whose span does not satisfy `end > start`.
    InvalidSpan { index: usize, span: Span },
    /// A token starting before the previous token ended.
    UnorderedTokens { index: usize },
    /// A compiled glossary archive that failed validation.
    Snapshot(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::NoVariants { entry } => {
                write!(f, "entry '{}' has no lemma variants", entry)
            }
            ProtocolError::EmptyVariant { entry, variant } => {
                write!(f, "entry '{}' has an empty lemma variant at {}", entry, variant)
            }
            ProtocolError::InvalidSpan { index, span } => {
                write!(f, "token {} has invalid span [{}, {})", index, span.start, span.end)
            }
            ProtocolError::UnorderedTokens { index } => {
                write!(f, "token {} overlaps or precedes the previous token", index)
            }
            ProtocolError::Snapshot(msg) => write!(f, "invalid glossary snapshot: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

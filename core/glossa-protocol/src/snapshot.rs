use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use rkyv::{AlignedVec, Archive, Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::ids::{Lang, TermRef, TranslationRef};
use crate::model::{IndexedEntry, TermIndex, TranslationIndex};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One term or translation as exported by the glossary store.
///
/// `lemmas` may be left empty in a JSON export; the compiler then derives a
/// single variant from `text`.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct StoredEntry {
    pub id: String,
    pub lang: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub text: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lemmas: Vec<Vec<String>>,
}

impl StoredEntry {
    fn to_indexed<R: From<String>>(&self) -> IndexedEntry<R> {
        IndexedEntry {
            reference: R::from(self.id.clone()),
            lang: Lang::new(self.lang.clone()),
            lemmas: self.lemmas.clone(),
        }
    }
}

/// A versioned glossary export: every term and translation with their
/// precomputed lemma variants, for all languages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct GlossarySnapshot {
    pub version: u32,
    pub terms: Vec<StoredEntry>,
    pub translations: Vec<StoredEntry>,
}

impl GlossarySnapshot {
    pub fn term_entries(&self) -> Vec<TermIndex> {
        self.terms.iter().map(StoredEntry::to_indexed::<TermRef>).collect()
    }

    pub fn translation_entries(&self) -> Vec<TranslationIndex> {
        self.translations
            .iter()
            .map(StoredEntry::to_indexed::<TranslationRef>)
            .collect()
    }

    /// Rejects entries that would silently never match.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        for entry in self.term_entries() {
            entry.validate()?;
        }
        for entry in self.translation_entries() {
            entry.validate()?;
        }
        Ok(())
    }

    pub fn to_archive_bytes(&self) -> Result<AlignedVec, ProtocolError> {
        rkyv::to_bytes::<_, 1024>(self).map_err(|e| ProtocolError::Snapshot(format!("{:?}", e)))
    }

    /// Loads a compiled snapshot, validating the archive before touching it.
    pub fn from_archive_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        // Buffers handed over from JS carry no alignment guarantee
        let mut aligned = AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);

        let archived = rkyv::check_archived_root::<GlossarySnapshot>(&aligned)
            .map_err(|e| ProtocolError::Snapshot(format!("{:?}", e)))?;

        archived
            .deserialize(&mut rkyv::Infallible)
            .map_err(|_| ProtocolError::Snapshot(String::from("deserialization failed")))
    }
}

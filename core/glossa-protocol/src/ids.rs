use alloc::string::String;
use core::fmt;

use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Discriminant for the two kinds of glossary entity the engine matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum EntityKind {
    Term = 0,
    Translation = 1,
}

/// A reference to an entity owned by the glossary store.
///
/// The engine never dereferences these; it only carries them from the index
/// into the produced matches.
pub trait EntityRef: Clone + PartialEq + fmt::Debug + fmt::Display {
    const KIND: EntityKind;

    fn kind(&self) -> EntityKind {
        Self::KIND
    }
}

macro_rules! define_ref {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        #[repr(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.into())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_ref!(TermRef, "Document identity of a glossary term.");
define_ref!(TranslationRef, "Document identity of a translation.");
define_ref!(Lang, "Language code of a text or glossary entry (e.g. `de`).");

impl EntityRef for TermRef {
    const KIND: EntityKind = EntityKind::Term;
}

impl EntityRef for TranslationRef {
    const KIND: EntityKind = EntityKind::Translation;
}

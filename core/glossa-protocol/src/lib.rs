#![no_std] // Shared between the WASM binding and native tools

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod ids;

// Re-export core types for convenience
pub use error::ProtocolError;
pub use ids::{EntityKind, EntityRef, Lang, TermRef, TranslationRef};

pub mod model;
pub use model::*;

pub mod snapshot;
pub use snapshot::{GlossarySnapshot, StoredEntry};

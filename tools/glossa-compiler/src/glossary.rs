use std::fs;
use std::path::Path;

use anyhow::Context;
use glossa_lexer::{lemmatize_phrase, Analyzer};
use glossa_protocol::{GlossarySnapshot, Lang, StoredEntry};

/// Reads a glossary export: a compiled `.rkyv` archive or a JSON document.
pub fn load(path: &Path) -> anyhow::Result<GlossarySnapshot> {
    if path.extension().is_some_and(|ext| ext == "rkyv") {
        let bytes = fs::read(path).with_context(|| format!("reading {:?}", path))?;
        return Ok(GlossarySnapshot::from_archive_bytes(&bytes)?);
    }

    let json = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let snapshot = serde_json::from_str(&json).with_context(|| format!("parsing {:?}", path))?;
    Ok(snapshot)
}

/// Derives a variant from `text` for every entry exported without lemmas.
/// Returns how many entries were filled in.
pub fn fill_missing_lemmas<A: Analyzer + ?Sized>(
    snapshot: &mut GlossarySnapshot,
    analyzer: &A,
) -> anyhow::Result<usize> {
    let mut filled = 0;
    for entry in snapshot.terms.iter_mut().chain(snapshot.translations.iter_mut()) {
        if fill_entry(entry, analyzer)? {
            filled += 1;
        }
    }
    Ok(filled)
}

fn fill_entry<A: Analyzer + ?Sized>(entry: &mut StoredEntry, analyzer: &A) -> anyhow::Result<bool> {
    if !entry.lemmas.is_empty() || entry.text.trim().is_empty() {
        return Ok(false);
    }

    let variant = lemmatize_phrase(analyzer, &entry.text, &Lang::new(entry.lang.clone()))
        .with_context(|| format!("lemmatizing entry '{}'", entry.id))?;
    if variant.is_empty() {
        return Ok(false);
    }

    entry.lemmas.push(variant);
    Ok(true)
}

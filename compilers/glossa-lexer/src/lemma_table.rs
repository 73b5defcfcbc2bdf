use std::collections::HashMap;
use std::path::Path;

use glossa_protocol::Lang;
use serde::Deserialize;

use crate::LexError;

/// Per-language overrides mapping a lowercased surface form to its lemma.
///
/// JSON shape: `{ "de": { "häuser": "haus", "katzen": "katze" } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LemmaTable {
    langs: HashMap<String, HashMap<String, String>>,
}

impl LemmaTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, LexError> {
        let table: LemmaTable = serde_json::from_str(json)?;
        Ok(table.normalized())
    }

    pub fn load(path: &Path) -> Result<Self, LexError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn insert(&mut self, lang: &Lang, surface: &str, lemma: &str) {
        self.langs
            .entry(lang.as_str().to_string())
            .or_default()
            .insert(surface.to_lowercase(), lemma.to_lowercase());
    }

    /// Looks up an already lowercased surface form.
    pub fn lookup(&self, lang: &Lang, surface: &str) -> Option<&str> {
        self.langs.get(lang.as_str())?.get(surface).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.langs.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Hand-written tables are not reliably lowercase
    fn normalized(self) -> Self {
        let langs = self
            .langs
            .into_iter()
            .map(|(lang, forms)| {
                let forms = forms
                    .into_iter()
                    .map(|(surface, lemma)| (surface.to_lowercase(), lemma.to_lowercase()))
                    .collect();
                (lang, forms)
            })
            .collect();
        Self { langs }
    }
}
